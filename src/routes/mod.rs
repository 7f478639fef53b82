pub mod car_routes;
pub mod rental_routes;
pub mod service_history_routes;
pub mod statistics_routes;
