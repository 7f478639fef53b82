//! Controllers MVC
//!
//! Orquestan entre DTOs validados y los repositorios/servicios de dominio.

pub mod car_controller;
pub mod rental_controller;
pub mod service_history_controller;
pub mod statistics_controller;
