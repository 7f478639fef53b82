//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de una tabla. Las operaciones que
//! participan en transacciones del motor de alquileres reciben la
//! transacción explícitamente.

pub mod car_repository;
pub mod rental_repository;
pub mod service_history_repository;
