//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan operaciones que involucran múltiples modelos
//! o que deben ejecutarse dentro de una transacción.

pub mod guarantor;
pub mod pricing;
pub mod rental_service;
pub mod statistics_service;
