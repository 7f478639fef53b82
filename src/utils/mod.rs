//! Utilidades del sistema
//!
//! Este módulo contiene utilidades comunes: manejo de errores tipados
//! y su mapeo a respuestas HTTP.

pub mod errors;
