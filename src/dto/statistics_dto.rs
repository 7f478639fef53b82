//! DTO de estadísticas de alquileres

use rust_decimal::Decimal;
use serde::Serialize;

// Agregados de solo lectura: snapshot sin locks, son informativos
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub active_rentals: i64,
    pub completed_rentals: i64,
    pub total_revenue: Decimal,
    pub active_revenue: Decimal,
    pub completed_revenue: Decimal,
    pub avg_duration_days: Option<Decimal>,
}
