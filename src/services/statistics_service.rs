//! Agregados de alquileres para reporting
//!
//! Lecturas snapshot sin locks: son informativas, no participan en las
//! transiciones de estado.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::dto::statistics_dto::StatisticsResponse;
use crate::utils::errors::AppResult;

#[derive(Debug, FromRow)]
struct StatisticsRow {
    active_rentals: i64,
    completed_rentals: i64,
    total_revenue: Decimal,
    active_revenue: Decimal,
    completed_revenue: Decimal,
    avg_duration_days: Option<Decimal>,
}

pub struct StatisticsService {
    pool: PgPool,
}

impl StatisticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_statistics(&self) -> AppResult<StatisticsResponse> {
        let row = sqlx::query_as::<_, StatisticsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE is_active)                          AS active_rentals,
                COUNT(*) FILTER (WHERE NOT is_active)                      AS completed_rentals,
                COALESCE(SUM(final_total), 0)                              AS total_revenue,
                COALESCE(SUM(final_price) FILTER (WHERE is_active), 0)     AS active_revenue,
                COALESCE(SUM(final_total) FILTER (WHERE NOT is_active), 0) AS completed_revenue,
                AVG(EXTRACT(EPOCH FROM
                    (CASE WHEN is_active THEN rental_end_date ELSE return_date END)
                    - rental_start_date) / 86400.0)                        AS avg_duration_days
            FROM rentals
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StatisticsResponse {
            active_rentals: row.active_rentals,
            completed_rentals: row.completed_rentals,
            total_revenue: row.total_revenue,
            active_revenue: row.active_revenue,
            completed_revenue: row.completed_revenue,
            avg_duration_days: row.avg_duration_days.map(|d| d.round_dp(1)),
        })
    }
}
