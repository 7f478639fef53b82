//! Repositorio del historial de mantenimiento
//!
//! Solo lecturas: la API no escribe en service_histories.

use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::car::Car;
use crate::models::service_history::ServiceHistory;
use crate::utils::errors::AppResult;

pub struct ServiceHistoryRepository {
    pool: PgPool,
}

impl ServiceHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Nombres de taller distintos, para los selectores del cliente
    pub async fn distinct_shop_names(&self) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT shop_name FROM service_histories ORDER BY shop_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Historial completo con su coche, lo más reciente primero.
    /// Dos queries y join en memoria, como en el repositorio de rentals.
    pub async fn find_all_with_car(&self) -> AppResult<Vec<(ServiceHistory, Car)>> {
        let records = sqlx::query_as::<_, ServiceHistory>(
            "SELECT * FROM service_histories ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let car_ids: Vec<Uuid> = records.iter().map(|r| r.car_id).collect();
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ANY($1)")
            .bind(&car_ids)
            .fetch_all(&self.pool)
            .await?;

        let by_id: HashMap<Uuid, Car> = cars.into_iter().map(|c| (c.id, c)).collect();

        Ok(records
            .into_iter()
            .filter_map(|r| by_id.get(&r.car_id).cloned().map(|c| (r, c)))
            .collect())
    }
}
