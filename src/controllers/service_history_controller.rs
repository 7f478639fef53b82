//! Controller del historial de mantenimiento (solo lectura)

use sqlx::PgPool;

use crate::dto::service_history_dto::ServiceHistoryResponse;
use crate::repositories::service_history_repository::ServiceHistoryRepository;
use crate::utils::errors::AppResult;

pub struct ServiceHistoryController {
    repository: ServiceHistoryRepository,
}

impl ServiceHistoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ServiceHistoryRepository::new(pool),
        }
    }

    pub async fn shop_names(&self) -> AppResult<Vec<String>> {
        self.repository.distinct_shop_names().await
    }

    pub async fn history(&self) -> AppResult<Vec<ServiceHistoryResponse>> {
        let records = self.repository.find_all_with_car().await?;

        Ok(records
            .into_iter()
            .map(|(record, car)| ServiceHistoryResponse::from_parts(record, &car))
            .collect())
    }
}
