//! Controller de estadísticas

use sqlx::PgPool;

use crate::dto::statistics_dto::StatisticsResponse;
use crate::services::statistics_service::StatisticsService;
use crate::utils::errors::AppResult;

pub struct StatisticsController {
    service: StatisticsService,
}

impl StatisticsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: StatisticsService::new(pool),
        }
    }

    pub async fn get_statistics(&self) -> AppResult<StatisticsResponse> {
        self.service.get_statistics().await
    }
}
