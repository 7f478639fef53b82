use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::service_history_controller::ServiceHistoryController;
use crate::dto::service_history_dto::ServiceHistoryResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas del historial de mantenimiento. Van fuera del
/// middleware JWT, igual que / y /health.
pub fn create_service_history_router() -> Router<AppState> {
    Router::new()
        .route("/service-shops", get(get_service_shop_names))
        .route("/service-history", get(get_service_history))
}

async fn get_service_shop_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let controller = ServiceHistoryController::new(state.pool.clone());
    let response = controller.shop_names().await?;
    Ok(Json(response))
}

async fn get_service_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceHistoryResponse>>, AppError> {
    let controller = ServiceHistoryController::new(state.pool.clone());
    let response = controller.history().await?;
    Ok(Json(response))
}
