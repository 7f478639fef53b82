//! Modelo de ServiceHistory
//!
//! Registro de mantenimiento de un coche. `services` es una lista opaca
//! en JSONB (la API no interpreta su contenido).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// ServiceHistory - mapea exactamente a la tabla service_histories
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceHistory {
    pub id: Uuid,
    pub car_id: Uuid,
    pub date: DateTime<Utc>,
    pub shop_name: String,
    pub services: serde_json::Value,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
