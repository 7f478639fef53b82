//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja el pool de conexiones y las migraciones de schema.

use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::warn;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Crear un pool de conexiones a la base de datos.
///
/// El arranque reintenta con backoff: un Postgres que todavía no acepta
/// conexiones es un fallo transitorio. Los errores de requests en runtime
/// no se reintentan aquí.
pub async fn create_pool(database_url: Option<&str>) -> Result<PgPool> {
    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment variables"))?,
    };

    let options = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300));

    let mut last_err = None;
    for attempt in 1..=CONNECT_ATTEMPTS {
        match options.clone().connect(&database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                warn!(
                    "Intento {}/{} de conexión a la base de datos falló: {}",
                    attempt, CONNECT_ATTEMPTS, e
                );
                last_err = Some(e);
                if attempt < CONNECT_ATTEMPTS {
                    tokio::time::sleep(CONNECT_BACKOFF * attempt).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "Could not connect to database: {}",
        last_err.expect("at least one attempt")
    ))
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
