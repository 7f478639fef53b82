mod config;
mod state;
mod database;
mod services;
mod utils;
mod models;
mod middleware;
mod controllers;
mod repositories;
mod routes;
mod dto;

use anyhow::Result;
use axum::{
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::{create_pool, run_migrations};
use middleware::auth::auth_middleware;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "car_rental_api=info,tower_http=info".into()),
        )
        .init();

    info!("🚗 Car Rental API");
    info!("=================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    let app_state = AppState::new(pool, config.clone());

    // Rutas protegidas por JWT
    let api_router = Router::new()
        .nest("/api/cars", routes::car_routes::create_car_router())
        .nest("/api/rentals", routes::rental_routes::create_rental_router())
        .nest("/api/statistics", routes::statistics_routes::create_statistics_router())
        .layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(&config.cors_origins)
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/", get(root_endpoint))
        .route("/health", get(health_endpoint))
        // Historial de mantenimiento: lectura pública, sin JWT
        .nest(
            "/api/cars",
            routes::service_history_routes::create_service_history_router(),
        )
        .merge(api_router)
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Endpoints - Cars:");
    info!("   POST /api/cars - Crear coche (admin)");
    info!("   GET  /api/cars - Listar coches");
    info!("   GET  /api/cars/:id - Obtener coche");
    info!("   PUT  /api/cars/:id - Actualizar coche");
    info!("   DELETE /api/cars/:id - Eliminar coche (admin)");
    info!("   GET  /api/cars/:id/rentals - Alquileres de un coche");
    info!("   GET  /api/cars/service-shops - Talleres (público)");
    info!("   GET  /api/cars/service-history - Historial de mantenimiento (público)");
    info!("📋 Endpoints - Rentals:");
    info!("   POST /api/rentals - Iniciar alquiler");
    info!("   GET  /api/rentals - Listar alquileres");
    info!("   GET  /api/rentals/:id - Obtener alquiler");
    info!("   PUT  /api/rentals/:id - Actualizar alquiler");
    info!("   DELETE /api/rentals/:id - Eliminar alquiler (admin)");
    info!("   POST /api/rentals/return - Registrar devolución");
    info!("   POST /api/rentals/payment - Marcar como pagado");
    info!("📊 Endpoints - Statistics:");
    info!("   GET  /api/statistics - Estadísticas de alquileres");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "name": "car_rental_api",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
