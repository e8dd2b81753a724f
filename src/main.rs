use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use service_center_backend::config::environment::EnvironmentConfig;
use service_center_backend::database::DatabaseConnection;
use service_center_backend::routes::create_app_router;
use service_center_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Service Center Backend - Gestión de citas y mantenimiento");
    info!("=============================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Ejecutar migraciones pendientes
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    // Crear router de la API
    let config = EnvironmentConfig::default();
    if config.is_production() {
        info!("🏭 Ejecutando en modo producción");
    }
    let app_state = AppState::new(pool, config);
    let app = create_app_router(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("📚 Catálogo:");
    info!("   GET  /api/catalog/service-types - Tipos de servicio");
    info!("   GET  /api/catalog/service-centers - Centros de servicio");
    info!("   GET  /api/catalog/parts - Piezas de inventario");
    info!("   GET  /api/catalog/parts/:id/inventory - Stock de una pieza");
    info!("📅 Reservas:");
    info!("   GET  /api/booking/calendar - Grilla del calendario");
    info!("   GET  /api/booking/slots - Horarios disponibles");
    info!("   GET  /api/booking/recommendation - Paquete recomendado");
    info!("   GET  /api/booking/vehicles - Vehículos del cliente");
    info!("   POST /api/booking/appointments - Crear cita");
    info!("📋 Citas:");
    info!("   GET  /api/appointments - Listar citas");
    info!("   GET  /api/appointments/:id - Obtener cita");
    info!("   POST /api/appointments/:id/transition - Cambiar estado");
    info!("   PUT  /api/appointments/:id/technicians - Asignar técnicos");
    info!("   GET  /api/appointments/:id/technicians - Técnicos asignados");
    info!("🛠️  Mantenimiento:");
    info!("   GET  /api/appointments/:id/maintenance-record - Obtener registro");
    info!("   PUT  /api/appointments/:id/maintenance-record - Guardar registro");
    info!("   POST /api/appointments/:id/maintenance-record/items/:index/toggle - Alternar ítem");

    // Iniciar servidor
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
