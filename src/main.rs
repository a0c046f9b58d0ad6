use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use dotenvy::dotenv;

use movilizacion_backend::config::EnvironmentConfig;
use movilizacion_backend::routes::crear_app;
use movilizacion_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Motor de Movilización - Asignación, Asistencia y Tracking");
    info!("============================================================");

    let config = EnvironmentConfig::default();
    let state = AppState::new(config.clone());

    // Barrido periódico de staleness: sesiones que dejaron de reportar
    // pasan a inactivas sin stop explícito
    let tracking = state.tracking.clone();
    let timeout = config.tracking_timeout();
    let intervalo_secs = config.tracking_report_interval_secs;
    tokio::spawn(async move {
        let mut intervalo =
            tokio::time::interval(std::time::Duration::from_secs(intervalo_secs));
        intervalo.tick().await; // el primer tick es inmediato
        loop {
            intervalo.tick().await;
            let barridas = tracking.barrido_staleness(Utc::now(), timeout).await;
            if barridas > 0 {
                warn!("🧹 Barrido de staleness: {} sesiones marcadas inactivas", barridas);
            }
        }
    });

    let app = crear_app(state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("   GET  /api/capacidades - Catálogo de capacidades por rol");
    info!("📋 Movilización:");
    info!("   POST /api/movilizacion/asignar - Asignación masiva");
    info!("   DELETE /api/movilizacion/asignacion/:id - Quitar persona");
    info!("   POST /api/movilizacion/reasignar - Reasignar líder");
    info!("   GET  /api/movilizacion/evento/:id - Asignaciones por evento");
    info!("   GET  /api/movilizacion/evento/:id/vehiculo/:id - Roster del vehículo");
    info!("✅ Asistencia:");
    info!("   POST /api/asistencia/checkin - Check-in por id de asignación");
    info!("   POST /api/asistencia/checkin/clave - Check-in por clave de elector");
    info!("   POST /api/asistencia/checkin/qr - Check-in por token QR");
    info!("📡 Tracking:");
    info!("   POST /api/tracking/start - Iniciar sesión");
    info!("   POST /api/tracking/report - Reporte de posición (cada {}s)", intervalo_secs);
    info!("   POST /api/tracking/stop - Detener sesión");
    info!("   GET  /api/tracking/activos - Sesiones activas");
    info!("📊 Reportes:");
    info!("   GET  /api/reportes/evento/:id/stats - Estadísticas del evento");
    info!("   GET  /api/reportes/evento/:id/ranking - Ranking de vehículos");
    info!("   GET  /api/reportes/historico - Reporte histórico");
    info!("🗂  Registro:");
    info!("   POST /api/registro/evento - Alta de evento");
    info!("   PUT  /api/registro/evento/:id - Editar evento activo");
    info!("   POST /api/registro/vehiculo - Alta de vehículo");
    info!("   PUT  /api/registro/vehiculo/:id - Editar vehículo");
    info!("   POST /api/registro/personas - Cargar personas de referencia");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

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
