//! Rutas de reportes y estadísticas

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::dto::reportes_dto::{
    EstadisticasEvento, HistoricoQuery, RankingVehiculo, ReporteHistorico,
};
use crate::models::auth::Identidad;
use crate::services::authorization_service::{capacidades, exigir};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_router() -> Router<AppState> {
    Router::new()
        .route("/evento/:event_id/stats", get(estadisticas_evento))
        .route("/evento/:event_id/ranking", get(ranking_vehiculos))
        .route("/historico", get(reporte_historico))
}

async fn estadisticas_evento(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EstadisticasEvento>, AppError> {
    exigir(&identidad, capacidades::REPORTES_VIEW)?;
    Ok(Json(state.reportes.estadisticas_evento(event_id).await?))
}

async fn ranking_vehiculos(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<RankingVehiculo>>, AppError> {
    exigir(&identidad, capacidades::REPORTES_VIEW)?;
    Ok(Json(state.reportes.ranking_vehiculos(event_id).await?))
}

async fn reporte_historico(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Query(query): Query<HistoricoQuery>,
) -> Result<Json<ReporteHistorico>, AppError> {
    exigir(&identidad, capacidades::REPORTES_VIEW)?;

    let corte = query
        .corte
        .unwrap_or_else(|| Utc::now() - Duration::hours(state.config.historical_cutoff_hours));
    Ok(Json(state.reportes.reporte_historico(corte).await?))
}
