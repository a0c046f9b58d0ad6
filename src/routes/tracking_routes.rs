//! Rutas de tracking en vivo
//!
//! El usuario de la sesión siempre sale de la identidad del llamador;
//! la llave natural (usuario, evento, vehículo) es la frontera de
//! idempotencia de los reintentos móviles.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::tracking_dto::{
    ActivosQuery, DetenerTrackingRequest, IniciarTrackingRequest, ReporteTrackingRequest,
    SesionResponse,
};
use crate::models::auth::{Identidad, Rol};
use crate::models::tracking::LlaveSesion;
use crate::services::authorization_service::{capacidades, exigir};
use crate::services::tracking_service::ReportePosicion;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_router() -> Router<AppState> {
    Router::new()
        .route("/start", post(iniciar))
        .route("/report", post(reportar))
        .route("/stop", post(detener))
        .route("/activos", get(listar_activas))
}

async fn iniciar(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<IniciarTrackingRequest>,
) -> Result<Json<ApiResponse<SesionResponse>>, AppError> {
    exigir(&identidad, capacidades::TRACKING_REPORT)?;

    let llave = LlaveSesion {
        usuario_id: identidad.usuario_id,
        event_id: request.event_id,
        vehicle_id: request.vehicle_id,
    };
    let contexto = request.contexto.unwrap_or_default().into();
    let sesion = state.tracking.iniciar(llave, identidad.rol, contexto).await;
    Ok(Json(ApiResponse::success(sesion.into())))
}

async fn reportar(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<ReporteTrackingRequest>,
) -> Result<Json<ApiResponse<SesionResponse>>, AppError> {
    exigir(&identidad, capacidades::TRACKING_REPORT)?;
    request.validate()?;

    let llave = LlaveSesion {
        usuario_id: identidad.usuario_id,
        event_id: request.event_id,
        vehicle_id: request.vehicle_id,
    };
    let reporte = ReportePosicion {
        lat: request.lat,
        lon: request.lon,
        velocidad: request.velocidad,
        bateria: request.bateria,
        rumbo: request.rumbo,
        direccion: request.direccion,
    };
    // sello del servidor; el cliente no manda reloj
    let sesion = state.tracking.reportar(llave, reporte, Utc::now()).await?;
    Ok(Json(ApiResponse::success(sesion.into())))
}

async fn detener(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<DetenerTrackingRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    exigir(&identidad, capacidades::TRACKING_REPORT)?;

    let llave = LlaveSesion {
        usuario_id: identidad.usuario_id,
        event_id: request.event_id,
        vehicle_id: request.vehicle_id,
    };
    let detenida = state.tracking.detener(llave).await;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "detenida": detenida,
    }))))
}

async fn listar_activas(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Query(query): Query<ActivosQuery>,
) -> Result<Json<Vec<SesionResponse>>, AppError> {
    exigir(&identidad, capacidades::TRACKING_VIEW_ALL)?;

    let roles: Option<Vec<Rol>> = match &query.roles {
        Some(crudo) => {
            let mut roles = Vec::new();
            for parte in crudo.split(',') {
                let rol = parte.trim().parse().map_err(|e: String| {
                    AppError::BadRequest(format!("filtro de roles inválido: {}", e))
                })?;
                roles.push(rol);
            }
            Some(roles)
        }
        None => None,
    };

    let activas = state
        .tracking
        .listar_activas(query.evento, roles.as_deref())
        .await;
    Ok(Json(activas.into_iter().map(Into::into).collect()))
}
