//! Rutas de check-in de asistencia
//!
//! Dos protocolos convergen en la misma transición: directo (id de
//! asignación o clave de elector + evento) y mediado por QR.

use axum::{extract::State, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::dto::asistencia_dto::{
    CheckinPorClaveRequest, CheckinPorTokenRequest, CheckinRequest, CheckinResponse,
};
use crate::dto::common::ApiResponse;
use crate::models::auth::Identidad;
use crate::services::authorization_service::{capacidades, exigir};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_router() -> Router<AppState> {
    Router::new()
        .route("/checkin", post(checkin))
        .route("/checkin/clave", post(checkin_por_clave))
        .route("/checkin/qr", post(checkin_por_qr))
}

async fn checkin(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<CheckinRequest>,
) -> Result<Json<ApiResponse<CheckinResponse>>, AppError> {
    exigir(&identidad, capacidades::ASISTENCIA_CHECKIN)?;

    let resultado = state.asistencia.checkin(request.assignment_id).await?;
    responder(resultado)
}

async fn checkin_por_clave(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<CheckinPorClaveRequest>,
) -> Result<Json<ApiResponse<CheckinResponse>>, AppError> {
    exigir(&identidad, capacidades::ASISTENCIA_CHECKIN)?;
    request.validate()?;

    let resultado = state
        .asistencia
        .checkin_por_clave(&request.clave_elector, request.event_id)
        .await?;
    responder(resultado)
}

async fn checkin_por_qr(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<CheckinPorTokenRequest>,
) -> Result<Json<ApiResponse<CheckinResponse>>, AppError> {
    exigir(&identidad, capacidades::ASISTENCIA_CHECKIN)?;
    request.validate()?;

    let resultado = state.asistencia.checkin_por_token(&request.token).await?;
    responder(resultado)
}

fn responder(
    resultado: crate::services::checkin_service::ResultadoCheckin,
) -> Result<Json<ApiResponse<CheckinResponse>>, AppError> {
    let mensaje = if resultado.repetido {
        "Asistencia ya registrada (reintento idempotente)".to_string()
    } else {
        "Asistencia registrada".to_string()
    };
    Ok(Json(ApiResponse::success_with_message(
        resultado.into(),
        mensaje,
    )))
}
