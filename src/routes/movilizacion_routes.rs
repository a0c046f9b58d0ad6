//! Rutas de asignación de personas a vehículos

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::movilizacion_dto::{
    AsignacionMasivaRequest, AsignacionMasivaResponse, AsignacionResponse, EstatusAsignacion,
    ReasignacionRequest,
};
use crate::models::auth::Identidad;
use crate::services::authorization_service::{capacidades, exigir};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_router() -> Router<AppState> {
    Router::new()
        .route("/asignar", post(asignar))
        .route("/asignacion/:id", delete(quitar))
        .route("/reasignar", post(reasignar))
        .route("/evento/:event_id", get(listar_por_evento))
        .route("/evento/:event_id/vehiculo/:vehicle_id", get(listar_por_vehiculo))
}

/// Asignación masiva con resultados por persona
async fn asignar(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<AsignacionMasivaRequest>,
) -> Result<Json<ApiResponse<AsignacionMasivaResponse>>, AppError> {
    exigir(&identidad, capacidades::MOVILIZACION_WRITE)?;
    request.validate()?;

    let resultados = state
        .movilizacion
        .asignar(
            request.event_id,
            request.vehicle_id,
            &request.person_ids,
            request.lider_id,
        )
        .await?;

    let total_asignadas = resultados
        .iter()
        .filter(|r| r.estatus == EstatusAsignacion::Asignada)
        .count();
    let total_rechazadas = resultados.len() - total_asignadas;

    let mensaje = format!("{} asignadas, {} rechazadas", total_asignadas, total_rechazadas);
    Ok(Json(ApiResponse::success_with_message(
        AsignacionMasivaResponse {
            event_id: request.event_id,
            vehicle_id: request.vehicle_id,
            total_asignadas,
            total_rechazadas,
            resultados,
        },
        mensaje,
    )))
}

/// Quitar persona (solo mientras no haya asistido)
async fn quitar(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AsignacionResponse>>, AppError> {
    exigir(&identidad, capacidades::MOVILIZACION_WRITE)?;

    let quitada = state.movilizacion.quitar(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        quitada.into(),
        "Asignación quitada, cupo liberado".to_string(),
    )))
}

/// Reasignación de responsabilidad jerárquica
async fn reasignar(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<ReasignacionRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    exigir(&identidad, capacidades::MOVILIZACION_WRITE)?;

    let actualizadas = state
        .movilizacion
        .reasignar_lider(request.person_id, request.nuevo_lider_id)
        .await;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "person_id": request.person_id,
        "nuevo_lider_id": request.nuevo_lider_id,
        "asignaciones_actualizadas": actualizadas,
    }))))
}

async fn listar_por_evento(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<AsignacionResponse>>, AppError> {
    exigir(&identidad, capacidades::MOVILIZACION_VIEW)?;

    let lista = state.movilizacion.listar_por_evento(event_id).await;
    Ok(Json(lista.into_iter().map(Into::into).collect()))
}

async fn listar_por_vehiculo(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path((event_id, vehicle_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<AsignacionResponse>>, AppError> {
    exigir(&identidad, capacidades::MOVILIZACION_VIEW)?;

    let lista = state
        .movilizacion
        .listar_por_vehiculo(event_id, vehicle_id)
        .await;
    Ok(Json(lista.into_iter().map(Into::into).collect()))
}
