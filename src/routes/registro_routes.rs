//! Rutas del registro de referencia
//!
//! Siembra de los registros maestros (eventos, vehículos, personas) que
//! los colaboradores de CRUD administran. El motor solo guarda la copia
//! que necesita para cupos, check-ins y reportes.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::registro_dto::{
    ActualizarEventoRequest, ActualizarVehiculoRequest, AltaEventoRequest, AltaVehiculoRequest,
    CargaPersonasRequest, EventoResponse, VehiculoResponse,
};
use crate::models::auth::Identidad;
use crate::models::persona::Persona;
use crate::services::authorization_service::{capacidades, exigir};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn crear_router() -> Router<AppState> {
    Router::new()
        .route("/evento", post(alta_evento))
        .route("/evento/:id", put(actualizar_evento))
        .route("/vehiculo", post(alta_vehiculo))
        .route("/vehiculo/:id", put(actualizar_vehiculo))
        .route("/personas", post(cargar_personas))
}

async fn alta_evento(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<AltaEventoRequest>,
) -> Result<Json<ApiResponse<EventoResponse>>, AppError> {
    exigir(&identidad, capacidades::REGISTRO_WRITE)?;
    request.validate()?;

    let evento = state
        .registro
        .alta_evento(request.nombre, request.tipo, request.fecha_programada)
        .await;
    Ok(Json(ApiResponse::success(evento.into())))
}

async fn actualizar_evento(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarEventoRequest>,
) -> Result<Json<ApiResponse<EventoResponse>>, AppError> {
    exigir(&identidad, capacidades::REGISTRO_WRITE)?;
    request.validate()?;

    let evento = state
        .registro
        .actualizar_evento(id, request.nombre, request.fecha_programada)
        .await?;
    Ok(Json(ApiResponse::success(evento.into())))
}

async fn alta_vehiculo(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<AltaVehiculoRequest>,
) -> Result<Json<ApiResponse<VehiculoResponse>>, AppError> {
    exigir(&identidad, capacidades::REGISTRO_WRITE)?;
    request.validate()?;

    let vehiculo = state
        .registro
        .alta_vehiculo(
            request.tipo,
            request.capacidad,
            request.placa,
            request.movilizador_id,
        )
        .await;
    Ok(Json(ApiResponse::success(vehiculo.into())))
}

async fn actualizar_vehiculo(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarVehiculoRequest>,
) -> Result<Json<ApiResponse<VehiculoResponse>>, AppError> {
    exigir(&identidad, capacidades::REGISTRO_WRITE)?;
    request.validate()?;

    // la capacidad queda congelada en cuanto el vehículo tiene asignaciones
    let capacidad_bloqueada = state.movilizacion.vehiculo_tiene_asignaciones(id).await;
    let vehiculo = state
        .registro
        .actualizar_vehiculo(
            id,
            request.capacidad,
            request.placa,
            request.movilizador_id,
            request.activo,
            capacidad_bloqueada,
        )
        .await?;
    Ok(Json(ApiResponse::success(vehiculo.into())))
}

async fn cargar_personas(
    State(state): State<AppState>,
    Extension(identidad): Extension<Identidad>,
    Json(request): Json<CargaPersonasRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    exigir(&identidad, capacidades::REGISTRO_WRITE)?;
    request.validate()?;

    let mut ids = Vec::with_capacity(request.personas.len());
    for persona in request.personas {
        let id = persona.id.unwrap_or_else(Uuid::new_v4);
        state
            .directorio
            .upsert(Persona {
                id,
                nombre: persona.nombre,
                clave_elector: persona.clave_elector,
            })
            .await;
        ids.push(id);
    }
    Ok(Json(ApiResponse::success_with_message(
        serde_json::json!({ "ids": ids }),
        format!("{} personas cargadas", ids.len()),
    )))
}
