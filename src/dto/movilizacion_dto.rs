//! DTOs de asignación de personas a vehículos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assignment::Asignacion;

/// Request de asignación masiva: cada persona se evalúa por separado y
/// la respuesta trae un resultado por persona (éxito parcial permitido)
#[derive(Debug, Deserialize, Validate)]
pub struct AsignacionMasivaRequest {
    pub event_id: Uuid,
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 500))]
    pub person_ids: Vec<Uuid>,

    pub lider_id: Option<Uuid>,
}

/// Estatus por persona dentro de una asignación masiva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstatusAsignacion {
    Asignada,
    CupoExcedido,
    Duplicada,
}

/// Resultado por persona de la asignación masiva
#[derive(Debug, Serialize)]
pub struct ResultadoAsignacion {
    pub person_id: Uuid,
    pub estatus: EstatusAsignacion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<Uuid>,
    pub mensaje: String,
}

/// Respuesta de la asignación masiva con conteos para la UI
/// ("8 asignadas, 2 sin cupo")
#[derive(Debug, Serialize)]
pub struct AsignacionMasivaResponse {
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
    pub total_asignadas: usize,
    pub total_rechazadas: usize,
    pub resultados: Vec<ResultadoAsignacion>,
}

/// Request de reasignación de responsabilidad jerárquica (no toca
/// vehículos ni cupos)
#[derive(Debug, Deserialize)]
pub struct ReasignacionRequest {
    pub person_id: Uuid,
    pub nuevo_lider_id: Uuid,
}

/// Response de una asignación individual
#[derive(Debug, Serialize)]
pub struct AsignacionResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
    pub person_id: Uuid,
    pub lider_id: Option<Uuid>,
    pub asistio: bool,
    pub checkin_at: Option<DateTime<Utc>>,
}

impl From<Asignacion> for AsignacionResponse {
    fn from(asignacion: Asignacion) -> Self {
        Self {
            id: asignacion.id,
            event_id: asignacion.event_id,
            vehicle_id: asignacion.vehicle_id,
            person_id: asignacion.person_id,
            lider_id: asignacion.lider_id,
            asistio: asignacion.asistio,
            checkin_at: asignacion.checkin_at,
        }
    }
}
