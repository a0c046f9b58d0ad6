//! DTOs de check-in de asistencia

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::checkin_service::ResultadoCheckin;
use crate::utils::validation::validar_clave_elector;

/// Check-in directo con id de asignación (roster del vehículo)
#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub assignment_id: Uuid,
}

/// Check-in resolviendo la asignación por clave de elector + evento
#[derive(Debug, Deserialize, Validate)]
pub struct CheckinPorClaveRequest {
    #[validate(custom = "validar_clave_elector")]
    pub clave_elector: String,

    pub event_id: Uuid,
}

/// Check-in mediado por QR: el token opaco embebe el id de asignación
#[derive(Debug, Deserialize, Validate)]
pub struct CheckinPorTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

/// Response de check-in. `repetido` indica reintento idempotente: el
/// sello original no cambia.
#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub assignment_id: Uuid,
    pub asistio: bool,
    pub checkin_at: DateTime<Utc>,
    pub repetido: bool,
}

impl From<ResultadoCheckin> for CheckinResponse {
    fn from(resultado: ResultadoCheckin) -> Self {
        Self {
            assignment_id: resultado.assignment_id,
            asistio: true,
            checkin_at: resultado.checkin_at,
            repetido: resultado.repetido,
        }
    }
}
