//! DTOs de tracking en vivo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Rol;
use crate::models::tracking::{ContextoSesion, EstatusSesion, Posicion, SesionTracking};

/// Contexto denormalizado opcional que manda el cliente al iniciar
#[derive(Debug, Default, Deserialize)]
pub struct ContextoSesionRequest {
    pub nombre_evento: Option<String>,
    pub placa: Option<String>,
    pub ocupacion: Option<u32>,
}

impl From<ContextoSesionRequest> for ContextoSesion {
    fn from(contexto: ContextoSesionRequest) -> Self {
        Self {
            nombre_evento: contexto.nombre_evento,
            placa: contexto.placa,
            ocupacion: contexto.ocupacion,
        }
    }
}

/// Inicio de sesión de tracking; el usuario sale de la identidad del
/// llamador, no del body
#[derive(Debug, Deserialize)]
pub struct IniciarTrackingRequest {
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
    pub contexto: Option<ContextoSesionRequest>,
}

/// Reporte periódico de posición (intervalo por defecto: 30s).
/// Sin filtro de plausibilidad: este motor es bitácora, no geocerca.
#[derive(Debug, Deserialize, Validate)]
pub struct ReporteTrackingRequest {
    pub event_id: Uuid,
    pub vehicle_id: Uuid,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,

    #[validate(range(min = 0.0))]
    pub velocidad: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub bateria: Option<f64>,

    #[validate(range(min = 0.0, max = 360.0))]
    pub rumbo: Option<f64>,

    pub direccion: Option<String>,
}

/// Detener tracking (idempotente: detener una sesión inactiva es no-op)
#[derive(Debug, Deserialize)]
pub struct DetenerTrackingRequest {
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
}

/// Filtros para el listado de sesiones activas
#[derive(Debug, Default, Deserialize)]
pub struct ActivosQuery {
    pub evento: Option<Uuid>,
    /// Roles permitidos separados por coma (ej. "movilizador,lider")
    pub roles: Option<String>,
}

/// Response de sesión de tracking
#[derive(Debug, Serialize)]
pub struct SesionResponse {
    pub usuario_id: Uuid,
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
    pub rol: Rol,
    pub estatus: EstatusSesion,
    pub iniciada_en: DateTime<Utc>,
    pub ultimo_reporte_en: DateTime<Utc>,
    pub posicion: Option<Posicion>,
    pub velocidad: Option<f64>,
    pub bateria: Option<f64>,
    pub rumbo: Option<f64>,
    pub direccion: Option<String>,
    pub contexto: ContextoSesion,
}

impl From<SesionTracking> for SesionResponse {
    fn from(sesion: SesionTracking) -> Self {
        Self {
            usuario_id: sesion.llave.usuario_id,
            event_id: sesion.llave.event_id,
            vehicle_id: sesion.llave.vehicle_id,
            rol: sesion.rol,
            estatus: sesion.estatus,
            iniciada_en: sesion.iniciada_en,
            ultimo_reporte_en: sesion.ultimo_reporte_en,
            posicion: sesion.posicion,
            velocidad: sesion.velocidad,
            bateria: sesion.bateria,
            rumbo: sesion.rumbo,
            direccion: sesion.direccion,
            contexto: sesion.contexto,
        }
    }
}
