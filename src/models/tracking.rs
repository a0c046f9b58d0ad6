//! Modelos de Tracking en vivo
//!
//! Una sesión de tracking liga el flujo de posiciones del dispositivo de
//! un movilizador con un par (evento, vehículo) activo. Las sesiones se
//! conservan después de detenerse: la señal "alguna vez activa" alimenta
//! el porcentaje de movilización.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auth::Rol;

/// Llave natural de una sesión: (usuario, evento, vehículo).
/// Un usuario puede tener varias sesiones activas solo si difieren
/// en evento o vehículo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LlaveSesion {
    pub usuario_id: Uuid,
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
}

/// Estado de la sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstatusSesion {
    Activa,
    Inactiva,
}

/// Última posición conocida reportada por el dispositivo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posicion {
    pub lat: f64,
    pub lon: f64,
}

/// Campos denormalizados de despliegue; informativos, sin invariantes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextoSesion {
    pub nombre_evento: Option<String>,
    pub placa: Option<String>,
    pub ocupacion: Option<u32>,
}

/// Sesión de tracking en vivo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesionTracking {
    pub llave: LlaveSesion,
    /// Rol del usuario que inició la sesión (para filtrar listados)
    pub rol: Rol,
    pub estatus: EstatusSesion,
    pub iniciada_en: DateTime<Utc>,
    pub ultimo_reporte_en: DateTime<Utc>,
    pub posicion: Option<Posicion>,
    pub velocidad: Option<f64>,
    /// Nivel de batería reportado oportunistamente (0-100)
    pub bateria: Option<f64>,
    pub rumbo: Option<f64>,
    pub direccion: Option<String>,
    pub contexto: ContextoSesion,
}

impl SesionTracking {
    pub fn new(llave: LlaveSesion, rol: Rol, contexto: ContextoSesion, ahora: DateTime<Utc>) -> Self {
        Self {
            llave,
            rol,
            estatus: EstatusSesion::Activa,
            iniciada_en: ahora,
            ultimo_reporte_en: ahora,
            posicion: None,
            velocidad: None,
            bateria: None,
            rumbo: None,
            direccion: None,
            contexto,
        }
    }

    pub fn esta_activa(&self) -> bool {
        self.estatus == EstatusSesion::Activa
    }
}
