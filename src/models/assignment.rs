//! Modelo de Asignación
//!
//! Una asignación liga una persona a un vehículo para un evento.
//! Invariantes: a lo más una asignación viva por (persona, evento);
//! el número de asignaciones vivas de un (evento, vehículo) nunca
//! excede la capacidad del vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Asignación persona-vehículo-evento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asignacion {
    pub id: Uuid,
    pub event_id: Uuid,
    pub vehicle_id: Uuid,
    pub person_id: Uuid,
    /// Líder responsable en la jerarquía de movilización
    pub lider_id: Option<Uuid>,
    /// Bandera de asistencia; una vez en true la asignación no se borra
    pub asistio: bool,
    /// Sello del check-in aceptado (reloj del servidor, no del cliente)
    pub checkin_at: Option<DateTime<Utc>>,
    pub creada_en: DateTime<Utc>,
}

impl Asignacion {
    pub fn new(event_id: Uuid, vehicle_id: Uuid, person_id: Uuid, lider_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            vehicle_id,
            person_id,
            lider_id,
            asistio: false,
            checkin_at: None,
            creada_en: Utc::now(),
        }
    }
}
