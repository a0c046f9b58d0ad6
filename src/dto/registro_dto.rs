//! DTOs del registro de referencia (eventos, vehículos, personas)
//!
//! Los registros maestros los administran colaboradores externos de CRUD;
//! estos requests solo siembran la copia de referencia del motor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::event::Evento;
use crate::models::vehicle::{TipoVehiculo, Vehiculo};
use crate::utils::validation::validar_clave_elector;

/// Request para dar de alta un evento
#[derive(Debug, Deserialize, Validate)]
pub struct AltaEventoRequest {
    #[validate(length(min = 3, max = 200))]
    pub nombre: String,

    #[validate(length(min = 2, max = 50))]
    pub tipo: String,

    pub fecha_programada: DateTime<Utc>,
}

/// Request para editar un evento activo (rechazado una vez histórico)
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarEventoRequest {
    #[validate(length(min = 3, max = 200))]
    pub nombre: Option<String>,

    pub fecha_programada: Option<DateTime<Utc>>,
}

/// Response de evento para la API
#[derive(Debug, Serialize)]
pub struct EventoResponse {
    pub id: Uuid,
    pub nombre: String,
    pub tipo: String,
    pub fecha_programada: DateTime<Utc>,
    pub activo: bool,
}

impl From<Evento> for EventoResponse {
    fn from(evento: Evento) -> Self {
        Self {
            id: evento.id,
            nombre: evento.nombre,
            tipo: evento.tipo,
            fecha_programada: evento.fecha_programada,
            activo: evento.activo,
        }
    }
}

/// Request para dar de alta un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct AltaVehiculoRequest {
    pub tipo: TipoVehiculo,

    #[validate(range(min = 1))]
    pub capacidad: u32,

    #[validate(length(min = 5, max = 20))]
    pub placa: Option<String>,

    pub movilizador_id: Option<Uuid>,
}

/// Request para editar un vehículo. El cambio de capacidad se rechaza
/// una vez que existen asignaciones (se reasigna, no se redimensiona).
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarVehiculoRequest {
    #[validate(range(min = 1))]
    pub capacidad: Option<u32>,

    #[validate(length(min = 5, max = 20))]
    pub placa: Option<String>,

    pub movilizador_id: Option<Uuid>,

    pub activo: Option<bool>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehiculoResponse {
    pub id: Uuid,
    pub tipo: TipoVehiculo,
    pub capacidad: u32,
    pub placa: Option<String>,
    pub movilizador_id: Option<Uuid>,
    pub activo: bool,
}

impl From<Vehiculo> for VehiculoResponse {
    fn from(vehiculo: Vehiculo) -> Self {
        Self {
            id: vehiculo.id,
            tipo: vehiculo.tipo,
            capacidad: vehiculo.capacidad,
            placa: vehiculo.placa,
            movilizador_id: vehiculo.movilizador_id,
            activo: vehiculo.activo,
        }
    }
}

/// Persona de referencia (id lo asigna el colaborador de CRUD; si falta
/// se genera uno nuevo)
#[derive(Debug, Deserialize, Validate)]
pub struct PersonaRequest {
    pub id: Option<Uuid>,

    #[validate(length(min = 3, max = 200))]
    pub nombre: String,

    #[validate(custom = "validar_clave_elector")]
    pub clave_elector: String,
}

/// Carga de personas de referencia
#[derive(Debug, Deserialize, Validate)]
pub struct CargaPersonasRequest {
    #[validate]
    pub personas: Vec<PersonaRequest>,
}
