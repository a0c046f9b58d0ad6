//! Modelo de Vehículo
//!
//! Registro maestro de vehículo que el motor referencia para cupos.
//! La capacidad es inmutable una vez que existe cualquier asignación
//! que apunte al vehículo (se reasigna, no se redimensiona).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TipoVehiculo {
    Autobus,
    Van,
    Camioneta,
    Particular,
}

/// Vehículo de movilización
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehiculo {
    pub id: Uuid,
    pub tipo: TipoVehiculo,
    /// Cupo máximo de personas asignables por evento
    pub capacidad: u32,
    pub placa: Option<String>,
    /// Movilizador responsable del vehículo (referencia externa)
    pub movilizador_id: Option<Uuid>,
    pub activo: bool,
}

impl Vehiculo {
    pub fn new(
        tipo: TipoVehiculo,
        capacidad: u32,
        placa: Option<String>,
        movilizador_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tipo,
            capacidad,
            placa,
            movilizador_id,
            activo: true,
        }
    }
}
