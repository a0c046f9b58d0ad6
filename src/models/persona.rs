//! Registro maestro de Persona
//!
//! El ciclo de vida de las personas lo maneja un colaborador externo de
//! CRUD; el motor solo guarda una copia de referencia con los campos
//! que necesita para resolver check-ins por clave de elector.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub nombre: String,
    pub clave_elector: String,
}
