//! Máquina de estados de check-in
//!
//! Transición única `pendiente -> asistió`, terminal. El reintento es
//! éxito idempotente: los dispositivos de campo reenvían sobre redes
//! inestables y nunca deben ver un error por repetir. El sello es el
//! reloj del servidor, jamás el del cliente.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::assignment::Asignacion;
use crate::services::person_directory::PersonDirectory;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::token::decodificar_token;

/// Resultado de un check-in aceptado
#[derive(Debug, Clone)]
pub struct ResultadoCheckin {
    pub assignment_id: Uuid,
    pub checkin_at: DateTime<Utc>,
    /// true si la asistencia ya estaba registrada (reintento)
    pub repetido: bool,
}

pub struct CheckinService {
    asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
    directorio: Arc<dyn PersonDirectory>,
}

impl CheckinService {
    pub fn new(
        asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
        directorio: Arc<dyn PersonDirectory>,
    ) -> Self {
        Self {
            asignaciones,
            directorio,
        }
    }

    /// Check-in directo por id de asignación. El compare-and-set ocurre
    /// bajo el candado de escritura: de dos check-ins concurrentes ambos
    /// regresan éxito pero solo el primero escribe el sello.
    pub async fn checkin(&self, assignment_id: Uuid) -> AppResult<ResultadoCheckin> {
        let mut asignaciones = self.asignaciones.write().await;
        let asignacion = asignaciones
            .get_mut(&assignment_id)
            .ok_or_else(|| not_found_error("Asignacion", &assignment_id.to_string()))?;

        if asignacion.asistio {
            if let Some(sello) = asignacion.checkin_at {
                return Ok(ResultadoCheckin {
                    assignment_id,
                    checkin_at: sello,
                    repetido: true,
                });
            }
        }

        let ahora = Utc::now();
        asignacion.asistio = true;
        asignacion.checkin_at = Some(ahora);
        info!("✅ Check-in asignación={} sello={}", assignment_id, ahora);

        Ok(ResultadoCheckin {
            assignment_id,
            checkin_at: ahora,
            repetido: false,
        })
    }

    /// Check-in resolviendo la asignación por clave de elector + evento
    pub async fn checkin_por_clave(
        &self,
        clave_elector: &str,
        event_id: Uuid,
    ) -> AppResult<ResultadoCheckin> {
        let persona = self
            .directorio
            .buscar_por_clave_elector(clave_elector)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no hay persona con clave de elector '{}'",
                    clave_elector
                ))
            })?;

        let assignment_id = {
            let asignaciones = self.asignaciones.read().await;
            asignaciones
                .values()
                .find(|a| a.event_id == event_id && a.person_id == persona.id)
                .map(|a| a.id)
        }
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "la persona {} no tiene asignación para el evento {}",
                persona.id, event_id
            ))
        })?;

        self.checkin(assignment_id).await
    }

    /// Check-in mediado por QR: decodifica el token opaco y converge en
    /// la misma transición. La falla de decodificación es TOKEN_INVALIDO,
    /// nunca un "no encontrado".
    pub async fn checkin_por_token(&self, token: &str) -> AppResult<ResultadoCheckin> {
        let assignment_id = decodificar_token(token)?;
        self.checkin(assignment_id).await
    }
}
