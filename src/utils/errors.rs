//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del motor de movilización
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// El vehículo ya no tiene cupo para el evento
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// La persona ya tiene una asignación viva para el evento
    #[error("Duplicate assignment: {0}")]
    DuplicateAssignment(String),

    /// La asignación ya registró asistencia (fallo duro en quitar persona;
    /// en check-in la reintención es éxito idempotente y no pasa por aquí)
    #[error("Already attended: {0}")]
    AlreadyAttended(String),

    /// El token QR no decodifica a un identificador de asignación
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No hay sesión de tracking activa para la llave
    #[error("Session not active: {0}")]
    SessionNotActive(String),

    /// Ya hay sesión activa para la llave (solo informativo; start con
    /// llave idéntica refresca en lugar de fallar)
    #[error("Session already active: {0}")]
    SessionAlreadyActive(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Código estable que consumen los clientes (UI móvil y dashboards)
    pub fn codigo(&self) -> &'static str {
        match self {
            AppError::CapacityExceeded(_) => "CUPO_EXCEDIDO",
            AppError::DuplicateAssignment(_) => "ASIGNACION_DUPLICADA",
            AppError::AlreadyAttended(_) => "YA_ASISTIO",
            AppError::InvalidToken(_) => "TOKEN_INVALIDO",
            AppError::SessionNotActive(_) => "SESION_INACTIVA",
            AppError::SessionAlreadyActive(_) => "SESION_ACTIVA",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::CapacityExceeded(_)
            | AppError::DuplicateAssignment(_)
            | AppError::AlreadyAttended(_)
            | AppError::SessionNotActive(_)
            | AppError::SessionAlreadyActive(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidToken(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("⚠️  {}: {}", self.codigo(), self);

        let (error, message, details) = match &self {
            AppError::Validation(e) => (
                "Validation Error".to_string(),
                "Los datos proporcionados no son válidos".to_string(),
                Some(json!(e)),
            ),
            AppError::Internal(msg) => (
                "Internal Server Error".to_string(),
                "Ocurrió un error inesperado".to_string(),
                Some(json!({ "internal_error": msg })),
            ),
            otro => (otro.codigo().to_string(), otro.to_string(), None),
        };

        let body = ErrorResponse {
            error,
            message,
            details,
            code: Some(self.codigo().to_string()),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
