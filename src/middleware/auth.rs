//! Middleware de identidad
//!
//! La autenticación la hace un colaborador externo; para cuando una
//! request llega aquí ya viene con la identidad verificada en los
//! headers `x-usuario-id` y `x-rol`. Este middleware solo la tipa y la
//! inyecta como extensión; el motor la confía pero nunca emite ni
//! valida credenciales.

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::models::auth::{Identidad, Rol};
use crate::utils::errors::AppError;

pub const HEADER_USUARIO: &str = "x-usuario-id";
pub const HEADER_ROL: &str = "x-rol";

/// Extrae la identidad del llamador y la inyecta en la request
pub async fn identidad_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let usuario_id = request
        .headers()
        .get(HEADER_USUARIO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| {
            AppError::Unauthorized(format!("falta o es inválido el header {}", HEADER_USUARIO))
        })?;

    let rol: Rol = request
        .headers()
        .get(HEADER_ROL)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| {
            AppError::Unauthorized(format!("falta o es inválido el header {}", HEADER_ROL))
        })?;

    request.extensions_mut().insert(Identidad { usuario_id, rol });
    Ok(next.run(request).await)
}
