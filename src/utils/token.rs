//! Códec del token QR de asistencia
//!
//! El colaborador de invitaciones emite tokens opacos que embeben el
//! identificador de la asignación; el motor solo los decodifica de
//! vuelta al `assignment_id`. Cualquier falla de decodificación es
//! `TOKEN_INVALIDO`, nunca un "no encontrado" silencioso.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use uuid::Uuid;

use crate::utils::errors::AppError;

const PREFIJO: &str = "asistencia:";

/// Codifica un id de asignación como token QR opaco
pub fn codificar_token(assignment_id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(format!("{}{}", PREFIJO, assignment_id))
}

/// Decodifica un token QR de vuelta al id de asignación
pub fn decodificar_token(token: &str) -> Result<Uuid, AppError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|_| AppError::InvalidToken("el token no es base64 válido".to_string()))?;

    let texto = String::from_utf8(bytes)
        .map_err(|_| AppError::InvalidToken("el token no es UTF-8 válido".to_string()))?;

    let id = texto
        .strip_prefix(PREFIJO)
        .ok_or_else(|| AppError::InvalidToken("el token no es de asistencia".to_string()))?;

    Uuid::parse_str(id)
        .map_err(|_| AppError::InvalidToken("el token no contiene un id válido".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ida_y_vuelta() {
        let id = Uuid::new_v4();
        let token = codificar_token(id);
        assert_eq!(decodificar_token(&token).unwrap(), id);
    }

    #[test]
    fn test_token_basura_es_invalido() {
        for basura in ["", "!!!", "bm8tZXMtYXNpc3RlbmNpYQ", "asistencia:123"] {
            let err = decodificar_token(basura).unwrap_err();
            assert_eq!(err.codigo(), "TOKEN_INVALIDO");
        }
    }
}
