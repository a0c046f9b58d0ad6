//! Identidad y roles
//!
//! La autenticación es responsabilidad de un colaborador externo: la
//! identidad llega ya verificada en headers (`x-usuario-id`, `x-rol`).
//! Este módulo solo tipa esa identidad y el catálogo de roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Roles del sistema de movilización
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Organizador,
    Lider,
    Movilizador,
    Observador,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Organizador => "organizador",
            Rol::Lider => "lider",
            Rol::Movilizador => "movilizador",
            Rol::Observador => "observador",
        }
    }

    pub fn todos() -> &'static [Rol] {
        &[
            Rol::Admin,
            Rol::Organizador,
            Rol::Lider,
            Rol::Movilizador,
            Rol::Observador,
        ]
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Rol::Admin),
            "organizador" => Ok(Rol::Organizador),
            "lider" => Ok(Rol::Lider),
            "movilizador" => Ok(Rol::Movilizador),
            "observador" => Ok(Rol::Observador),
            otro => Err(format!("rol desconocido: '{}'", otro)),
        }
    }
}

/// Identidad del llamador que se inyecta en las requests.
/// El motor la confía; nunca emite ni valida credenciales.
#[derive(Debug, Clone)]
pub struct Identidad {
    pub usuario_id: Uuid,
    pub rol: Rol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rol_desde_header() {
        assert_eq!("Movilizador".parse::<Rol>().unwrap(), Rol::Movilizador);
        assert_eq!("admin".parse::<Rol>().unwrap(), Rol::Admin);
        assert!("capturista".parse::<Rol>().is_err());
    }
}
