//! Servicio de autorización por capacidades
//!
//! El motor no decide políticas: cada operación expone una etiqueta
//! `required_capability` y aquí vive la lista blanca por rol que el
//! colaborador de políticas consulta en `/api/capacidades`. Los
//! handlers exigen la capacidad antes de tocar los servicios.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::auth::{Identidad, Rol};
use crate::utils::errors::{AppError, AppResult};

/// Capacidades del motor de movilización
pub mod capacidades {
    pub const MOVILIZACION_WRITE: &str = "movilizacion.write";
    pub const MOVILIZACION_VIEW: &str = "movilizacion.view";
    pub const ASISTENCIA_CHECKIN: &str = "asistencia.checkin";
    pub const TRACKING_REPORT: &str = "tracking.report";
    pub const TRACKING_VIEW_ALL: &str = "tracking.view_all";
    pub const REPORTES_VIEW: &str = "reportes.view";
    pub const REGISTRO_WRITE: &str = "registro.write";
}

/// Operación expuesta y su capacidad requerida
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Operacion {
    pub operacion: &'static str,
    pub required_capability: &'static str,
}

/// Catálogo operación → capacidad para el colaborador de políticas
pub const OPERACIONES: &[Operacion] = &[
    Operacion { operacion: "movilizacion.asignar", required_capability: capacidades::MOVILIZACION_WRITE },
    Operacion { operacion: "movilizacion.quitar", required_capability: capacidades::MOVILIZACION_WRITE },
    Operacion { operacion: "movilizacion.reasignar", required_capability: capacidades::MOVILIZACION_WRITE },
    Operacion { operacion: "movilizacion.listar", required_capability: capacidades::MOVILIZACION_VIEW },
    Operacion { operacion: "asistencia.checkin", required_capability: capacidades::ASISTENCIA_CHECKIN },
    Operacion { operacion: "tracking.start", required_capability: capacidades::TRACKING_REPORT },
    Operacion { operacion: "tracking.report", required_capability: capacidades::TRACKING_REPORT },
    Operacion { operacion: "tracking.stop", required_capability: capacidades::TRACKING_REPORT },
    Operacion { operacion: "tracking.activos", required_capability: capacidades::TRACKING_VIEW_ALL },
    Operacion { operacion: "reportes.stats", required_capability: capacidades::REPORTES_VIEW },
    Operacion { operacion: "reportes.ranking", required_capability: capacidades::REPORTES_VIEW },
    Operacion { operacion: "reportes.historico", required_capability: capacidades::REPORTES_VIEW },
    Operacion { operacion: "registro.alta", required_capability: capacidades::REGISTRO_WRITE },
];

lazy_static! {
    /// Lista blanca de capacidades por rol
    static ref CAPACIDADES_POR_ROL: HashMap<Rol, Vec<&'static str>> = {
        use capacidades::*;
        let mut mapa = HashMap::new();
        mapa.insert(Rol::Admin, vec![
            MOVILIZACION_WRITE, MOVILIZACION_VIEW, ASISTENCIA_CHECKIN,
            TRACKING_REPORT, TRACKING_VIEW_ALL, REPORTES_VIEW, REGISTRO_WRITE,
        ]);
        mapa.insert(Rol::Organizador, vec![
            MOVILIZACION_WRITE, MOVILIZACION_VIEW, ASISTENCIA_CHECKIN,
            TRACKING_VIEW_ALL, REPORTES_VIEW, REGISTRO_WRITE,
        ]);
        mapa.insert(Rol::Lider, vec![
            MOVILIZACION_WRITE, MOVILIZACION_VIEW, ASISTENCIA_CHECKIN, REPORTES_VIEW,
        ]);
        mapa.insert(Rol::Movilizador, vec![
            MOVILIZACION_VIEW, ASISTENCIA_CHECKIN, TRACKING_REPORT,
        ]);
        mapa.insert(Rol::Observador, vec![
            MOVILIZACION_VIEW, TRACKING_VIEW_ALL, REPORTES_VIEW,
        ]);
        mapa
    };
}

/// ¿El rol tiene la capacidad?
pub fn tiene_capacidad(rol: Rol, capacidad: &str) -> bool {
    CAPACIDADES_POR_ROL
        .get(&rol)
        .map(|caps| caps.contains(&capacidad))
        .unwrap_or(false)
}

/// Exigir una capacidad; Forbidden si el rol no la tiene
pub fn exigir(identidad: &Identidad, capacidad: &str) -> AppResult<()> {
    if tiene_capacidad(identidad.rol, capacidad) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "el rol '{}' no tiene la capacidad '{}'",
            identidad.rol, capacidad
        )))
    }
}

/// Mapa rol → capacidades para el endpoint `/api/capacidades`
pub fn mapa_capacidades() -> HashMap<String, Vec<&'static str>> {
    Rol::todos()
        .iter()
        .map(|rol| {
            (
                rol.to_string(),
                CAPACIDADES_POR_ROL.get(rol).cloned().unwrap_or_default(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_lista_blanca_por_rol() {
        use capacidades::*;

        // el movilizador reporta tracking pero no asigna
        assert!(tiene_capacidad(Rol::Movilizador, TRACKING_REPORT));
        assert!(!tiene_capacidad(Rol::Movilizador, MOVILIZACION_WRITE));

        // el observador solo mira
        assert!(tiene_capacidad(Rol::Observador, TRACKING_VIEW_ALL));
        assert!(!tiene_capacidad(Rol::Observador, ASISTENCIA_CHECKIN));

        // el admin tiene todo el catálogo
        for operacion in OPERACIONES {
            assert!(tiene_capacidad(Rol::Admin, operacion.required_capability));
        }
    }

    #[test]
    fn test_exigir_forbidden() {
        let observador = Identidad {
            usuario_id: Uuid::new_v4(),
            rol: Rol::Observador,
        };
        let err = exigir(&observador, capacidades::MOVILIZACION_WRITE).unwrap_err();
        assert_eq!(err.codigo(), "FORBIDDEN");
        assert!(exigir(&observador, capacidades::REPORTES_VIEW).is_ok());
    }

    #[test]
    fn test_catalogo_cubre_todos_los_roles() {
        let mapa = mapa_capacidades();
        assert_eq!(mapa.len(), Rol::todos().len());
        assert!(!mapa["admin"].is_empty());
    }
}
