//! DTOs de reportes y estadísticas
//!
//! Proyecciones de solo lectura: nunca son fuente de verdad, se derivan
//! de asignaciones, check-ins y sesiones de tracking en el momento de
//! la consulta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Estadísticas de un evento
#[derive(Debug, Clone, Serialize)]
pub struct EstadisticasEvento {
    pub event_id: Uuid,
    pub total_asignadas: usize,
    pub total_asistencias: usize,
    /// Asistencias ligadas a una sesión de tracking del (evento, vehículo)
    pub total_movilizadas: usize,
    /// round(100 * asistencias / asignadas); 0 si no hay asignadas
    pub pct_asistencia: u32,
    pub pct_movilizacion: u32,
}

/// Renglón del ranking de vehículos de un evento
#[derive(Debug, Clone, Serialize)]
pub struct RankingVehiculo {
    pub vehicle_id: Uuid,
    pub placa: Option<String>,
    pub total_asignadas: usize,
    pub total_asistencias: usize,
    pub pct_asistencia: u32,
}

/// Promedios de un grupo del reporte histórico
#[derive(Debug, Clone, Serialize)]
pub struct GrupoHistorico {
    pub eventos: usize,
    /// Media simple entre eventos, sin ponderar por tamaño
    pub prom_pct_asistencia: f64,
    pub prom_pct_movilizacion: f64,
}

/// Reporte histórico: eventos con fecha anterior al corte, agrupados
/// por tipo y por mes calendario
#[derive(Debug, Serialize)]
pub struct ReporteHistorico {
    pub corte: DateTime<Utc>,
    pub eventos_incluidos: usize,
    pub global: GrupoHistorico,
    pub por_tipo: BTreeMap<String, GrupoHistorico>,
    pub por_mes: BTreeMap<String, GrupoHistorico>,
}

/// Query del reporte histórico; sin `corte` se usa ahora − 24h
#[derive(Debug, Default, Deserialize)]
pub struct HistoricoQuery {
    pub corte: Option<DateTime<Utc>>,
}
