//! Modelo de Evento
//!
//! Un evento de movilización tiene una fecha programada y pasa a ser
//! histórico cuando transcurre más del corte configurado (24h por defecto)
//! desde esa fecha.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Evento de movilización
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evento {
    pub id: Uuid,
    pub nombre: String,
    /// Tipo de evento (mitin, asamblea, brigada, ...) - se usa para
    /// agrupar en el reporte histórico
    pub tipo: String,
    pub fecha_programada: DateTime<Utc>,
    pub activo: bool,
    pub creado_en: DateTime<Utc>,
}

impl Evento {
    pub fn new(nombre: String, tipo: String, fecha_programada: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nombre,
            tipo,
            fecha_programada,
            activo: true,
            creado_en: Utc::now(),
        }
    }

    /// Un evento es histórico cuando pasaron más de `corte_horas` horas
    /// desde su fecha programada
    pub fn es_historico(&self, ahora: DateTime<Utc>, corte_horas: i64) -> bool {
        ahora - self.fecha_programada > Duration::hours(corte_horas)
    }

    /// Mes calendario del evento en formato YYYY-MM (agrupación histórica)
    pub fn mes_calendario(&self) -> String {
        self.fecha_programada.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evento_historico_tras_corte() {
        let ahora = Utc::now();
        let reciente = Evento::new(
            "Mitin centro".to_string(),
            "mitin".to_string(),
            ahora - Duration::hours(2),
        );
        let viejo = Evento::new(
            "Asamblea norte".to_string(),
            "asamblea".to_string(),
            ahora - Duration::days(40),
        );

        assert!(!reciente.es_historico(ahora, 24));
        assert!(viejo.es_historico(ahora, 24));
    }

    #[test]
    fn test_mes_calendario() {
        let mut evento = Evento::new(
            "Mitin".to_string(),
            "mitin".to_string(),
            Utc::now(),
        );
        evento.fecha_programada = "2026-03-15T10:00:00Z".parse().unwrap();
        assert_eq!(evento.mes_calendario(), "2026-03");
    }
}
