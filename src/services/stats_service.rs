//! Motor de agregación
//!
//! Operaciones puras de lectura que proyectan asignaciones, check-ins y
//! sesiones de tracking en porcentajes de asistencia y movilización.
//! Nunca son fuente de verdad: se recalculan en cada consulta.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::reportes_dto::{
    EstadisticasEvento, GrupoHistorico, RankingVehiculo, ReporteHistorico,
};
use crate::models::assignment::Asignacion;
use crate::services::registry_service::RegistryService;
use crate::services::tracking_service::TrackingService;
use crate::utils::errors::AppResult;

pub struct StatsService {
    registro: Arc<RegistryService>,
    asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
    tracking: Arc<TrackingService>,
}

/// round(100 * parte / total); 0 cuando total es 0 (sin división entre cero)
fn porcentaje(parte: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((parte as f64 / total as f64) * 100.0).round() as u32
    }
}

impl StatsService {
    pub fn new(
        registro: Arc<RegistryService>,
        asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
        tracking: Arc<TrackingService>,
    ) -> Self {
        Self {
            registro,
            asignaciones,
            tracking,
        }
    }

    /// Totales y porcentajes de un evento. "Movilizada" = asistió y su
    /// (evento, vehículo) tuvo alguna sesión de tracking; es señal de
    /// cortesía, no requisito de la asistencia.
    pub async fn estadisticas_evento(&self, event_id: Uuid) -> AppResult<EstadisticasEvento> {
        // el evento debe existir aunque no tenga asignaciones
        self.registro.evento(event_id).await?;

        let del_evento: Vec<Asignacion> = self
            .asignaciones
            .read()
            .await
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();

        let total_asignadas = del_evento.len();
        let total_asistencias = del_evento.iter().filter(|a| a.asistio).count();

        let mut total_movilizadas = 0;
        for asignacion in del_evento.iter().filter(|a| a.asistio) {
            if self
                .tracking
                .hubo_sesion(event_id, asignacion.vehicle_id)
                .await
            {
                total_movilizadas += 1;
            }
        }

        Ok(EstadisticasEvento {
            event_id,
            total_asignadas,
            total_asistencias,
            total_movilizadas,
            pct_asistencia: porcentaje(total_asistencias, total_asignadas),
            pct_movilizacion: porcentaje(total_movilizadas, total_asignadas),
        })
    }

    /// Ranking de vehículos del evento: % de asistencia descendente,
    /// empates por asistencias totales descendente y luego id de
    /// vehículo ascendente (orden reproducible)
    pub async fn ranking_vehiculos(&self, event_id: Uuid) -> AppResult<Vec<RankingVehiculo>> {
        self.registro.evento(event_id).await?;

        let mut por_vehiculo: BTreeMap<Uuid, (usize, usize)> = BTreeMap::new();
        for asignacion in self.asignaciones.read().await.values() {
            if asignacion.event_id != event_id {
                continue;
            }
            let conteo = por_vehiculo.entry(asignacion.vehicle_id).or_insert((0, 0));
            conteo.0 += 1;
            if asignacion.asistio {
                conteo.1 += 1;
            }
        }

        let mut renglones = Vec::with_capacity(por_vehiculo.len());
        for (vehicle_id, (asignadas, asistencias)) in por_vehiculo {
            let placa = self
                .registro
                .vehiculo(vehicle_id)
                .await
                .ok()
                .and_then(|v| v.placa);
            renglones.push(RankingVehiculo {
                vehicle_id,
                placa,
                total_asignadas: asignadas,
                total_asistencias: asistencias,
                pct_asistencia: porcentaje(asistencias, asignadas),
            });
        }

        renglones.sort_by(|a, b| {
            b.pct_asistencia
                .cmp(&a.pct_asistencia)
                .then(b.total_asistencias.cmp(&a.total_asistencias))
                .then(a.vehicle_id.cmp(&b.vehicle_id))
        });
        Ok(renglones)
    }

    /// Reporte histórico: eventos con fecha programada anterior al corte,
    /// agrupados por tipo y por mes calendario. Promedios como media
    /// simple entre eventos, sin ponderar por tamaño.
    pub async fn reporte_historico(&self, corte: DateTime<Utc>) -> AppResult<ReporteHistorico> {
        let historicos: Vec<_> = self
            .registro
            .eventos_todos()
            .await
            .into_iter()
            .filter(|e| e.fecha_programada < corte)
            .collect();

        let mut pares: Vec<(String, String, EstadisticasEvento)> = Vec::new();
        for evento in &historicos {
            let stats = self.estadisticas_evento(evento.id).await?;
            pares.push((evento.tipo.clone(), evento.mes_calendario(), stats));
        }

        let global = promediar(pares.iter().map(|(_, _, s)| s));

        let mut por_tipo: BTreeMap<String, Vec<&EstadisticasEvento>> = BTreeMap::new();
        let mut por_mes: BTreeMap<String, Vec<&EstadisticasEvento>> = BTreeMap::new();
        for (tipo, mes, stats) in &pares {
            por_tipo.entry(tipo.clone()).or_default().push(stats);
            por_mes.entry(mes.clone()).or_default().push(stats);
        }

        Ok(ReporteHistorico {
            corte,
            eventos_incluidos: historicos.len(),
            global,
            por_tipo: por_tipo
                .into_iter()
                .map(|(k, v)| (k, promediar(v.into_iter())))
                .collect(),
            por_mes: por_mes
                .into_iter()
                .map(|(k, v)| (k, promediar(v.into_iter())))
                .collect(),
        })
    }
}

/// Media simple de los porcentajes de un conjunto de eventos
fn promediar<'a, I>(stats: I) -> GrupoHistorico
where
    I: Iterator<Item = &'a EstadisticasEvento>,
{
    let mut eventos = 0usize;
    let mut suma_asistencia = 0u64;
    let mut suma_movilizacion = 0u64;
    for s in stats {
        eventos += 1;
        suma_asistencia += s.pct_asistencia as u64;
        suma_movilizacion += s.pct_movilizacion as u64;
    }

    if eventos == 0 {
        return GrupoHistorico {
            eventos: 0,
            prom_pct_asistencia: 0.0,
            prom_pct_movilizacion: 0.0,
        };
    }
    GrupoHistorico {
        eventos,
        prom_pct_asistencia: suma_asistencia as f64 / eventos as f64,
        prom_pct_movilizacion: suma_movilizacion as f64 / eventos as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Rol;
    use crate::models::tracking::{ContextoSesion, LlaveSesion};
    use crate::models::vehicle::TipoVehiculo;
    use chrono::Duration;

    struct Armado {
        registro: Arc<RegistryService>,
        asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
        tracking: Arc<TrackingService>,
        stats: StatsService,
    }

    fn armar() -> Armado {
        let registro = Arc::new(RegistryService::new(24));
        let asignaciones = Arc::new(RwLock::new(HashMap::new()));
        let tracking = Arc::new(TrackingService::new());
        let stats = StatsService::new(registro.clone(), asignaciones.clone(), tracking.clone());
        Armado {
            registro,
            asignaciones,
            tracking,
            stats,
        }
    }

    async fn sembrar_asignaciones(
        armado: &Armado,
        event_id: Uuid,
        vehicle_id: Uuid,
        total: usize,
        asistieron: usize,
    ) {
        let mut mapa = armado.asignaciones.write().await;
        for i in 0..total {
            let mut asignacion = Asignacion::new(event_id, vehicle_id, Uuid::new_v4(), None);
            if i < asistieron {
                asignacion.asistio = true;
                asignacion.checkin_at = Some(Utc::now());
            }
            mapa.insert(asignacion.id, asignacion);
        }
    }

    #[tokio::test]
    async fn test_diez_asignadas_siete_asistieron_da_70() {
        let armado = armar();
        let evento = armado
            .registro
            .alta_evento("Mitin".into(), "mitin".into(), Utc::now())
            .await;
        let vehiculo = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Autobus, 40, None, None)
            .await;
        sembrar_asignaciones(&armado, evento.id, vehiculo.id, 10, 7).await;

        let stats = armado.stats.estadisticas_evento(evento.id).await.unwrap();
        assert_eq!(stats.total_asignadas, 10);
        assert_eq!(stats.total_asistencias, 7);
        assert_eq!(stats.pct_asistencia, 70);
    }

    #[tokio::test]
    async fn test_evento_sin_asignadas_da_cero() {
        let armado = armar();
        let evento = armado
            .registro
            .alta_evento("Vacío".into(), "mitin".into(), Utc::now())
            .await;

        let stats = armado.stats.estadisticas_evento(evento.id).await.unwrap();
        assert_eq!(stats.pct_asistencia, 0);
        assert_eq!(stats.pct_movilizacion, 0);
    }

    #[tokio::test]
    async fn test_movilizadas_requiere_sesion_de_tracking() {
        let armado = armar();
        let evento = armado
            .registro
            .alta_evento("Mitin".into(), "mitin".into(), Utc::now())
            .await;
        let con_sesion = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Van, 10, None, None)
            .await;
        let sin_sesion = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Van, 10, None, None)
            .await;

        sembrar_asignaciones(&armado, evento.id, con_sesion.id, 4, 4).await;
        sembrar_asignaciones(&armado, evento.id, sin_sesion.id, 4, 4).await;

        armado
            .tracking
            .iniciar(
                LlaveSesion {
                    usuario_id: Uuid::new_v4(),
                    event_id: evento.id,
                    vehicle_id: con_sesion.id,
                },
                Rol::Movilizador,
                ContextoSesion::default(),
            )
            .await;

        let stats = armado.stats.estadisticas_evento(evento.id).await.unwrap();
        assert_eq!(stats.total_asistencias, 8);
        // solo las del vehículo con sesión cuentan como movilizadas
        assert_eq!(stats.total_movilizadas, 4);
        assert_eq!(stats.pct_movilizacion, 50);
    }

    #[tokio::test]
    async fn test_ranking_orden_deterministico() {
        let armado = armar();
        let evento = armado
            .registro
            .alta_evento("Mitin".into(), "mitin".into(), Utc::now())
            .await;
        let v_alto = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Van, 10, Some("AAA-111".into()), None)
            .await;
        let v_bajo = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Van, 10, Some("BBB-222".into()), None)
            .await;
        let v_empate = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Van, 10, None, None)
            .await;

        sembrar_asignaciones(&armado, evento.id, v_alto.id, 4, 4).await; // 100%
        sembrar_asignaciones(&armado, evento.id, v_bajo.id, 4, 1).await; // 25%
        sembrar_asignaciones(&armado, evento.id, v_empate.id, 2, 2).await; // 100%, menos asistencias

        let ranking = armado.stats.ranking_vehiculos(evento.id).await.unwrap();
        assert_eq!(ranking.len(), 3);
        // empate en 100%: gana el de más asistencias totales
        assert_eq!(ranking[0].vehicle_id, v_alto.id);
        assert_eq!(ranking[1].vehicle_id, v_empate.id);
        assert_eq!(ranking[2].vehicle_id, v_bajo.id);
        assert_eq!(ranking[0].placa.as_deref(), Some("AAA-111"));
    }

    #[tokio::test]
    async fn test_historico_respeta_corte() {
        let armado = armar();
        let ahora = Utc::now();

        // un evento dentro de la ventana del corte y otro muy anterior
        let reciente = armado
            .registro
            .alta_evento("Reciente".into(), "mitin".into(), ahora - Duration::hours(2))
            .await;
        let viejo = armado
            .registro
            .alta_evento("Viejo".into(), "asamblea".into(), ahora - Duration::days(40))
            .await;
        let vehiculo = armado
            .registro
            .alta_vehiculo(TipoVehiculo::Autobus, 40, None, None)
            .await;
        sembrar_asignaciones(&armado, reciente.id, vehiculo.id, 10, 5).await;
        sembrar_asignaciones(&armado, viejo.id, vehiculo.id, 10, 7).await;

        // corte por defecto (ahora − 24h): solo el de 40 días es histórico
        let reporte = armado
            .stats
            .reporte_historico(ahora - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(reporte.eventos_incluidos, 1);
        assert_eq!(reporte.global.prom_pct_asistencia, 70.0);
        assert!(reporte.por_tipo.contains_key("asamblea"));
        assert!(!reporte.por_tipo.contains_key("mitin"));

        // corte en el presente: entran ambos; media simple (50+70)/2
        let reporte = armado.stats.reporte_historico(ahora).await.unwrap();
        assert_eq!(reporte.eventos_incluidos, 2);
        assert_eq!(reporte.global.prom_pct_asistencia, 60.0);
    }
}
