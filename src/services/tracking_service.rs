//! Gestor de sesiones de tracking en vivo
//!
//! Máquina de estados por llave (usuario, evento, vehículo):
//! `inactiva -> activa` en start, `activa -> inactiva` en stop explícito
//! o por barrido de staleness. Las sesiones se guardan tras detenerse
//! para conservar la señal "alguna vez activa" que consume el motor de
//! agregación.
//!
//! El mapa exterior solo protege la estructura; cada sesión vive tras su
//! propio candado, así los reportes de llaves distintas no se bloquean
//! entre sí.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::auth::Rol;
use crate::models::tracking::{
    ContextoSesion, EstatusSesion, LlaveSesion, Posicion, SesionTracking,
};
use crate::utils::errors::{AppError, AppResult};

/// Campos de un reporte periódico de posición
#[derive(Debug, Clone)]
pub struct ReportePosicion {
    pub lat: f64,
    pub lon: f64,
    pub velocidad: Option<f64>,
    pub bateria: Option<f64>,
    pub rumbo: Option<f64>,
    pub direccion: Option<String>,
}

#[derive(Default)]
pub struct TrackingService {
    sesiones: RwLock<HashMap<LlaveSesion, Arc<RwLock<SesionTracking>>>>,
}

impl TrackingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iniciar sesión. Start con llave idéntica mientras está activa no
    /// es error: refresca el contexto y regresa la sesión (los clientes
    /// móviles reintentan el start en cada ciclo tras una falla).
    pub async fn iniciar(
        &self,
        llave: LlaveSesion,
        rol: Rol,
        contexto: ContextoSesion,
    ) -> SesionTracking {
        let ahora = Utc::now();
        let celda = {
            let mut sesiones = self.sesiones.write().await;
            match sesiones.get(&llave) {
                Some(celda) => celda.clone(),
                None => {
                    let sesion = SesionTracking::new(llave, rol, contexto, ahora);
                    sesiones.insert(llave, Arc::new(RwLock::new(sesion.clone())));
                    info!(
                        "📡 Sesión iniciada usuario={} evento={} vehículo={}",
                        llave.usuario_id, llave.event_id, llave.vehicle_id
                    );
                    return sesion;
                }
            }
        };

        let mut sesion = celda.write().await;
        if sesion.esta_activa() {
            // refresh suave, no SESION_ACTIVA
            sesion.contexto = contexto;
            info!("🔄 Sesión refrescada usuario={} evento={}", llave.usuario_id, llave.event_id);
        } else {
            // reactivación de una sesión detenida o barrida
            sesion.estatus = EstatusSesion::Activa;
            sesion.iniciada_en = ahora;
            sesion.ultimo_reporte_en = ahora;
            sesion.rol = rol;
            sesion.contexto = contexto;
            info!(
                "📡 Sesión reactivada usuario={} evento={} vehículo={}",
                llave.usuario_id, llave.event_id, llave.vehicle_id
            );
        }
        sesion.clone()
    }

    /// Ingesta de un reporte de posición. Sin filtro de plausibilidad:
    /// esta capa es bitácora, no validadora física.
    pub async fn reportar(
        &self,
        llave: LlaveSesion,
        reporte: ReportePosicion,
        ahora: DateTime<Utc>,
    ) -> AppResult<SesionTracking> {
        let celda = self
            .sesiones
            .read()
            .await
            .get(&llave)
            .cloned()
            .ok_or_else(|| sesion_no_activa(&llave))?;

        let mut sesion = celda.write().await;
        if !sesion.esta_activa() {
            return Err(sesion_no_activa(&llave));
        }

        sesion.posicion = Some(Posicion {
            lat: reporte.lat,
            lon: reporte.lon,
        });
        sesion.velocidad = reporte.velocidad;
        if reporte.bateria.is_some() {
            sesion.bateria = reporte.bateria;
        }
        if reporte.rumbo.is_some() {
            sesion.rumbo = reporte.rumbo;
        }
        if reporte.direccion.is_some() {
            sesion.direccion = reporte.direccion;
        }
        sesion.ultimo_reporte_en = ahora;
        Ok(sesion.clone())
    }

    /// Detener sesión. Idempotente: detener una inactiva (o inexistente)
    /// es no-op exitoso.
    pub async fn detener(&self, llave: LlaveSesion) -> bool {
        let celda = match self.sesiones.read().await.get(&llave).cloned() {
            Some(celda) => celda,
            None => return false,
        };

        let mut sesion = celda.write().await;
        if !sesion.esta_activa() {
            return false;
        }
        sesion.estatus = EstatusSesion::Inactiva;
        info!("🛑 Sesión detenida usuario={} evento={}", llave.usuario_id, llave.event_id);
        true
    }

    /// Barrido de staleness: toda sesión activa sin reporte en más de
    /// `timeout` pasa a inactiva sin stop explícito (dispositivos que
    /// pierden conectividad sin despedirse). Regresa cuántas barrió.
    pub async fn barrido_staleness(&self, ahora: DateTime<Utc>, timeout: Duration) -> usize {
        let celdas: Vec<(LlaveSesion, Arc<RwLock<SesionTracking>>)> = self
            .sesiones
            .read()
            .await
            .iter()
            .map(|(llave, celda)| (*llave, celda.clone()))
            .collect();

        let mut barridas = 0;
        for (llave, celda) in celdas {
            let mut sesion = celda.write().await;
            if sesion.esta_activa() && ahora - sesion.ultimo_reporte_en > timeout {
                sesion.estatus = EstatusSesion::Inactiva;
                barridas += 1;
                warn!(
                    "🧹 Sesión barrida por staleness usuario={} evento={} último_reporte={}",
                    llave.usuario_id, llave.event_id, sesion.ultimo_reporte_en
                );
            }
        }
        barridas
    }

    /// Sesiones activas, opcionalmente filtradas por evento y/o roles
    /// permitidos. La autorización del que pregunta la aplica el
    /// colaborador de políticas; aquí solo se filtra por los criterios.
    pub async fn listar_activas(
        &self,
        event_id: Option<Uuid>,
        roles: Option<&[Rol]>,
    ) -> Vec<SesionTracking> {
        let celdas: Vec<Arc<RwLock<SesionTracking>>> =
            self.sesiones.read().await.values().cloned().collect();

        let mut activas = Vec::new();
        for celda in celdas {
            let sesion = celda.read().await;
            if !sesion.esta_activa() {
                continue;
            }
            if let Some(evento) = event_id {
                if sesion.llave.event_id != evento {
                    continue;
                }
            }
            if let Some(roles) = roles {
                if !roles.contains(&sesion.rol) {
                    continue;
                }
            }
            activas.push(sesion.clone());
        }
        activas.sort_by_key(|s| s.iniciada_en);
        activas
    }

    /// ¿Existe una sesión (activa o alguna vez activa) para el par
    /// (evento, vehículo)? Señal de cortesía del % de movilización.
    pub async fn hubo_sesion(&self, event_id: Uuid, vehicle_id: Uuid) -> bool {
        self.sesiones
            .read()
            .await
            .keys()
            .any(|llave| llave.event_id == event_id && llave.vehicle_id == vehicle_id)
    }
}

fn sesion_no_activa(llave: &LlaveSesion) -> AppError {
    AppError::SessionNotActive(format!(
        "no hay sesión activa para usuario={} evento={} vehículo={}",
        llave.usuario_id, llave.event_id, llave.vehicle_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llave() -> LlaveSesion {
        LlaveSesion {
            usuario_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
        }
    }

    fn reporte(lat: f64, lon: f64) -> ReportePosicion {
        ReportePosicion {
            lat,
            lon,
            velocidad: Some(42.5),
            bateria: Some(80.0),
            rumbo: None,
            direccion: Some("Av. Reforma 100".to_string()),
        }
    }

    #[tokio::test]
    async fn test_ciclo_start_report_stop() {
        let servicio = TrackingService::new();
        let llave = llave();

        let sesion = servicio.iniciar(llave, Rol::Movilizador, ContextoSesion::default()).await;
        assert!(sesion.esta_activa());

        let sesion = servicio
            .reportar(llave, reporte(19.4326, -99.1332), Utc::now())
            .await
            .unwrap();
        assert_eq!(sesion.posicion.as_ref().unwrap().lat, 19.4326);
        assert_eq!(sesion.bateria, Some(80.0));

        assert!(servicio.detener(llave).await);
        // reportar tras stop falla con SESION_INACTIVA
        let err = servicio
            .reportar(llave, reporte(19.43, -99.13), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.codigo(), "SESION_INACTIVA");
    }

    #[tokio::test]
    async fn test_stop_idempotente() {
        let servicio = TrackingService::new();
        let llave = llave();

        // detener sin sesión: no-op
        assert!(!servicio.detener(llave).await);

        servicio.iniciar(llave, Rol::Movilizador, ContextoSesion::default()).await;
        assert!(servicio.detener(llave).await);
        // segundo stop también es no-op exitoso
        assert!(!servicio.detener(llave).await);
    }

    #[tokio::test]
    async fn test_start_repetido_refresca_contexto() {
        let servicio = TrackingService::new();
        let llave = llave();

        servicio.iniciar(llave, Rol::Movilizador, ContextoSesion::default()).await;
        let contexto = ContextoSesion {
            nombre_evento: Some("Mitin".to_string()),
            placa: Some("ABC-123".to_string()),
            ocupacion: Some(8),
        };
        let sesion = servicio.iniciar(llave, Rol::Movilizador, contexto).await;

        assert!(sesion.esta_activa());
        assert_eq!(sesion.contexto.placa.as_deref(), Some("ABC-123"));
        assert_eq!(servicio.listar_activas(None, None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_barrido_staleness() {
        let servicio = TrackingService::new();
        let llave_callada = llave();
        let llave_viva = llave();
        let ahora = Utc::now();

        servicio.iniciar(llave_callada, Rol::Movilizador, ContextoSesion::default()).await;
        servicio.iniciar(llave_viva, Rol::Movilizador, ContextoSesion::default()).await;
        servicio
            .reportar(llave_viva, reporte(19.0, -99.0), ahora + Duration::seconds(80))
            .await
            .unwrap();

        // timeout 90s: la sesión sin reportes desde el inicio se barre
        let barridas = servicio
            .barrido_staleness(ahora + Duration::seconds(120), Duration::seconds(90))
            .await;
        assert_eq!(barridas, 1);

        let activas = servicio.listar_activas(None, None).await;
        assert_eq!(activas.len(), 1);
        assert_eq!(activas[0].llave, llave_viva);

        // la barrida quedó inactiva aunque nadie llamó stop
        let err = servicio
            .reportar(llave_callada, reporte(19.0, -99.0), ahora + Duration::seconds(121))
            .await
            .unwrap_err();
        assert_eq!(err.codigo(), "SESION_INACTIVA");
    }

    #[tokio::test]
    async fn test_listar_activas_con_filtros() {
        let servicio = TrackingService::new();
        let evento = Uuid::new_v4();
        let llave_a = LlaveSesion {
            usuario_id: Uuid::new_v4(),
            event_id: evento,
            vehicle_id: Uuid::new_v4(),
        };
        let llave_b = llave();

        servicio.iniciar(llave_a, Rol::Movilizador, ContextoSesion::default()).await;
        servicio.iniciar(llave_b, Rol::Lider, ContextoSesion::default()).await;

        assert_eq!(servicio.listar_activas(None, None).await.len(), 2);
        assert_eq!(servicio.listar_activas(Some(evento), None).await.len(), 1);
        assert_eq!(
            servicio
                .listar_activas(None, Some(&[Rol::Lider]))
                .await
                .len(),
            1
        );
        assert!(servicio
            .listar_activas(Some(evento), Some(&[Rol::Lider]))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_hubo_sesion_sobrevive_al_stop() {
        let servicio = TrackingService::new();
        let llave = llave();

        assert!(!servicio.hubo_sesion(llave.event_id, llave.vehicle_id).await);
        servicio.iniciar(llave, Rol::Movilizador, ContextoSesion::default()).await;
        servicio.detener(llave).await;
        // la señal "alguna vez activa" persiste
        assert!(servicio.hubo_sesion(llave.event_id, llave.vehicle_id).await);
    }
}
