//! Gestor de asignaciones
//!
//! Crea y quita ligas (evento, vehículo, persona) respetando el libro
//! de cupos. La comprobación de cupo y la inserción ocurren bajo un
//! candado por (evento, vehículo): dos asignaciones concurrentes por el
//! último lugar nunca sobrecupan, exactamente una gana.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::dto::movilizacion_dto::{EstatusAsignacion, ResultadoAsignacion};
use crate::models::assignment::Asignacion;
use crate::services::capacity_ledger::CapacityLedger;
use crate::services::registry_service::RegistryService;
use crate::utils::errors::{not_found_error, AppError, AppResult};

type CandadoCupo = Arc<Mutex<()>>;

pub struct AssignmentService {
    registro: Arc<RegistryService>,
    cupo: Arc<CapacityLedger>,
    asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
    /// Punto de serialización por (evento, vehículo) para la comprobación
    /// de cupo + inserción
    candados: Mutex<HashMap<(Uuid, Uuid), CandadoCupo>>,
}

impl AssignmentService {
    pub fn new(
        registro: Arc<RegistryService>,
        cupo: Arc<CapacityLedger>,
        asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
    ) -> Self {
        Self {
            registro,
            cupo,
            asignaciones,
            candados: Mutex::new(HashMap::new()),
        }
    }

    async fn candado_cupo(&self, event_id: Uuid, vehicle_id: Uuid) -> CandadoCupo {
        let mut candados = self.candados.lock().await;
        candados
            .entry((event_id, vehicle_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Asignación masiva: cada persona se evalúa y confirma por separado,
    /// el éxito parcial nunca exige rollback de las ya confirmadas
    pub async fn asignar(
        &self,
        event_id: Uuid,
        vehicle_id: Uuid,
        person_ids: &[Uuid],
        lider_id: Option<Uuid>,
    ) -> AppResult<Vec<ResultadoAsignacion>> {
        // El evento y el vehículo deben existir; esto sí aborta el lote
        let _evento = self.registro.evento(event_id).await?;
        let vehiculo = self.registro.vehiculo(vehicle_id).await?;
        if !vehiculo.activo {
            return Err(AppError::Conflict(format!(
                "el vehículo {} está inactivo",
                vehicle_id
            )));
        }

        let candado = self.candado_cupo(event_id, vehicle_id).await;
        let capacidad = vehiculo.capacidad as usize;
        let mut resultados = Vec::with_capacity(person_ids.len());

        for &person_id in person_ids {
            // Comprobación + inserción como paso indivisible por persona
            let _guard = candado.lock().await;
            resultados.push(
                self.asignar_una(event_id, vehicle_id, person_id, lider_id, capacidad)
                    .await,
            );
        }

        let asignadas = resultados
            .iter()
            .filter(|r| r.estatus == EstatusAsignacion::Asignada)
            .count();
        info!(
            "📋 Asignación masiva evento={} vehículo={}: {} de {} asignadas",
            event_id,
            vehicle_id,
            asignadas,
            person_ids.len()
        );
        Ok(resultados)
    }

    async fn asignar_una(
        &self,
        event_id: Uuid,
        vehicle_id: Uuid,
        person_id: Uuid,
        lider_id: Option<Uuid>,
        capacidad: usize,
    ) -> ResultadoAsignacion {
        let mut asignaciones = self.asignaciones.write().await;

        // A lo más una asignación viva por (persona, evento), sin importar
        // el vehículo
        if asignaciones
            .values()
            .any(|a| a.event_id == event_id && a.person_id == person_id)
        {
            debug!("Asignación duplicada: persona={} evento={}", person_id, event_id);
            return ResultadoAsignacion {
                person_id,
                estatus: EstatusAsignacion::Duplicada,
                assignment_id: None,
                mensaje: "la persona ya tiene asignación para este evento".to_string(),
            };
        }

        let ocupacion = asignaciones
            .values()
            .filter(|a| a.event_id == event_id && a.vehicle_id == vehicle_id)
            .count();
        if ocupacion + 1 > capacidad {
            debug!(
                "Cupo excedido: vehículo={} ocupación={} capacidad={}",
                vehicle_id, ocupacion, capacidad
            );
            return ResultadoAsignacion {
                person_id,
                estatus: EstatusAsignacion::CupoExcedido,
                assignment_id: None,
                mensaje: format!("el vehículo ya tiene {} de {} lugares", ocupacion, capacidad),
            };
        }

        let asignacion = Asignacion::new(event_id, vehicle_id, person_id, lider_id);
        let assignment_id = asignacion.id;
        asignaciones.insert(assignment_id, asignacion);

        ResultadoAsignacion {
            person_id,
            estatus: EstatusAsignacion::Asignada,
            assignment_id: Some(assignment_id),
            mensaje: "asignada".to_string(),
        }
    }

    /// Quitar persona: solo mientras no haya asistido. Una asistencia
    /// registrada es un hecho, nunca se borra en silencio.
    pub async fn quitar(&self, assignment_id: Uuid) -> AppResult<Asignacion> {
        let mut asignaciones = self.asignaciones.write().await;
        let asignacion = asignaciones
            .get(&assignment_id)
            .ok_or_else(|| not_found_error("Asignacion", &assignment_id.to_string()))?;

        if asignacion.asistio {
            return Err(AppError::AlreadyAttended(format!(
                "la asignación {} ya registró asistencia y no se puede quitar",
                assignment_id
            )));
        }

        // El remove libera el cupo de inmediato
        let quitada = asignaciones.remove(&assignment_id).ok_or_else(|| {
            AppError::Internal("la asignación desapareció bajo el candado".to_string())
        })?;
        info!("🗑️  Asignación {} quitada (cupo liberado)", assignment_id);
        Ok(quitada)
    }

    /// Reasignación jerárquica: cambia el líder responsable de la persona
    /// sin tocar sus ligas de vehículo ni los cupos
    pub async fn reasignar_lider(&self, person_id: Uuid, nuevo_lider_id: Uuid) -> usize {
        let mut asignaciones = self.asignaciones.write().await;
        let mut actualizadas = 0;
        for asignacion in asignaciones.values_mut() {
            if asignacion.person_id == person_id {
                asignacion.lider_id = Some(nuevo_lider_id);
                actualizadas += 1;
            }
        }
        actualizadas
    }

    pub async fn listar_por_evento(&self, event_id: Uuid) -> Vec<Asignacion> {
        let mut lista: Vec<Asignacion> = self
            .asignaciones
            .read()
            .await
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        lista.sort_by_key(|a| a.creada_en);
        lista
    }

    pub async fn listar_por_vehiculo(&self, event_id: Uuid, vehicle_id: Uuid) -> Vec<Asignacion> {
        let mut lista: Vec<Asignacion> = self
            .asignaciones
            .read()
            .await
            .values()
            .filter(|a| a.event_id == event_id && a.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        lista.sort_by_key(|a| a.creada_en);
        lista
    }

    /// ¿El vehículo tiene alguna asignación (en cualquier evento)?
    /// Bloquea el cambio de capacidad en el registro.
    pub async fn vehiculo_tiene_asignaciones(&self, vehicle_id: Uuid) -> bool {
        self.asignaciones
            .read()
            .await
            .values()
            .any(|a| a.vehicle_id == vehicle_id)
    }

    /// Ocupación actual vía el libro de cupos
    pub async fn ocupacion(&self, event_id: Uuid, vehicle_id: Uuid) -> usize {
        self.cupo.ocupacion(event_id, vehicle_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::TipoVehiculo;
    use chrono::{Duration, Utc};

    async fn armar() -> (Arc<RegistryService>, Arc<AssignmentService>) {
        let registro = Arc::new(RegistryService::new(24));
        let asignaciones = Arc::new(RwLock::new(HashMap::new()));
        let cupo = Arc::new(CapacityLedger::new(registro.clone(), asignaciones.clone()));
        let servicio = Arc::new(AssignmentService::new(
            registro.clone(),
            cupo,
            asignaciones,
        ));
        (registro, servicio)
    }

    #[tokio::test]
    async fn test_escenario_cupo_dos_lugares() {
        let (registro, servicio) = armar().await;
        let evento = registro
            .alta_evento("Mitin".into(), "mitin".into(), Utc::now() + Duration::hours(6))
            .await;
        let vehiculo = registro
            .alta_vehiculo(TipoVehiculo::Particular, 2, None, None)
            .await;

        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        // A y B entran, ocupación 2
        let resultados = servicio
            .asignar(evento.id, vehiculo.id, &[a, b], None)
            .await
            .unwrap();
        assert!(resultados.iter().all(|r| r.estatus == EstatusAsignacion::Asignada));
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 2);

        // C rebota por cupo
        let resultados = servicio
            .asignar(evento.id, vehiculo.id, &[c], None)
            .await
            .unwrap();
        assert_eq!(resultados[0].estatus, EstatusAsignacion::CupoExcedido);

        // quitar A libera un lugar y C entra
        let id_a = servicio.listar_por_evento(evento.id).await[0].id;
        servicio.quitar(id_a).await.unwrap();
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 1);

        let resultados = servicio
            .asignar(evento.id, vehiculo.id, &[c], None)
            .await
            .unwrap();
        assert_eq!(resultados[0].estatus, EstatusAsignacion::Asignada);
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 2);
    }

    #[tokio::test]
    async fn test_duplicada_misma_persona_mismo_evento() {
        let (registro, servicio) = armar().await;
        let evento = registro
            .alta_evento("Asamblea".into(), "asamblea".into(), Utc::now())
            .await;
        let v1 = registro.alta_vehiculo(TipoVehiculo::Van, 10, None, None).await;
        let v2 = registro.alta_vehiculo(TipoVehiculo::Van, 10, None, None).await;

        let persona = Uuid::new_v4();
        servicio.asignar(evento.id, v1.id, &[persona], None).await.unwrap();

        // mismo vehículo
        let r = servicio.asignar(evento.id, v1.id, &[persona], None).await.unwrap();
        assert_eq!(r[0].estatus, EstatusAsignacion::Duplicada);

        // distinto vehículo, mismo evento
        let r = servicio.asignar(evento.id, v2.id, &[persona], None).await.unwrap();
        assert_eq!(r[0].estatus, EstatusAsignacion::Duplicada);
    }

    #[tokio::test]
    async fn test_exito_parcial_en_lote() {
        let (registro, servicio) = armar().await;
        let evento = registro
            .alta_evento("Brigada".into(), "brigada".into(), Utc::now())
            .await;
        let vehiculo = registro
            .alta_vehiculo(TipoVehiculo::Camioneta, 2, None, None)
            .await;

        let personas: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let resultados = servicio
            .asignar(evento.id, vehiculo.id, &personas, None)
            .await
            .unwrap();

        let asignadas = resultados
            .iter()
            .filter(|r| r.estatus == EstatusAsignacion::Asignada)
            .count();
        let rechazadas = resultados
            .iter()
            .filter(|r| r.estatus == EstatusAsignacion::CupoExcedido)
            .count();
        assert_eq!(asignadas, 2);
        assert_eq!(rechazadas, 2);
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 2);
    }

    #[tokio::test]
    async fn test_asignaciones_concurrentes_no_sobrecupan() {
        let (registro, servicio) = armar().await;
        let evento = registro
            .alta_evento("Cierre".into(), "mitin".into(), Utc::now())
            .await;
        let vehiculo = registro
            .alta_vehiculo(TipoVehiculo::Autobus, 5, None, None)
            .await;

        // 20 asignaciones concurrentes pelean por 5 lugares
        let tareas: Vec<_> = (0..20)
            .map(|_| {
                let servicio = servicio.clone();
                let (e, v) = (evento.id, vehiculo.id);
                tokio::spawn(async move {
                    servicio.asignar(e, v, &[Uuid::new_v4()], None).await
                })
            })
            .collect();

        let mut asignadas = 0;
        for tarea in tareas {
            let resultados = tarea.await.unwrap().unwrap();
            if resultados[0].estatus == EstatusAsignacion::Asignada {
                asignadas += 1;
            }
        }
        assert_eq!(asignadas, 5);
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 5);
    }

    #[tokio::test]
    async fn test_reasignar_lider_no_toca_vehiculos() {
        let (registro, servicio) = armar().await;
        let evento = registro
            .alta_evento("Asamblea".into(), "asamblea".into(), Utc::now())
            .await;
        let vehiculo = registro.alta_vehiculo(TipoVehiculo::Van, 5, None, None).await;

        let persona = Uuid::new_v4();
        let lider_original = Uuid::new_v4();
        servicio
            .asignar(evento.id, vehiculo.id, &[persona], Some(lider_original))
            .await
            .unwrap();

        let nuevo_lider = Uuid::new_v4();
        assert_eq!(servicio.reasignar_lider(persona, nuevo_lider).await, 1);

        let lista = servicio.listar_por_evento(evento.id).await;
        assert_eq!(lista[0].lider_id, Some(nuevo_lider));
        assert_eq!(lista[0].vehicle_id, vehiculo.id);
        assert_eq!(servicio.ocupacion(evento.id, vehiculo.id).await, 1);
    }
}
