//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: la configuración y los servicios del
//! motor, todos sobre el mismo almacén de asignaciones en memoria.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::assignment::Asignacion;
use crate::services::{
    AssignmentService, CapacityLedger, CheckinService, DirectorioEnMemoria, PersonDirectory,
    RegistryService, StatsService, TrackingService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub registro: Arc<RegistryService>,
    pub directorio: Arc<dyn PersonDirectory>,
    pub cupo: Arc<CapacityLedger>,
    pub movilizacion: Arc<AssignmentService>,
    pub asistencia: Arc<CheckinService>,
    pub tracking: Arc<TrackingService>,
    pub reportes: Arc<StatsService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let registro = Arc::new(RegistryService::new(config.historical_cutoff_hours));
        let directorio: Arc<dyn PersonDirectory> = Arc::new(DirectorioEnMemoria::new());

        // Almacén único de asignaciones: libro de cupos, gestor de
        // asignaciones, check-in y reportes leen la misma verdad
        let asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>> =
            Arc::new(RwLock::new(HashMap::new()));

        let cupo = Arc::new(CapacityLedger::new(registro.clone(), asignaciones.clone()));
        let movilizacion = Arc::new(AssignmentService::new(
            registro.clone(),
            cupo.clone(),
            asignaciones.clone(),
        ));
        let asistencia = Arc::new(CheckinService::new(
            asignaciones.clone(),
            directorio.clone(),
        ));
        let tracking = Arc::new(TrackingService::new());
        let reportes = Arc::new(StatsService::new(
            registro.clone(),
            asignaciones,
            tracking.clone(),
        ));

        Self {
            config,
            registro,
            directorio,
            cupo,
            movilizacion,
            asistencia,
            tracking,
            reportes,
        }
    }
}
