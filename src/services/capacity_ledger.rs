//! Libro de cupos
//!
//! Capa de consulta sin efectos secundarios sobre el almacén de
//! asignaciones: ocupación actual y cupo disponible por (evento,
//! vehículo). El cupo es por evento, no global: un vehículo reutilizado
//! en otro evento tiene ocupación independiente.
//!
//! Ningún llamador debe cachear una ocupación entre dos llamadas
//! mutantes; la revalidación ocurre bajo el candado de asignación.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::assignment::Asignacion;
use crate::services::registry_service::RegistryService;
use crate::utils::errors::AppResult;

pub struct CapacityLedger {
    registro: Arc<RegistryService>,
    asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
}

impl CapacityLedger {
    pub fn new(
        registro: Arc<RegistryService>,
        asignaciones: Arc<RwLock<HashMap<Uuid, Asignacion>>>,
    ) -> Self {
        Self {
            registro,
            asignaciones,
        }
    }

    /// Asignaciones vivas del vehículo en el evento
    pub async fn ocupacion(&self, event_id: Uuid, vehicle_id: Uuid) -> usize {
        self.asignaciones
            .read()
            .await
            .values()
            .filter(|a| a.event_id == event_id && a.vehicle_id == vehicle_id)
            .count()
    }

    /// ¿Queda cupo en el vehículo para el evento?
    pub async fn hay_cupo(&self, event_id: Uuid, vehicle_id: Uuid) -> AppResult<bool> {
        let vehiculo = self.registro.vehiculo(vehicle_id).await?;
        let ocupacion = self.ocupacion(event_id, vehicle_id).await;
        Ok(ocupacion < vehiculo.capacidad as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::TipoVehiculo;

    #[tokio::test]
    async fn test_ocupacion_por_evento_no_global() {
        let registro = Arc::new(RegistryService::new(24));
        let asignaciones = Arc::new(RwLock::new(HashMap::new()));
        let ledger = CapacityLedger::new(registro.clone(), asignaciones.clone());

        let vehiculo = registro
            .alta_vehiculo(TipoVehiculo::Van, 1, None, None)
            .await;
        let evento_a = Uuid::new_v4();
        let evento_b = Uuid::new_v4();

        {
            let mut mapa = asignaciones.write().await;
            let asignacion = Asignacion::new(evento_a, vehiculo.id, Uuid::new_v4(), None);
            mapa.insert(asignacion.id, asignacion);
        }

        // el cupo es por evento: lleno en A, libre en B
        assert_eq!(ledger.ocupacion(evento_a, vehiculo.id).await, 1);
        assert_eq!(ledger.ocupacion(evento_b, vehiculo.id).await, 0);
        assert!(!ledger.hay_cupo(evento_a, vehiculo.id).await.unwrap());
        assert!(ledger.hay_cupo(evento_b, vehiculo.id).await.unwrap());

        // vehículo desconocido es NOT_FOUND
        let err = ledger.hay_cupo(evento_a, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.codigo(), "NOT_FOUND");
    }
}
