//! Registro de referencia de eventos y vehículos
//!
//! Copia en memoria de los registros maestros que el motor necesita para
//! validar cupos y derivar reportes. Aplica las dos guardas de
//! inmutabilidad del modelo: eventos históricos no se editan y la
//! capacidad de un vehículo no cambia una vez que tiene asignaciones.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::event::Evento;
use crate::models::vehicle::{TipoVehiculo, Vehiculo};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct RegistryService {
    eventos: RwLock<HashMap<Uuid, Evento>>,
    vehiculos: RwLock<HashMap<Uuid, Vehiculo>>,
    corte_historico_horas: i64,
}

impl RegistryService {
    pub fn new(corte_historico_horas: i64) -> Self {
        Self {
            eventos: RwLock::new(HashMap::new()),
            vehiculos: RwLock::new(HashMap::new()),
            corte_historico_horas,
        }
    }

    // --- Eventos ---

    pub async fn alta_evento(
        &self,
        nombre: String,
        tipo: String,
        fecha_programada: DateTime<Utc>,
    ) -> Evento {
        let evento = Evento::new(nombre, tipo, fecha_programada);
        self.eventos.write().await.insert(evento.id, evento.clone());
        evento
    }

    /// Nombre y fecha se pueden editar mientras el evento siga activo;
    /// una vez histórico la edición se rechaza
    pub async fn actualizar_evento(
        &self,
        id: Uuid,
        nombre: Option<String>,
        fecha_programada: Option<DateTime<Utc>>,
    ) -> AppResult<Evento> {
        let mut eventos = self.eventos.write().await;
        let evento = eventos
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Evento", &id.to_string()))?;

        if evento.es_historico(Utc::now(), self.corte_historico_horas) {
            return Err(AppError::Conflict(
                "el evento es histórico y ya no se puede editar".to_string(),
            ));
        }

        if let Some(nombre) = nombre {
            evento.nombre = nombre;
        }
        if let Some(fecha) = fecha_programada {
            evento.fecha_programada = fecha;
        }
        Ok(evento.clone())
    }

    pub async fn evento(&self, id: Uuid) -> AppResult<Evento> {
        self.eventos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Evento", &id.to_string()))
    }

    pub async fn eventos_todos(&self) -> Vec<Evento> {
        self.eventos.read().await.values().cloned().collect()
    }

    // --- Vehículos ---

    pub async fn alta_vehiculo(
        &self,
        tipo: TipoVehiculo,
        capacidad: u32,
        placa: Option<String>,
        movilizador_id: Option<Uuid>,
    ) -> Vehiculo {
        let vehiculo = Vehiculo::new(tipo, capacidad, placa, movilizador_id);
        self.vehiculos
            .write()
            .await
            .insert(vehiculo.id, vehiculo.clone());
        vehiculo
    }

    /// `capacidad_bloqueada` la calcula el llamador consultando si el
    /// vehículo ya tiene asignaciones
    pub async fn actualizar_vehiculo(
        &self,
        id: Uuid,
        capacidad: Option<u32>,
        placa: Option<String>,
        movilizador_id: Option<Uuid>,
        activo: Option<bool>,
        capacidad_bloqueada: bool,
    ) -> AppResult<Vehiculo> {
        let mut vehiculos = self.vehiculos.write().await;
        let vehiculo = vehiculos
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehiculo", &id.to_string()))?;

        if let Some(capacidad) = capacidad {
            if capacidad != vehiculo.capacidad && capacidad_bloqueada {
                return Err(AppError::Conflict(
                    "la capacidad no se puede cambiar con asignaciones existentes; reasigne en su lugar"
                        .to_string(),
                ));
            }
            vehiculo.capacidad = capacidad;
        }
        if let Some(placa) = placa {
            vehiculo.placa = Some(placa);
        }
        if let Some(movilizador_id) = movilizador_id {
            vehiculo.movilizador_id = Some(movilizador_id);
        }
        if let Some(activo) = activo {
            vehiculo.activo = activo;
        }
        Ok(vehiculo.clone())
    }

    pub async fn vehiculo(&self, id: Uuid) -> AppResult<Vehiculo> {
        self.vehiculos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Vehiculo", &id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_evento_historico_no_se_edita() {
        let registro = RegistryService::new(24);
        let evento = registro
            .alta_evento(
                "Mitin".to_string(),
                "mitin".to_string(),
                Utc::now() - Duration::days(3),
            )
            .await;

        let err = registro
            .actualizar_evento(evento.id, Some("Otro nombre".to_string()), None)
            .await
            .unwrap_err();
        assert_eq!(err.codigo(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_capacidad_bloqueada_con_asignaciones() {
        let registro = RegistryService::new(24);
        let vehiculo = registro
            .alta_vehiculo(TipoVehiculo::Van, 12, Some("ABC-123-D".to_string()), None)
            .await;

        // sin asignaciones, el cambio pasa
        let actualizado = registro
            .actualizar_vehiculo(vehiculo.id, Some(15), None, None, None, false)
            .await
            .unwrap();
        assert_eq!(actualizado.capacidad, 15);

        // con asignaciones, se rechaza
        let err = registro
            .actualizar_vehiculo(vehiculo.id, Some(20), None, None, None, true)
            .await
            .unwrap_err();
        assert_eq!(err.codigo(), "CONFLICT");

        // pero editar la placa sigue permitido
        let actualizado = registro
            .actualizar_vehiculo(vehiculo.id, None, Some("XYZ-987-A".to_string()), None, None, true)
            .await
            .unwrap();
        assert_eq!(actualizado.placa.as_deref(), Some("XYZ-987-A"));
    }
}
