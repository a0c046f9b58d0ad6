//! Directorio de personas
//!
//! Las personas las administra un colaborador externo de CRUD; el motor
//! consume una copia de referencia detrás de este trait para resolver
//! check-ins por clave de elector sin acoplarse al ciclo de vida ajeno.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::persona::Persona;

#[async_trait]
pub trait PersonDirectory: Send + Sync {
    async fn buscar_por_id(&self, id: Uuid) -> Option<Persona>;
    async fn buscar_por_clave_elector(&self, clave: &str) -> Option<Persona>;
    async fn upsert(&self, persona: Persona);
}

/// Implementación en memoria sembrada por `/api/registro/personas`
#[derive(Default)]
pub struct DirectorioEnMemoria {
    personas: RwLock<HashMap<Uuid, Persona>>,
    por_clave: RwLock<HashMap<String, Uuid>>,
}

impl DirectorioEnMemoria {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonDirectory for DirectorioEnMemoria {
    async fn buscar_por_id(&self, id: Uuid) -> Option<Persona> {
        self.personas.read().await.get(&id).cloned()
    }

    async fn buscar_por_clave_elector(&self, clave: &str) -> Option<Persona> {
        let id = *self.por_clave.read().await.get(clave)?;
        self.personas.read().await.get(&id).cloned()
    }

    async fn upsert(&self, persona: Persona) {
        let mut por_clave = self.por_clave.write().await;
        let mut personas = self.personas.write().await;

        // Si la clave cambió, quitar el índice viejo
        if let Some(previa) = personas.get(&persona.id) {
            if previa.clave_elector != persona.clave_elector {
                por_clave.remove(&previa.clave_elector);
            }
        }

        por_clave.insert(persona.clave_elector.clone(), persona.id);
        personas.insert(persona.id, persona);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_busqueda_por_clave_elector() {
        let directorio = DirectorioEnMemoria::new();
        let persona = Persona {
            id: Uuid::new_v4(),
            nombre: "María Ramírez".to_string(),
            clave_elector: "RMRZLC92070614M101".to_string(),
        };
        directorio.upsert(persona.clone()).await;

        let encontrada = directorio
            .buscar_por_clave_elector("RMRZLC92070614M101")
            .await
            .unwrap();
        assert_eq!(encontrada.id, persona.id);
        assert!(directorio.buscar_por_clave_elector("XXXXXX00000000H000").await.is_none());
    }

    #[tokio::test]
    async fn test_upsert_reindexa_clave() {
        let directorio = DirectorioEnMemoria::new();
        let id = Uuid::new_v4();
        directorio
            .upsert(Persona {
                id,
                nombre: "Juan".to_string(),
                clave_elector: "GMVLZR80010109H400".to_string(),
            })
            .await;
        directorio
            .upsert(Persona {
                id,
                nombre: "Juan".to_string(),
                clave_elector: "GMVLZR80010109H401".to_string(),
            })
            .await;

        assert!(directorio.buscar_por_clave_elector("GMVLZR80010109H400").await.is_none());
        assert!(directorio.buscar_por_clave_elector("GMVLZR80010109H401").await.is_some());
    }
}
