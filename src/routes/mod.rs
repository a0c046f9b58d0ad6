//! Routers de la API
//!
//! Cada superficie del motor tiene su router; `crear_app` arma el árbol
//! completo con CORS y el middleware de identidad sobre `/api`.

pub mod asistencia_routes;
pub mod movilizacion_routes;
pub mod registro_routes;
pub mod reportes_routes;
pub mod tracking_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::auth::identidad_middleware;
use crate::middleware::cors::cors_middleware;
use crate::services::authorization_service;
use crate::state::AppState;

/// Crear el router principal de la aplicación
pub fn crear_app(state: AppState) -> Router {
    let protegido = Router::new()
        .nest("/movilizacion", movilizacion_routes::crear_router())
        .nest("/asistencia", asistencia_routes::crear_router())
        .nest("/tracking", tracking_routes::crear_router())
        .nest("/reportes", reportes_routes::crear_router())
        .nest("/registro", registro_routes::crear_router())
        .layer(middleware::from_fn(identidad_middleware));

    let api = Router::new()
        // el colaborador de políticas consulta el catálogo sin identidad
        .route("/capacidades", get(capacidades_endpoint))
        .merge(protegido);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api", api)
        .layer(cors_middleware())
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Motor de movilización funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Catálogo de operaciones y lista blanca por rol
async fn capacidades_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "operaciones": authorization_service::OPERACIONES,
        "roles": authorization_service::mapa_capacidades(),
    }))
}
