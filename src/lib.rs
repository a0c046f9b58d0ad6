//! Motor de movilización de eventos: asignación de personas a vehículos
//! con cupos, check-in de asistencia y tracking en vivo, con la capa de
//! agregación que alimenta los dashboards.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
