//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del motor de movilización:
//! eventos, vehículos, asignaciones, sesiones de tracking e identidad.

pub mod assignment;
pub mod auth;
pub mod event;
pub mod persona;
pub mod tracking;
pub mod vehicle;
