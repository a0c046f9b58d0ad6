//! DTOs de la API
//!
//! Requests y responses serializables de cada superficie, separados de
//! los modelos internos.

pub mod asistencia_dto;
pub mod common;
pub mod movilizacion_dto;
pub mod registro_dto;
pub mod reportes_dto;
pub mod tracking_dto;
