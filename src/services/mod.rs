//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor: libro de cupos,
//! asignaciones, check-in, tracking en vivo, agregación y autorización.

pub mod assignment_service;
pub mod authorization_service;
pub mod capacity_ledger;
pub mod checkin_service;
pub mod person_directory;
pub mod registry_service;
pub mod stats_service;
pub mod tracking_service;

pub use assignment_service::AssignmentService;
pub use capacity_ledger::CapacityLedger;
pub use checkin_service::CheckinService;
pub use person_directory::{DirectorioEnMemoria, PersonDirectory};
pub use registry_service::RegistryService;
pub use stats_service::StatsService;
pub use tracking_service::TrackingService;
