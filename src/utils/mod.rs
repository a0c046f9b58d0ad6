//! Utilidades compartidas

pub mod errors;
pub mod token;
pub mod validation;
