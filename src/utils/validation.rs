//! Validaciones de campos del dominio
//!
//! La clave de elector (INE) es el identificador con el que el personal
//! de campo resuelve check-ins sin roster a la mano: 6 letras, 8 dígitos,
//! sexo (H/M) y 3 dígitos de homoclave.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref RE_CLAVE_ELECTOR: Regex =
        Regex::new(r"^[A-Z]{6}[0-9]{8}[HM][0-9]{3}$").expect("regex de clave de elector");
}

/// Validador custom para `validator::Validate`
pub fn validar_clave_elector(clave: &str) -> Result<(), ValidationError> {
    if RE_CLAVE_ELECTOR.is_match(clave) {
        Ok(())
    } else {
        let mut error = ValidationError::new("clave_elector");
        error.add_param("formato".into(), &"AAAAAA00000000H000");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clave_elector_valida() {
        assert!(validar_clave_elector("GMVLZR80010109H400").is_ok());
        assert!(validar_clave_elector("RMRZLC92070614M101").is_ok());
    }

    #[test]
    fn test_clave_elector_invalida() {
        // muy corta, minúsculas, sexo inválido
        assert!(validar_clave_elector("GMVLZR8001H400").is_err());
        assert!(validar_clave_elector("gmvlzr80010109h400").is_err());
        assert!(validar_clave_elector("GMVLZR80010109X400").is_err());
        assert!(validar_clave_elector("").is_err());
    }
}
