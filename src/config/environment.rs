//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor HTTP,
//! orígenes CORS y los parámetros de tracking (intervalo de reporte,
//! multiplicador de staleness) y el corte histórico de eventos.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Intervalo esperado entre reportes de posición (segundos)
    pub tracking_report_interval_secs: u64,
    /// La sesión se marca inactiva tras multiplicador × intervalo sin reportes
    pub tracking_staleness_multiplier: u32,
    /// Horas tras la fecha programada para que un evento sea histórico
    pub historical_cutoff_hours: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            tracking_report_interval_secs: env::var("TRACKING_REPORT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            tracking_staleness_multiplier: env::var("TRACKING_STALENESS_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            historical_cutoff_hours: env::var("HISTORICAL_CUTOFF_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de staleness de sesiones de tracking
    pub fn tracking_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(
            (self.tracking_report_interval_secs * self.tracking_staleness_multiplier as u64) as i64,
        )
    }
}
