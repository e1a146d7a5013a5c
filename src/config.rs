//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::notify::{DispatcherConfig, SmtpConfig, SmtpTls};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Outbound notification queue capacity
    pub notify_queue_capacity: usize,

    /// Per-recipient delivery timeout
    pub notify_timeout: Duration,

    /// SMTP relay; notifications are only logged when absent
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let notify_queue_capacity = lookup("NOTIFY_QUEUE_CAPACITY")
            .unwrap_or_else(|| "1024".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("NOTIFY_QUEUE_CAPACITY"))?;

        let notify_timeout_secs: u64 = lookup("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("NOTIFY_TIMEOUT_SECS"))?;

        let smtp = match lookup("SMTP_HOST").filter(|h| !h.is_empty()) {
            Some(smtp_host) => {
                let tls: SmtpTls = match lookup("SMTP_TLS") {
                    Some(mode) => mode
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SMTP_TLS"))?,
                    None => SmtpTls::default(),
                };

                let default_port = match tls {
                    SmtpTls::StartTls => 587,
                    SmtpTls::Implicit => 465,
                    SmtpTls::None => 25,
                };
                let smtp_port = match lookup("SMTP_PORT") {
                    Some(port) => port
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SMTP_PORT"))?,
                    None => default_port,
                };

                let from = lookup("SMTP_FROM").ok_or(ConfigError::MissingEnv("SMTP_FROM"))?;

                Some(SmtpConfig {
                    host: smtp_host,
                    port: smtp_port,
                    tls,
                    username: lookup("SMTP_USERNAME"),
                    password: lookup("SMTP_PASSWORD"),
                    from,
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            environment,
            notify_queue_capacity,
            notify_timeout: Duration::from_secs(notify_timeout_secs),
            smtp,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings for the notification dispatcher
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            delivery_timeout: self.notify_timeout,
            queue_capacity: self.notify_queue_capacity,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
