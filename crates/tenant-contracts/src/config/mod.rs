use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::templates::DEFAULT_MAX_PART_BYTES;

/// Matches the upload dialog limit of the dashboard.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub templates: TemplateConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_upload_bytes = byte_limit("TEMPLATE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
            .ok_or(ConfigError::InvalidUploadLimit)?;
        let max_part_bytes = byte_limit("TEMPLATE_MAX_PART_BYTES", DEFAULT_MAX_PART_BYTES)
            .ok_or(ConfigError::InvalidPartLimit)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            templates: TemplateConfig {
                max_upload_bytes,
                max_part_bytes,
            },
        })
    }
}

/// `None` when the variable is set but is not a positive integer.
fn byte_limit(key: &str, default: usize) -> Option<usize> {
    match env::var(key) {
        Ok(value) => value.trim().parse::<usize>().ok().filter(|limit| *limit > 0),
        Err(_) => Some(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Limits applied to uploaded contract templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateConfig {
    pub max_upload_bytes: usize,
    /// Cap on the inflated size of a single archive part.
    pub max_part_bytes: usize,
}

impl TemplateConfig {
    /// Largest JSON body that can carry a base64 document of `max_upload_bytes`.
    pub fn request_body_limit(&self) -> usize {
        self.max_upload_bytes.div_ceil(3) * 4 + 64 * 1024
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUploadLimit,
    InvalidPartLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUploadLimit => {
                write!(f, "TEMPLATE_MAX_UPLOAD_BYTES must be a positive byte count")
            }
            ConfigError::InvalidPartLimit => {
                write!(f, "TEMPLATE_MAX_PART_BYTES must be a positive byte count")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidUploadLimit
            | ConfigError::InvalidPartLimit => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("TEMPLATE_MAX_UPLOAD_BYTES");
        env::remove_var("TEMPLATE_MAX_PART_BYTES");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.templates.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.templates.max_part_bytes, DEFAULT_MAX_PART_BYTES);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_upload_limit_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TEMPLATE_MAX_UPLOAD_BYTES", "2048");
        env::set_var("TEMPLATE_MAX_PART_BYTES", "4096");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.templates.max_upload_bytes, 2048);
        assert_eq!(config.templates.max_part_bytes, 4096);
        reset_env();
    }

    #[test]
    fn rejects_zero_or_garbage_upload_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for value in ["0", "ten megabytes"] {
            reset_env();
            env::set_var("TEMPLATE_MAX_UPLOAD_BYTES", value);
            assert!(matches!(
                AppConfig::load(),
                Err(ConfigError::InvalidUploadLimit)
            ));
        }
        reset_env();
    }

    #[test]
    fn request_body_limit_covers_base64_overhead() {
        let config = TemplateConfig {
            max_upload_bytes: 3 * 1024,
            ..TemplateConfig::default()
        };
        assert!(config.request_body_limit() >= 4 * 1024);
    }
}
