use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "PORTAL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_JWT_SECRET: &str = "PORTAL_JWT_SECRET";
const ENV_ADMIN_EMAIL: &str = "PORTAL_ADMIN_EMAIL";
const ENV_ADMIN_PASSWORD: &str = "PORTAL_ADMIN_PASSWORD";

const DEFAULT_ADMIN_EMAIL: &str = "admin@mandanten-portal.de";

/// Settlement plan tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Garnishable amounts below this threshold produce a Nullplan
    #[serde(default = "default_quotenplan_threshold")]
    pub quotenplan_threshold: f64,
}

fn default_quotenplan_threshold() -> f64 {
    10.0
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            quotenplan_threshold: default_quotenplan_threshold(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub settlement: SettlementConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub settlement: SettlementConfig,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let jwt_secret = std::env::var(ENV_JWT_SECRET).unwrap_or_else(|_| {
            tracing::warn!("{} not set, using insecure development secret", ENV_JWT_SECRET);
            "insecure-dev-secret-change-me".to_string()
        });

        let admin_email =
            std::env::var(ENV_ADMIN_EMAIL).unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = std::env::var(ENV_ADMIN_PASSWORD).unwrap_or_else(|_| {
            tracing::warn!("{} not set, using default admin password", ENV_ADMIN_PASSWORD);
            "admin123".to_string()
        });

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let settlement = Self::load_config_file(&config_path)
            .map(|cf| cf.settlement)
            .unwrap_or_default();

        Self {
            host,
            port,
            settlement,
            jwt_secret,
            admin_email,
            admin_password,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_defaults() {
        let settlement = SettlementConfig::default();
        assert_eq!(settlement.quotenplan_threshold, 10.0);
    }

    #[test]
    fn parses_settlement_section() {
        let cf: ConfigFile = serde_yaml::from_str("settlement:\n  quotenplan_threshold: 25.0\n")
            .expect("valid yaml");
        assert_eq!(cf.settlement.quotenplan_threshold, 25.0);
    }

    #[test]
    fn missing_section_uses_defaults() {
        let cf: ConfigFile = serde_yaml::from_str("{}").expect("valid yaml");
        assert_eq!(cf.settlement.quotenplan_threshold, 10.0);
    }
}
