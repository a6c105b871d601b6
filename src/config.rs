//! Application configuration.
//!
//! Configuration is loaded from `config/config.toml` merged with environment
//! variables prefixed `PIPELOG_`, e.g. `PIPELOG_INFLUX_URL` or
//! `PIPELOG_APPLICATION_LOG_LEVEL`. The backend connection parameters are an
//! explicit structure handed to the client at construction, not process-wide
//! state.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Backend connection parameters
    pub influx: InfluxConfig,
}

/// Application-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Window title
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// InfluxDB connection parameters: four static values supplied at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// Server base URL, e.g. `http://localhost:8086`
    pub url: String,
    /// API access token
    pub token: String,
    /// Organization identifier
    pub org: String,
    /// Bucket holding the measurement series
    pub bucket: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_name() -> String {
    "Pipe Measurement Logger".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from `config/config.toml` and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from("config/config.toml")
    }

    /// Load configuration from a specific file path, still merging
    /// `PIPELOG_`-prefixed environment variables on top.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("PIPELOG_").split("_"))
            .extract()
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        let url = url::Url::parse(&self.influx.url)
            .map_err(|e| format!("Invalid influx url '{}': {}", self.influx.url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Invalid influx url '{}': scheme must be http or https",
                self.influx.url
            ));
        }

        if self.influx.bucket.is_empty() {
            return Err("influx bucket must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_config() -> AppConfig {
        AppConfig {
            application: ApplicationConfig::default(),
            influx: InfluxConfig {
                url: "http://localhost:8086".to_string(),
                token: "secret-token".to_string(),
                org: "acme".to_string(),
                bucket: "pipes".to_string(),
            },
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = sample_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut config = sample_config();
        config.influx.url = "ftp://localhost:8086".to_string();
        assert!(config.validate().is_err());

        config.influx.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_bucket_is_rejected() {
        let mut config = sample_config();
        config.influx.bucket = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[influx]
url = "http://influx.example:8086"
token = "t0ken"
org = "acme"
bucket = "pipes"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.influx.url, "http://influx.example:8086");
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.application.name, "Pipe Measurement Logger");
        assert!(config.validate().is_ok());
    }
}
