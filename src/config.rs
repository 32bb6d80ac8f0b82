use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::hours::DaytimeHours;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub listing: ListingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Where shelter listings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    #[default]
    Static,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSettings {
    #[serde(default)]
    pub source: ListingSource,
    #[serde(default = "default_seed_path")]
    pub seed_path: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            source: ListingSource::default(),
            seed_path: default_seed_path(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_seed_path() -> String { "data/shelters.json".to_string() }
fn default_endpoint() -> String { "http://localhost:5000/api".to_string() }
fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 { 60 }
fn default_max_entries() -> u64 { 64 }

/// Result size and radius bounds applied at the HTTP boundary
#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: usize,
    #[serde(default)]
    pub daytime_hours: DaytimeHours,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_radius_km: default_radius_km(),
            max_radius_km: default_max_radius_km(),
            snapshot_limit: default_snapshot_limit(),
            daytime_hours: DaytimeHours::default(),
        }
    }
}

fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 50 }
fn default_radius_km() -> f64 { 10.0 }
fn default_max_radius_km() -> f64 { 50.0 }
fn default_snapshot_limit() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SHELTER_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SHELTER__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SHELTER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranking() {
        let ranking = RankingSettings::default();
        assert_eq!(ranking.default_limit, 20);
        assert_eq!(ranking.max_limit, 50);
        assert_eq!(ranking.default_radius_km, 10.0);
        assert_eq!(ranking.max_radius_km, 50.0);
        assert_eq!(ranking.snapshot_limit, 100);
        assert_eq!(ranking.daytime_hours, DaytimeHours::AssumeOpen);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("shelter-finder-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[listing]
source = "remote"
endpoint = "http://listing.internal/api"

[ranking]
max_limit = 25
daytime_hours = "strict"
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.listing.source, ListingSource::Remote);
        assert_eq!(settings.listing.endpoint, "http://listing.internal/api");
        assert_eq!(settings.listing.seed_path, "data/shelters.json");
        assert_eq!(settings.ranking.max_limit, 25);
        assert_eq!(settings.ranking.default_limit, 20);
        assert_eq!(settings.ranking.daytime_hours, DaytimeHours::Strict);
        assert_eq!(settings.server.port, 8080);
    }
}
