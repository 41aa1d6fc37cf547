//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pbb/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::library::DEFAULT_BUCKET;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PbbConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub assets: AssetConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_bucket: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AssetConfig {
    pub base_url: Option<String>,
    pub root: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_ASSET_BASE_URL: &str = "http://localhost:5173";
pub const DEFAULT_ASSET_ROOT: &str = "/pbb_book_pages";
pub const DEFAULT_LOG_FILE: &str = "pbb.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
    pub asset_base_url: String,
    pub asset_root: String,
    pub default_bucket: char,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.pbb/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pbb").join("config.toml"))
}

/// Load config from `~/.pbb/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PbbConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PbbConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PbbConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PbbConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PbbConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PbbConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Pure Bhakti Base reader configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_bucket = "A"               # Shelf tab shown first
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"
# log_file = "pbb.log"

# [api]
# base_url = "http://localhost:8000/api"   # Or set PBB_API_BASE_URL
# timeout_secs = 30                        # Unset = wait indefinitely

# [assets]
# base_url = "http://localhost:5173"       # Or set PBB_ASSET_BASE_URL
# root = "/pbb_book_pages"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Command-line overrides. `None` = flag not given.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub asset_url: Option<String>,
    pub log_level: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PbbConfig, cli: &CliOverrides) -> ResolvedConfig {
    // API base URL: CLI → env → config → default
    let api_base_url = cli
        .api_url
        .clone()
        .or_else(|| std::env::var("PBB_API_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // Asset base URL: CLI → env → config → default
    let asset_base_url = cli
        .asset_url
        .clone()
        .or_else(|| std::env::var("PBB_ASSET_BASE_URL").ok())
        .or_else(|| config.assets.base_url.clone())
        .unwrap_or_else(|| DEFAULT_ASSET_BASE_URL.to_string());

    let log_level = cli
        .log_level
        .as_deref()
        .or(config.general.log_level.as_deref())
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Unknown log level '{}', using default", level);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        api_base_url: trim_base(api_base_url),
        request_timeout: config.api.timeout_secs.map(Duration::from_secs),
        asset_base_url: trim_base(asset_base_url),
        asset_root: config
            .assets
            .root
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string()),
        default_bucket: resolve_bucket(config.general.default_bucket.as_deref()),
        log_level,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILE),
        ),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// First character, upper-cased. Anything missing falls back to `A`.
fn resolve_bucket(bucket: Option<&str>) -> char {
    bucket
        .and_then(|b| b.chars().next())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or(DEFAULT_BUCKET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PbbConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.general.default_bucket.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = PbbConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.asset_root, DEFAULT_ASSET_ROOT);
        assert_eq!(resolved.default_bucket, 'A');
        assert_eq!(resolved.request_timeout, None);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PbbConfig {
            general: GeneralConfig {
                default_bucket: Some("g".to_string()),
                log_level: Some("warn".to_string()),
                log_file: Some("/tmp/reader.log".to_string()),
            },
            api: ApiConfig {
                base_url: None,
                timeout_secs: Some(12),
            },
            assets: AssetConfig {
                base_url: None,
                root: Some("/scans".to_string()),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.default_bucket, 'G');
        assert_eq!(resolved.log_level, LevelFilter::Warn);
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/reader.log"));
        assert_eq!(resolved.request_timeout, Some(Duration::from_secs(12)));
        assert_eq!(resolved.asset_root, "/scans");
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = PbbConfig {
            api: ApiConfig {
                base_url: Some("http://config.example/api".to_string()),
                timeout_secs: None,
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            api_url: Some("http://cli.example/api/".to_string()),
            asset_url: Some("http://assets.example".to_string()),
            log_level: Some("info".to_string()),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.api_base_url, "http://cli.example/api");
        assert_eq!(resolved.asset_base_url, "http://assets.example");
        assert_eq!(resolved.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let cli = CliOverrides {
            log_level: Some("chatty".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&PbbConfig::default(), &cli);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
default_bucket = "B"
log_level = "info"

[api]
base_url = "https://purebhakti.example/api"
timeout_secs = 30

[assets]
base_url = "https://purebhakti.example"
root = "/pbb_book_pages"
"#;
        let config: PbbConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_bucket.as_deref(), Some("B"));
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://purebhakti.example/api")
        );
        assert_eq!(config.api.timeout_secs, Some(30));
        assert_eq!(config.assets.root.as_deref(), Some("/pbb_book_pages"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[assets]
root = "/scans"
"#;
        let config: PbbConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assets.root.as_deref(), Some("/scans"));
        assert!(config.assets.base_url.is_none());
        assert!(config.api.base_url.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("pbb-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
