//! Layered service configuration.
//!
//! Resolution order, later layers win:
//!
//! 1. Built-in defaults (serde defaults for any key no layer sets)
//! 2. TOML file: explicit path, else `$SKYLINK_CONFIG`, else
//!    `<config_dir>/skylink/config.toml` when it exists
//! 3. `SKYLINK_<SECTION>_<KEY>` variables, e.g. `SKYLINK_CMS_BASE_URL`
//! 4. The deployment variables in [`ENV_VARS`]
//!
//! Layers 2 to 4 are merged by `confyg`. Its merge skips empty strings, so an
//! empty environment value never clears a file value.

use crate::error::{Error, Result};
use confyg::Confygery;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Project name, used for the config directory.
pub const PROJECT_NAME: &str = "skylink";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SKYLINK_CONFIG";

/// Prefix for the structured `SKYLINK_<SECTION>_<KEY>` variables.
pub const ENV_PREFIX: &str = PROJECT_NAME;

/// Sections scanned for structured variables.
const ENV_SECTIONS: &[&str] = &["server", "tracking", "cms", "logging"];

/// Deployment variables and the key each one sets. These win over
/// everything else.
const ENV_ALIASES: &[(&str, &[&str])] = &[
    ("SKYLINK_ENV", &["environment"]),
    ("SKYLINK_SERVICE", &["service"]),
    ("SKYLINK_HOST", &["server", "host"]),
    ("SKYLINK_PORT", &["server", "port"]),
    ("TRACKING_API_URL", &["tracking", "base_url"]),
    ("STRAPI_URL", &["cms", "base_url"]),
    ("STRAPI_API_TOKEN", &["cms", "api_token"]),
    ("SKYLINK_LOG", &["logging", "level"]),
];

/// Deployment variables that override file values.
pub const ENV_VARS: &[&str] = &[
    "SKYLINK_ENV",
    "SKYLINK_SERVICE",
    "SKYLINK_HOST",
    "SKYLINK_PORT",
    "TRACKING_API_URL",
    "STRAPI_URL",
    "STRAPI_API_TOKEN",
    "SKYLINK_LOG",
];

/// Fallback carrier endpoint when nothing else is configured.
pub const DEFAULT_TRACKING_URL: &str =
    "https://tracking.skylink.example/api/Tracking/GetSkyLinkTracks";

/// Fallback CMS base URL.
pub const DEFAULT_CMS_URL: &str = "http://localhost:1337";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkylinkConfig {
    /// Deployment environment reported by the health endpoint.
    pub environment: String,
    /// Service name reported by the health endpoint.
    pub service: String,
    /// HTTP listener.
    pub server: ServerConfig,
    /// Carrier tracking API.
    pub tracking: TrackingConfig,
    /// Headless CMS.
    pub cms: CmsConfig,
    /// Log filter.
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
}

/// Carrier tracking API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Full endpoint URL; the AWB number is appended as `?AWBNO=`.
    pub base_url: String,
}

/// CMS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Base URL; empty disables the CMS.
    pub base_url: String,
    /// Optional bearer token for the read API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Deadline for the health probe, in seconds.
    #[serde(deserialize_with = "number_or_string")]
    pub health_timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for SkylinkConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            service: PROJECT_NAME.to_string(),
            server: ServerConfig::default(),
            tracking: TrackingConfig::default(),
            cms: CmsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TRACKING_URL.to_string(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CMS_URL.to_string(),
            api_token: None,
            health_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SkylinkConfig {
    /// `<config_dir>/skylink/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// The file [`load`](Self::load) would read, whether or not it exists.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }

    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let file = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Some(path),
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            _ => None,
        };

        let config = Self::layered(file.as_deref(), ENV_PREFIX, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    fn layered<F>(file: Option<&Path>, env_prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Confygery::new()?;
        if let Some(path) = file {
            let name = path.to_str().ok_or_else(|| {
                Error::config(format!("Config path is not UTF-8: {}", path.display()))
            })?;
            log::debug!("Loading config from {name}");
            builder.add_file(name)?;
        }

        let mut env = confyg::env::Options::with_top_level(env_prefix);
        for section in ENV_SECTIONS {
            env.add_section(*section);
        }
        let aliases = alias_layer(lookup)?;
        builder.add_env(env)?.add_str(&aliases)?;

        let mut config: Self = builder.build()?;
        config.cms.api_token = config.cms.api_token.filter(|t| !t.trim().is_empty());
        Ok(config)
    }

    /// Checks URLs and limits.
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.tracking.base_url) {
            return Err(Error::config(format!(
                "tracking.base_url must be an http(s) URL, got '{}'",
                self.tracking.base_url
            )));
        }
        if self.cms_enabled() && !is_http_url(&self.cms.base_url) {
            return Err(Error::config(format!(
                "cms.base_url must be an http(s) URL or empty, got '{}'",
                self.cms.base_url
            )));
        }
        if self.cms.health_timeout_secs == 0 {
            return Err(Error::config("cms.health_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Whether a CMS base URL is configured.
    pub fn cms_enabled(&self) -> bool {
        !self.cms.base_url.trim().is_empty()
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The environment variables that reproduce this configuration.
    ///
    /// The CMS token is never exported.
    pub fn to_env_vars(&self) -> Vec<(String, String)> {
        vec![
            ("SKYLINK_ENV".to_string(), self.environment.clone()),
            ("SKYLINK_SERVICE".to_string(), self.service.clone()),
            ("SKYLINK_HOST".to_string(), self.server.host.clone()),
            ("SKYLINK_PORT".to_string(), self.server.port.to_string()),
            ("TRACKING_API_URL".to_string(), self.tracking.base_url.clone()),
            ("STRAPI_URL".to_string(), self.cms.base_url.clone()),
            ("SKYLINK_LOG".to_string(), self.logging.level.clone()),
        ]
    }
}

/// TOML for the [`ENV_ALIASES`] that `lookup` resolves.
fn alias_layer<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut root = toml::Table::new();
    for &(var, path) in ENV_ALIASES {
        let (Some(value), Some((key, sections))) = (lookup(var), path.split_last()) else {
            continue;
        };
        let mut table = &mut root;
        for section in sections {
            table = table
                .entry(section.to_string())
                .or_insert(toml::Value::Table(toml::Table::new()))
                .as_table_mut()
                .ok_or_else(|| Error::config(format!("{var}: '{section}' is not a table")))?;
        }
        table.insert(key.to_string(), toml::Value::String(value));
    }
    toml::to_string(&root).map_err(|e| Error::config(e.to_string()))
}

/// Environment layers carry every value as a string.
fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text
            .trim()
            .parse::<T>()
            .map_err(|e| serde::de::Error::custom(format!("'{text}' is not a valid number: {e}"))),
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}
