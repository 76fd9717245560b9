//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <path>` or `$XDG_CONFIG_HOME/cloudctl/config.toml`
//! 3. Environment variables: `CLOUDCTL_<SECTION>__<KEY>`
//! 4. Command line overrides: `-o section.key=value`
//!
//! The store is a flat two-level map (section → key → value). Nothing is
//! ever written back to disk.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::argument::parse_int;
use crate::domain::{expand_env_vars, ConfigOverride};

/// Keys of one configuration section.
pub type Section = BTreeMap<String, String>;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "CLOUDCTL";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of items per page for `--more`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Layered configuration store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(flatten)]
    sections: BTreeMap<String, Section>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

/// Get the XDG config directory for cloudctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cloudctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Parse TOML content into sections. Scalar values are stringified,
/// top-level scalars and nested tables are rejected.
pub fn parse_sections(content: &str) -> ApplicationResult<BTreeMap<String, Section>> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ApplicationError::Config {
        message: format!("parse: {e}"),
    })?;

    let mut sections = BTreeMap::new();
    for (name, value) in table {
        let toml::Value::Table(entries) = value else {
            return Err(ApplicationError::Config {
                message: format!("'{name}' must be a section ([{name}])"),
            });
        };
        let mut section = Section::new();
        for (key, value) in entries {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(ApplicationError::Config {
                        message: format!("{name}.{key} must be a scalar value"),
                    })
                }
            };
            section.insert(key, value);
        }
        sections.insert(name, section);
    }
    Ok(sections)
}

impl Settings {
    /// Compiled defaults.
    pub fn defaults() -> Self {
        let mut settings = Self::default();
        settings.set("global", "timeout", DEFAULT_TIMEOUT_SECS.to_string());
        settings.set("global", "page_size", DEFAULT_PAGE_SIZE.to_string());
        settings.set("compute", "type", "compute");
        settings
    }

    /// Load settings with layered precedence (defaults, file, environment).
    ///
    /// An explicit path must exist; the XDG path is used only if present.
    /// `-o` overrides are applied afterwards with [`apply_overrides`](Self::apply_overrides).
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::defaults();

        let file = match explicit {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => global_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = file {
            let content = std::fs::read_to_string(&path).with_path_context("read config", &path)?;
            let sections = parse_sections(&content).map_err(|e| ApplicationError::Config {
                message: format!("{}: {e}", path.display()),
            })?;
            debug!(path = %path.display(), sections = sections.len(), "config file loaded");
            current.merge(sections);
            current.source = Some(path);
        }

        current.apply_env_overrides()?;
        current.expand_values();
        Ok(current)
    }

    /// Build settings from TOML content on top of the defaults.
    pub fn from_toml(content: &str) -> ApplicationResult<Self> {
        let mut settings = Self::defaults();
        settings.merge(parse_sections(content)?);
        settings.expand_values();
        Ok(settings)
    }

    /// Overlay sections; overlay keys replace existing ones.
    pub fn merge(&mut self, overlay: BTreeMap<String, Section>) {
        for (name, section) in overlay {
            self.sections.entry(name).or_default().extend(section);
        }
    }

    /// Apply `CLOUDCTL_<SECTION>__<KEY>` environment variables.
    fn apply_env_overrides(&mut self) -> ApplicationResult<()> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let collected: HashMap<String, config::Value> =
            config.try_deserialize().map_err(config_err)?;
        for (section, value) in collected {
            // CLOUDCTL_CONFIG and other sectionless variables are not settings
            let Ok(table) = value.into_table() else {
                continue;
            };
            for (key, value) in table {
                if let Ok(value) = value.into_string() {
                    debug!(section = %section, key = %key, "environment override");
                    self.set(&section, &key, value);
                }
            }
        }
        Ok(())
    }

    /// Expand `~`, `$VAR` and `${VAR}` in all values.
    fn expand_values(&mut self) {
        for section in self.sections.values_mut() {
            for value in section.values_mut() {
                *value = expand_env_vars(value);
            }
        }
    }

    /// Value at `section.key`. Empty values count as absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Apply command line overrides, one write per override.
    pub fn apply_overrides(&mut self, overrides: &[ConfigOverride]) {
        for o in overrides {
            debug!(section = %o.section, key = %o.key, "config override");
            self.set(&o.section, &o.key, o.value.clone());
        }
    }

    pub fn sections(&self) -> &BTreeMap<String, Section> {
        &self.sections
    }

    /// File the settings were loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Request timeout (`global.timeout`, seconds).
    pub fn timeout(&self) -> ApplicationResult<Duration> {
        match self.get("global", "timeout") {
            None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            Some(raw) => {
                let secs = parse_int(raw)?;
                u64::try_from(secs)
                    .map(Duration::from_secs)
                    .map_err(|_| ApplicationError::Config {
                        message: format!("global.timeout must not be negative: {secs}"),
                    })
            }
        }
    }

    /// Items per page for paged listings (`global.page_size`).
    pub fn page_size(&self) -> usize {
        self.get("global", "page_size")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cloudctl configuration
#
# Locations (by precedence, lowest to highest):
#   File:  ~/.config/cloudctl/config.toml (or --config <path>)
#   Env:   CLOUDCTL_<SECTION>__<KEY>, e.g. CLOUDCTL_NETWORK__URL
#   CLI:   -o section.key=value
#
# Endpoint resolution for a service (e.g. network):
#   [network] url, then [compute] url, then the identity catalog
#   reached through [astakos] url or [global] url.

[global]
# url = "https://accounts.example.org/identity/v2.0"
# token = "$CLOUD_TOKEN"
# timeout = 30
# page_size = 10

[compute]
# url = "https://compute.example.org/compute/v2.0"
# type = "compute"

[network]
# url = "https://network.example.org/network/v2.0"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
