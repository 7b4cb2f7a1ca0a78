//! Application configuration management.
//!
//! Handles loading, saving, and validating apispec configuration including:
//! - Specification name and comments
//! - Orphan policies for the module and resource axes
//! - Enum value emission mode
//! - Optional prior specification to merge with
//! - Inventory location, output location, and server binding
//!
//! Values are layered with the `config` crate: an optional TOML file first,
//! then `APISPEC_*` environment variables (`__` separates sections, so
//! `APISPEC_SERVER__PORT=8080` sets `server.port`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "APISPEC";

/// File name looked up in the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "apispec.toml";

/// Errors raised while loading, validating, or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// The layered sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The configuration could not be written back to disk.
    #[error("Failed to write {path}: {source}")]
    WriteError {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A single field holds an invalid value.
    #[error("Invalid value for '{field}': {message}")]
    ValidationError {
        /// Dotted path of the field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Several fields hold invalid values.
    #[error("{} configuration problems found", .0.len())]
    MultipleValidationErrors(Vec<ConfigError>),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// What to do with an endpoint that has no module or no resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Drop the endpoint from the specification.
    Exclude,
    /// Substitute the configured default descriptor.
    #[default]
    UseDefault,
    /// Abort generation, listing every orphaned endpoint.
    Fail,
}

/// How enum options render their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumValue {
    /// The declared option name.
    #[default]
    Name,
    /// The underlying literal value.
    Literal,
}

/// Settings that shape the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationConfig {
    /// Name of the generated specification.
    pub name: String,

    /// Free-form comments attached to the specification root.
    pub comments: Option<String>,

    /// Policy for endpoints without a module.
    pub orphaned_module_endpoints: OrphanPolicy,

    /// Policy for endpoints without a resource.
    pub orphaned_resource_endpoints: OrphanPolicy,

    /// Enum option value emission mode.
    pub enum_value: EnumValue,

    /// Previously persisted specification to merge with.
    pub merge_specification_path: Option<PathBuf>,
}

impl Default for SpecificationConfig {
    fn default() -> Self {
        Self {
            name: "API".to_string(),
            comments: None,
            orphaned_module_endpoints: OrphanPolicy::UseDefault,
            orphaned_resource_endpoints: OrphanPolicy::UseDefault,
            enum_value: EnumValue::Name,
            merge_specification_path: None,
        }
    }
}

/// Location of the endpoint inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Path to a JSON or TOML inventory file.
    pub path: PathBuf,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("inventory.json"),
        }
    }
}

/// Where the `gen-spec` binary writes the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the pretty-printed JSON specification.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("specification.json"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Use production logging (JSON files plus compact stdout).
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            production: false,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document shaping.
    pub specification: SpecificationConfig,

    /// Inventory source.
    pub inventory: InventoryConfig,

    /// Output destination.
    pub output: OutputConfig,

    /// Server binding.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from `path`, layered under environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, or a
    /// load/validation error otherwise.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::from_sources(Some(path))
    }

    /// Load configuration from `path` if it exists, defaults otherwise.
    /// Environment variables apply in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or validation fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_sources(Some(path))
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Self::from_sources(None)
        }
    }

    fn from_sources(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check every field, reporting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns a single [`ConfigError::ValidationError`] or
    /// [`ConfigError::MultipleValidationErrors`].
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if self.specification.name.trim().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "specification.name".into(),
                message: "must not be empty".into(),
            });
        }
        if self
            .specification
            .merge_specification_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            errors.push(ConfigError::ValidationError {
                field: "specification.merge_specification_path".into(),
                message: "must not be empty when set".into(),
            });
        }
        if self.inventory.path.as_os_str().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "inventory.path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.output.path.as_os_str().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "output.path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.server.host.trim().is_empty() {
            errors.push(ConfigError::ValidationError {
                field: "server.host".into(),
                message: "must not be empty".into(),
            });
        }
        if self.server.port == 0 {
            errors.push(ConfigError::ValidationError {
                field: "server.port".into(),
                message: "must be between 1 and 65535".into(),
            });
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }

    /// Default configuration file path for this platform.
    ///
    /// On Linux: `/etc/apispec/apispec.toml`
    /// Elsewhere: the platform configuration directory, falling back to the
    /// working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "linux")]
        {
            PathBuf::from("/etc/apispec").join(CONFIG_FILE_NAME)
        }
        #[cfg(not(target_os = "linux"))]
        {
            directories::ProjectDirs::from("", "", "apispec").map_or_else(
                || PathBuf::from(CONFIG_FILE_NAME),
                |dirs| dirs.config_dir().join(CONFIG_FILE_NAME),
            )
        }
    }
}
