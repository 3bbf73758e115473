//! Settings file and the resolution of effective settings.
//!
//! ```toml
//! # ngtax.toml
//! [database]
//! backend = "sqlite"
//! connection_string = "ngtax.db"
//!
//! [defaults]
//! owner = "ada"
//! nhf_basis = "basic"   # basic | gross
//!
//! [logging]
//! level = "warn"
//! file = "ngtax.log"
//!
//! [output]
//! format = "text"       # text | json
//! ```
//!
//! Precedence, highest first: command-line flag, file, built-in default.
//! The file is taken from `--config`, then `$NGTAX_CONFIG`, then
//! `./ngtax.toml`; only an explicitly named file has to exist.

use std::path::{Path, PathBuf};

use ngtax_core::NhfBasis;
use ngtax_core::db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cli::{GlobalArgs, OutputFormat};

pub const CONFIG_ENV_VAR: &str = "NGTAX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ngtax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid nhf_basis '{0}' in config; expected `basic` or `gross`")]
    NhfBasis(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: DatabaseSection,
    pub defaults: DefaultsSection,
    pub logging: LoggingSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsSection {
    pub owner: Option<String>,
    pub nhf_basis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the settings file, or the empty config when none is found.
    ///
    /// `explicit` is the `--config` flag and `env` the value of
    /// `$NGTAX_CONFIG`; either one names a file that must exist.
    pub fn discover(
        explicit: Option<&Path>,
        env: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let (path, required) = match (explicit, env) {
            (Some(path), _) => (path.to_path_buf(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.is_file() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "config file loaded");
        Self::from_toml(&text, &path)
    }
}

/// Effective settings after applying flags over the file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db: DbConfig,
    pub owner: String,
    pub nhf_basis: NhfBasis,
    pub format: OutputFormat,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub clamp: bool,
}

impl Settings {
    pub const DEFAULT_BACKEND: &str = "sqlite";
    pub const DEFAULT_DATABASE: &str = "ngtax.db";
    pub const DEFAULT_OWNER: &str = "default";
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    pub fn resolve(
        args: &GlobalArgs,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        let nhf_basis = match file.defaults.nhf_basis {
            Some(raw) => NhfBasis::parse(&raw).ok_or(ConfigError::NhfBasis(raw))?,
            None => NhfBasis::default(),
        };

        Ok(Self {
            db: DbConfig {
                backend: args
                    .backend
                    .clone()
                    .or(file.database.backend)
                    .unwrap_or_else(|| Self::DEFAULT_BACKEND.to_string()),
                connection_string: args
                    .db
                    .clone()
                    .or(file.database.connection_string)
                    .unwrap_or_else(|| Self::DEFAULT_DATABASE.to_string()),
            },
            owner: args
                .owner
                .clone()
                .or(file.defaults.owner)
                .unwrap_or_else(|| Self::DEFAULT_OWNER.to_string()),
            nhf_basis,
            format: args.format.or(file.output.format).unwrap_or_default(),
            log_level: args
                .log_level
                .clone()
                .or(file.logging.level)
                .unwrap_or_else(|| Self::DEFAULT_LOG_LEVEL.to_string()),
            log_file: args.log_file.clone().or(file.logging.file),
            clamp: args.clamp,
        })
    }

    /// Resolves settings for `args`, reading `$NGTAX_CONFIG` from the
    /// environment.
    pub fn load(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let file = FileConfig::discover(args.config.as_deref(), env)?;
        Self::resolve(args, file)
    }
}
