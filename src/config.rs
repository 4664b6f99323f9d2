//! Environment-derived configuration for devsh

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::extensions::ExtensionListing;

pub const ENV_NAME: &str = "DEVSHELL_NAME";
pub const ENV_DOCS_DIR: &str = "DEVSHELL_DOCS_DIR";
pub const ENV_QUICKSTART: &str = "DEVSHELL_QUICKSTART";
pub const ENV_EXTENSIONS: &str = "DEVSHELL_EXTENSIONS";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("Unable to read extension listing {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// External programs the built-in actions call out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub figlet: String,
    pub lolcat: String,
    pub render: String,
    pub opener: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            figlet: "figlet".to_string(),
            lolcat: "lolcat".to_string(),
            render: "rich".to_string(),
            opener: "xdg-open".to_string(),
        }
    }
}

/// Process-wide configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub docs_dir: PathBuf,
    pub quickstart: PathBuf,
    pub extensions: ExtensionListing,
    pub tools: Tools,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` if a required variable is unset or empty,
    /// or `ConfigError::Listing` if the extension listing cannot be read.
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let name = required(ENV_NAME)?;
        let docs_dir = PathBuf::from(required(ENV_DOCS_DIR)?);
        let quickstart = PathBuf::from(required(ENV_QUICKSTART)?);
        let listing_path = PathBuf::from(required(ENV_EXTENSIONS)?);

        let defaults = Tools::default();
        let tool = |key: &str, default: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };
        let tools = Tools {
            figlet: tool("DEVSHELL_FIGLET", defaults.figlet),
            lolcat: tool("DEVSHELL_LOLCAT", defaults.lolcat),
            render: tool("DEVSHELL_RENDER", defaults.render),
            opener: tool("DEVSHELL_OPENER", defaults.opener),
        };

        let extensions = load_listing(&listing_path)?;
        debug!(
            "Loaded config for '{name}' (docs: {}, quickstart: {})",
            docs_dir.display(),
            quickstart.display()
        );

        Ok(Config {
            name,
            docs_dir,
            quickstart,
            extensions,
            tools,
        })
    }

    /// Entry page of the developer's guide
    #[must_use]
    pub fn guide_index(&self) -> PathBuf {
        self.docs_dir.join("guide").join("html").join("index.html")
    }
}

fn load_listing(path: &Path) -> Result<ExtensionListing, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Listing {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ExtensionListing::new(&contents))
}
