//! Configuration loading and discovery.
//!
//! Settings come from, in order of increasing precedence:
//! 1. Built-in defaults
//! 2. User config in the XDG config directory
//! 3. Project config found by walking up from the current directory
//! 4. Explicit files (`--config`)
//! 5. `JIRA_*` environment variables
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations
//! - `.jira.<ext>` in current directory or any parent
//! - `jira.<ext>` in current directory or any parent
//! - `~/.config/jira/config.<ext>` (user config)
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use jira_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("server: {:?}", config.server);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The configuration for the jira CLI.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Base URL of the Jira instance, e.g. `https://example.atlassian.net`.
    pub server: Option<String>,
    /// Login (usually the account email) used for basic auth.
    pub login: Option<String>,
    /// API token or personal access token.
    ///
    /// Normally supplied through `JIRA_API_TOKEN` rather than a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// How the token is presented to the server.
    pub auth_type: AuthType,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Project defaults.
    pub project: Option<ProjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            server: None,
            login: None,
            api_token: None,
            auth_type: AuthType::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            project: None,
        }
    }
}

impl Config {
    /// The default project key used to expand bare issue numbers.
    pub fn project_key(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.key.as_deref())
            .filter(|k| !k.is_empty())
    }

    /// The server base URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] when no server is configured.
    pub fn server_url(&self) -> ConfigResult<&str> {
        self.server
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSetting {
                key: "server",
                hint: "set `server` in config or JIRA_SERVER",
            })
    }
}

/// Project-level defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Project key prepended to numeric issue keys (`123` → `KEY-123`).
    pub key: Option<String>,
}

/// Authentication scheme for API requests.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// HTTP basic auth with `login` and API token (Jira Cloud).
    #[default]
    Basic,
    /// Bearer personal access token (Jira Server / Data Center).
    Bearer,
}

impl AuthType {
    /// Returns the auth type as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Bearer => "bearer",
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "jira";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "JIRA_";

/// Keys that may be set from the environment.
const ENV_KEYS: &[&str] = &["server", "login", "api_token", "auth_type"];

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Whether to apply `JIRA_*` environment overrides.
    include_env: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load.
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            include_env: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/jira/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set whether `JIRA_SERVER`, `JIRA_LOGIN`, `JIRA_API_TOKEN` and
    /// `JIRA_AUTH_TYPE` override file values.
    pub const fn with_env(mut self, include: bool) -> Self {
        self.include_env = include;
        self
    }

    /// Set a boundary marker to stop directory traversal. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<Config> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for file in self.config_files() {
            figment = Self::merge_file(figment, &file);
        }

        if self.include_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));
        }

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            server = config.server.as_deref().unwrap_or(""),
            project = config.project_key().unwrap_or(""),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<Config> {
        if self.config_files().is_empty() {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Config files [`load`](Self::load) will read, lowest precedence first:
    /// user config, discovered project config, then explicit files.
    pub fn config_files(&self) -> Vec<Utf8PathBuf> {
        let user = self
            .include_user_config
            .then(|| self.find_user_config())
            .flatten();
        let project = self
            .project_search_root
            .as_ref()
            .and_then(|root| self.find_project_config(root));

        user.into_iter()
            .chain(project)
            .chain(self.explicit_files.iter().cloned())
            .collect()
    }

    /// Find project config by walking up from the given directory.
    fn find_project_config(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    return Some(dotfile);
                }

                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    return Some(regular);
                }
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        None
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Find the project config file path without loading it.
pub fn find_project_config<P: AsRef<Utf8Path>>(start: P) -> Option<Utf8PathBuf> {
    ConfigLoader::new()
        .with_project_search(start.as_ref())
        .without_boundary_marker()
        .find_project_config(start.as_ref())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path (`~/.config/jira/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

/// Get the user cache directory path (`~/.cache/jira/` on Linux).
pub fn user_cache_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.cache_dir().to_path_buf()).ok()
}

/// Get the user data directory path (`~/.local/share/jira/` on Linux).
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_dir().to_path_buf()).ok()
}

/// Get the machine-local data directory path.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_local_dir().to_path_buf()).ok()
}
