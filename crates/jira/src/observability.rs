//! Logging setup.
//!
//! Events are written as JSON lines to a daily rolling file. Nothing here
//! writes to stdout, which carries command output (`--json` documents,
//! worklog confirmation lines). When no log file can be opened, logs go to
//! stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "JIRA_LOG_PATH";
const ENV_LOG_DIR: &str = "JIRA_LOG_DIR";
const LOG_FILE_PREFIX: &str = "jira";
const LOG_FILE_SUFFIX: &str = "jsonl";
const MAX_LOG_FILES: usize = 14;

/// Where log files may go, most specific first.
#[derive(Clone, Debug, Default)]
pub struct ObservabilityConfig {
    /// `JIRA_LOG_PATH`: a file path; the date is inserted before the extension.
    pub log_path: Option<PathBuf>,
    /// `JIRA_LOG_DIR`.
    pub log_dir: Option<PathBuf>,
    /// `log_dir` from the config files.
    pub config_log_dir: Option<PathBuf>,
    /// Platform state directory (`~/.local/state/jira/logs` on Linux).
    pub default_log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the `JIRA_LOG_*` variables and add the config file's `log_dir`.
    pub fn from_env(config_log_dir: Option<PathBuf>) -> Self {
        Self {
            log_path: std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
            log_dir: std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
            config_log_dir,
            default_log_dir: default_log_dir(),
        }
    }

    fn candidates(&self) -> Vec<LogFile> {
        let path = self.log_path.as_deref().and_then(LogFile::at_path);
        let dirs = [&self.log_dir, &self.config_log_dir, &self.default_log_dir]
            .into_iter()
            .flatten()
            .map(|dir| LogFile::in_dir(dir));
        path.into_iter().chain(dirs).collect()
    }
}

fn default_log_dir() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", LOG_FILE_PREFIX)?;
    let base = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Some(base.join("logs"))
}

/// A daily rolling log file: `{dir}/{prefix}.{YYYY-MM-DD}.{suffix}`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LogFile {
    dir: PathBuf,
    prefix: String,
    suffix: Option<String>,
}

impl LogFile {
    fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: LOG_FILE_PREFIX.to_string(),
            suffix: Some(LOG_FILE_SUFFIX.to_string()),
        }
    }

    /// `None` when the path has no usable file name.
    fn at_path(path: &Path) -> Option<Self> {
        let prefix = path.file_stem()?.to_str()?.to_string();
        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some(Self {
            dir,
            prefix,
            suffix,
        })
    }

    fn open(&self) -> Result<RollingFileAppender, InitError> {
        let builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(MAX_LOG_FILES)
            .filename_prefix(self.prefix.as_str());
        let builder = match &self.suffix {
            Some(suffix) => builder.filename_suffix(suffix.as_str()),
            None => builder,
        };
        builder.build(&self.dir)
    }
}

/// Keeps the background log writer alive; drop it last to flush.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already set.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, guard) = log_writer(cfg);

    let log_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()?;

    tracing::debug!("observability initialized");

    Ok(ObservabilityGuard { _log_guard: guard })
}

fn log_writer(cfg: &ObservabilityConfig) -> (NonBlocking, WorkerGuard) {
    match first_writable(&cfg.candidates()) {
        Some(appender) => tracing_appender::non_blocking(appender),
        None => tracing_appender::non_blocking(std::io::stderr()),
    }
}

fn first_writable(candidates: &[LogFile]) -> Option<RollingFileAppender> {
    candidates.iter().find_map(|file| match file.open() {
        Ok(appender) => Some(appender),
        Err(err) => {
            eprintln!(
                "Warning: cannot log to {}: {err}",
                file.dir.join(&file.prefix).display()
            );
            None
        }
    })
}

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > `--debug` > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, debug: bool, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    if debug {
        return EnvFilter::new("debug");
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
