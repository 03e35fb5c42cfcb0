//! Opening URLs in the user's web browser.
//!
//! Shells out to the platform opener, honoring `$BROWSER` first.

use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from launching a browser.
#[derive(Error, Debug)]
pub enum BrowserError {
    /// No opener command could be found.
    #[error("no browser opener found (set $BROWSER)")]
    NoOpener,

    /// The opener command could not be started.
    #[error("failed to run {program}: {source}")]
    Exec {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result alias for browser operations.
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A resolved opener command line; the URL is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opener {
    /// Program to run.
    pub program: String,
    /// Arguments before the URL.
    pub args: Vec<String>,
}

/// Openers tried on Linux and the BSDs, in order.
const UNIX_OPENERS: &[&str] = &["xdg-open", "wslview"];

/// Pick an opener.
///
/// `browser_env` is the value of `$BROWSER`; `on_path` reports whether a
/// program is installed.
pub fn resolve_opener(
    browser_env: Option<&str>,
    os: &str,
    on_path: impl Fn(&str) -> bool,
) -> Option<Opener> {
    if let Some(mut parts) = browser_env
        .map(str::split_whitespace)
        .filter(|p| p.clone().next().is_some())
    {
        let program = parts.next()?.to_string();
        return Some(Opener {
            program,
            args: parts.map(str::to_string).collect(),
        });
    }

    match os {
        "macos" => Some(Opener {
            program: "open".to_string(),
            args: Vec::new(),
        }),
        "windows" => Some(Opener {
            program: "cmd".to_string(),
            args: vec!["/C".to_string(), "start".to_string(), String::new()],
        }),
        _ => UNIX_OPENERS
            .iter()
            .find(|name| on_path(name))
            .map(|name| Opener {
                program: (*name).to_string(),
                args: Vec::new(),
            }),
    }
}

/// Open `url` in the default browser without waiting for it to exit.
#[instrument]
pub fn open(url: &str) -> BrowserResult<()> {
    let browser_env = std::env::var("BROWSER").ok();
    let opener = resolve_opener(browser_env.as_deref(), std::env::consts::OS, |name| {
        which::which(name).is_ok()
    })
    .ok_or(BrowserError::NoOpener)?;

    debug!(program = %opener.program, "launching browser");
    Command::new(&opener.program)
        .args(&opener.args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| BrowserError::Exec {
            program: opener.program,
            source,
        })
}
