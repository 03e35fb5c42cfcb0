//! Info command — show package and configuration information.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use camino::Utf8PathBuf;
use jira_core::config::Config;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

/// Effective configuration. The API token itself is never shown.
#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    config_files: Vec<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login: Option<String>,
    auth_type: &'static str,
    api_token_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_key: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, config_files: &[Utf8PathBuf]) -> Self {
        Self {
            config_files: config_files.iter().map(ToString::to_string).collect(),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            server: config.server.clone(),
            login: config.login.clone(),
            auth_type: config.auth_type.as_str(),
            api_token_set: config.api_token.as_deref().is_some_and(|t| !t.is_empty()),
            project_key: config.project_key().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package and configuration information.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `config_files` - Files the configuration was merged from
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    config_files: &[Utf8PathBuf],
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, config_files),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.package.name.bold(), info.package.version.green());
    if !info.package.description.is_empty() {
        println!("{}", info.package.description);
    }
    if !info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), info.package.license);
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    if info.config.config_files.is_empty() {
        println!("{}: {}", "Config files".dimmed(), "none loaded".yellow());
    } else {
        println!("{}:", "Config files".dimmed());
        for path in &info.config.config_files {
            println!("  {}", path.cyan());
        }
    }
    println!("{}: {}", "Log level".dimmed(), info.config.log_level);
    if let Some(ref dir) = info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Server".bold().underline());
    match info.config.server {
        Some(ref server) => println!("{}: {}", "URL".dimmed(), server.cyan()),
        None => println!("{}: {}", "URL".dimmed(), "not configured".yellow()),
    }
    if let Some(ref login) = info.config.login {
        println!("{}: {}", "Login".dimmed(), login);
    }
    println!("{}: {}", "Auth type".dimmed(), info.config.auth_type);
    let token = if info.config.api_token_set {
        "set".green().to_string()
    } else {
        "not set".yellow().to_string()
    };
    println!("{}: {}", "API token".dimmed(), token);
    if let Some(ref key) = info.config.project_key {
        println!("{}: {}", "Project key".dimmed(), key.cyan());
    }

    Ok(())
}
