//! Core library for the `jira` CLI.
//!
//! # Modules
//!
//! - [`api`] - Jira REST client and the [`api::WorklogApi`] seam
//! - [`browser`] - Opening issue pages in the web browser
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types and result aliases
//! - [`issue`] - Issue key normalization and URLs
//! - [`worklog`] - Resolve, complete, confirm and submit a worklog
//!
//! # Quick Start
//!
//! ```no_run
//! use jira_core::api::{ClientConfig, JiraClient};
//! use jira_core::worklog::{self, AddFlags, WorklogParams};
//! use jira_core::ConfigLoader;
//!
//! let config = ConfigLoader::new().load().expect("Failed to load configuration");
//! let client = JiraClient::new(ClientConfig::from_config(&config).unwrap()).unwrap();
//!
//! let params = WorklogParams::resolve(
//!     &["PROJ-1", "2h", "Did work", "2023-01-01", "09:00"],
//!     AddFlags::default(),
//!     config.project_key(),
//! )
//! .unwrap();
//! let server = config.server_url().unwrap();
//! let done = worklog::submit(&params, &client, server, &chrono::Local).unwrap();
//! println!("{}", done.browse_url);
//! ```
#![deny(unsafe_code)]

pub mod api;

pub mod browser;

pub mod config;

pub mod error;

pub mod issue;

pub mod worklog;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};
