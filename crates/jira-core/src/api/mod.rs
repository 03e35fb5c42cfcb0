//! Jira REST API access.
//!
//! [`JiraClient`] talks to the v2 REST API over a blocking `reqwest` client.
//! The worklog workflow only depends on the [`WorklogApi`] trait so it can be
//! exercised without a server.

mod client;
mod error;

pub use client::{ClientConfig, JiraClient};
pub use error::{ApiError, ApiResult};

/// Creating worklog entries on an issue.
pub trait WorklogApi {
    /// Attach a worklog to `issue_key`.
    ///
    /// `started` is a Jira timestamp (`2023-01-01T09:00:00.000+0100`) and
    /// `time_spent` uses Jira duration syntax (`2h 30m`).
    fn add_issue_worklog(
        &self,
        issue_key: &str,
        comment: &str,
        started: &str,
        time_spent: &str,
    ) -> ApiResult<()>;
}
