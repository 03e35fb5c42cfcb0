//! Issue key helpers.

/// Build a full issue key from user input.
///
/// With a default project key configured, a purely numeric input such as
/// `123` becomes `PROJ-123`. Anything else is upper-cased so `proj-7` and
/// `PROJ-7` name the same issue. Without a project key the input is returned
/// trimmed but otherwise unchanged.
pub fn issue_key(project_key: Option<&str>, key: &str) -> String {
    let key = key.trim();
    let Some(project) = project_key.filter(|p| !p.is_empty()) else {
        return key.to_string();
    };

    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        format!("{project}-{key}")
    } else {
        key.to_uppercase()
    }
}

/// URL of the issue in the Jira web UI.
pub fn browse_url(server: &str, issue_key: &str) -> String {
    format!("{}/browse/{issue_key}", server.trim_end_matches('/'))
}
