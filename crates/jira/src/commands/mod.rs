//! Command implementations

pub mod info;

pub mod issue;

pub mod worklog;

use std::io::IsTerminal;

/// Global flags that individual commands care about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Globals {
    /// `--json`: machine-readable output.
    pub json: bool,
    /// `--debug`: log API traffic.
    pub debug: bool,
}

/// Whether stdin carries input for the command (`echo text | jira ...`).
///
/// A pipe always counts, even an empty one; a redirected file counts when it
/// is non-empty. A terminal or `/dev/null` (cron jobs, CI runners) does not.
pub fn stdin_has_data() -> bool {
    if std::io::stdin().is_terminal() {
        return false;
    }
    redirected_stdin_has_data()
}

#[cfg(unix)]
fn redirected_stdin_has_data() -> bool {
    use std::os::fd::AsFd;

    std::io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .and_then(|fd| std::fs::File::from(fd).metadata())
        .map_or(true, |meta| counts_as_data(&meta))
}

#[cfg(not(unix))]
fn redirected_stdin_has_data() -> bool {
    true
}

#[cfg(unix)]
fn counts_as_data(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;

    let file_type = meta.file_type();
    file_type.is_fifo() || file_type.is_socket() || meta.len() > 0
}
