use std::path::PathBuf;

/// Commands the UI sends down to the session task.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Submit a draft. At least one of `text`/`file` must be present after
    /// trimming; otherwise the session treats the command as a no-op and
    /// issues no network call.
    SendMessage {
        text: Option<String>,
        file: Option<PathBuf>,
    },
    /// Tear the session down: stop polling and leave the live channel.
    Close,
}
