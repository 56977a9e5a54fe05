use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid YouTube URL: {0}")]
    UnrecognizedUrl(String),

    #[error("Failed to parse playlist info: {0}")]
    PlaylistJson(#[from] serde_json::Error),

    #[error("Unexpected response format: {0}")]
    UnexpectedPlaylistFormat(String),

    #[error("No videos found in playlist: {0}")]
    EmptyPlaylist(String),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to read answer: {0}")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}
