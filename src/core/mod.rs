pub mod classifier;
pub mod error;
pub mod playlist;
pub mod prompt;
pub mod session;
pub mod tool;

pub use classifier::{classify, extract_playlist_url, UrlKind};
pub use error::{Error, Result};
pub use playlist::{parse_playlist_json, PlaylistEntry};
pub use prompt::{AutoConfirm, Prompter, StdinPrompter};
pub use session::{PlaylistReport, RunSummary, Session};
pub use tool::{MediaTool, YtDlp};
