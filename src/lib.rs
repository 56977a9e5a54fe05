pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

pub use config::Config;
pub use core::{classify, extract_playlist_url, MediaTool, PlaylistReport, Session, UrlKind, YtDlp};
