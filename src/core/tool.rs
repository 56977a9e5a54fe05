use crate::config::Config;
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// The external program that does all media work.
#[async_trait]
pub trait MediaTool: Send + Sync {
    fn name(&self) -> &str;

    /// Version string reported by the tool, used as an availability check.
    async fn version(&self) -> Result<String>;

    /// Raw flat-playlist JSON for `url`.
    async fn dump_playlist(&self, url: &str) -> Result<String>;

    /// Fetch the best audio stream of `url` and transcode it.
    async fn download_audio(&self, url: &str) -> Result<()>;
}

pub struct YtDlp {
    program: PathBuf,
    output_template: String,
    audio_format: String,
    audio_quality: String,
    embed_metadata: bool,
}

impl YtDlp {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.tool_path.clone(),
            output_template: config.output_path_template(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
            embed_metadata: config.embed_metadata,
        }
    }

    pub fn playlist_args(&self, url: &str) -> Vec<OsString> {
        ["--flat-playlist", "--dump-json", url]
            .into_iter()
            .map(OsString::from)
            .collect()
    }

    pub fn download_args(&self, url: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            "bestaudio".into(),
            "--extract-audio".into(),
            "--audio-quality".into(),
            self.audio_quality.as_str().into(),
            "--audio-format".into(),
            self.audio_format.as_str().into(),
        ];

        if self.embed_metadata {
            args.push("--embed-metadata".into());
            args.push("--add-metadata".into());
        }

        args.push("-o".into());
        args.push(self.output_template.as_str().into());
        args.push(url.into());
        args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn command(&self, args: &[OsString]) -> Command {
        debug!("Running {} {:?}", self.program.display(), args);
        let mut command = Command::new(&self.program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        command
    }

    async fn capture(&self, args: &[OsString]) -> Result<String> {
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ToolFailed {
                program: self.program_name(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaTool for YtDlp {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn version(&self) -> Result<String> {
        let stdout = self.capture(&[OsString::from("--version")]).await?;
        Ok(stdout.trim().to_string())
    }

    async fn dump_playlist(&self, url: &str) -> Result<String> {
        self.capture(&self.playlist_args(url)).await
    }

    async fn download_audio(&self, url: &str) -> Result<()> {
        // Output is inherited so the tool's own progress stays visible.
        let status = self
            .command(&self.download_args(url))
            .status()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed {
                program: self.program_name(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }
}
