use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "ytaudio.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program used for every media operation.
    pub tool_path: PathBuf,
    /// Directory the extracted audio lands in. `None` keeps the tool's
    /// working directory.
    pub output_dir: Option<PathBuf>,
    pub output_template: String,
    pub audio_format: String,
    pub audio_quality: String,
    pub embed_metadata: bool,
    pub show_progress: bool,
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from("yt-dlp"),
            output_dir: None,
            output_template: "%(title)s.%(ext)s".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "0".to_string(),
            embed_metadata: true,
            show_progress: true,
            assume_yes: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `ytaudio.toml` in the
    /// working directory when no path is given. A missing default file
    /// yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.audio_format.trim().is_empty() {
            anyhow::bail!("audio_format must not be empty");
        }
        if self.output_template.trim().is_empty() {
            anyhow::bail!("output_template must not be empty");
        }
        if self.tool_path.as_os_str().is_empty() {
            anyhow::bail!("tool_path must not be empty");
        }
        Ok(())
    }

    /// Final `-o` argument handed to the tool.
    pub fn output_path_template(&self) -> String {
        match &self.output_dir {
            Some(dir) => dir.join(&self.output_template).to_string_lossy().into_owned(),
            None => self.output_template.clone(),
        }
    }
}
