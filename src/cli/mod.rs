use crate::config::Config;
use crate::core::{AutoConfirm, MediaTool, Prompter, RunSummary, Session, StdinPrompter, YtDlp};
use crate::utils::split_url_list;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "ytaudio")]
#[command(about = "Download audio from YouTube videos and playlists through yt-dlp")]
#[command(version)]
pub struct Cli {
    /// Video or playlist URLs, each may be a comma-separated list.
    /// Read from standard input when omitted.
    #[arg(value_name = "URLS")]
    pub urls: Vec<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Audio format passed to the media tool
    #[arg(long)]
    pub audio_format: Option<String>,

    /// Audio quality passed to the media tool (0 is best)
    #[arg(long)]
    pub audio_quality: Option<String>,

    /// Path to the yt-dlp executable
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub tool_path: Option<PathBuf>,

    /// Configuration file (defaults to ./ytaudio.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Hide the playlist progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command line flags over the loaded configuration.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(format) = &self.audio_format {
            config.audio_format = format.clone();
        }
        if let Some(quality) = &self.audio_quality {
            config.audio_quality = quality.clone();
        }
        if let Some(tool_path) = &self.tool_path {
            config.tool_path = tool_path.clone();
        }
        if self.yes {
            config.assume_yes = true;
        }
        if self.no_progress {
            config.show_progress = false;
        }
        config
    }

    pub fn resolve_config(&self) -> Result<Config> {
        let config = self.apply_to(Config::load(self.config.as_deref())?);
        config.validate()?;
        Ok(config)
    }

    /// URLs given as arguments, flattened.
    pub fn argument_urls(&self) -> Vec<String> {
        self.urls
            .iter()
            .flat_map(|arg| split_url_list(arg))
            .collect()
    }

    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;
        debug!("Configuration: {:?}", config);

        let tool = YtDlp::new(&config);
        match tool.version().await {
            Ok(version) => info!("Using {} {}", tool.name(), version),
            Err(e) => warn!("{} does not appear to be usable: {}", tool.name(), e),
        }

        let mut stdin: StdinPrompter = StdinPrompter::new();
        let urls = if self.urls.is_empty() {
            split_url_list(&stdin.read_url_line().await?)
        } else {
            self.argument_urls()
        };

        if urls.is_empty() {
            warn!("No URLs given");
            return Ok(());
        }

        let prompter: Box<dyn Prompter> = if config.assume_yes {
            Box::new(AutoConfirm)
        } else {
            Box::new(stdin)
        };

        let mut session = Session::new(tool, prompter).with_progress(config.show_progress);
        let summary = session.run(&urls).await;
        report(&summary);

        Ok(())
    }
}

fn report(summary: &RunSummary) {
    info!(
        "Finished: {} of {} URLs succeeded, {} failed or skipped.",
        summary.succeeded, summary.processed, summary.failed
    );
}
