use crate::core::classifier::{classify, UrlKind};
use crate::core::error::{Error, Result};
use crate::core::playlist::parse_playlist_json;
use crate::core::prompt::Prompter;
use crate::core::tool::MediaTool;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{error, info};

/// Outcome of downloading a playlist. `downloaded <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistReport {
    pub downloaded: usize,
    pub total: usize,
}

/// Tally of all URLs handled during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, success: bool) {
        self.processed += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Drives one run: classifies inputs, asks for confirmation and hands the
/// work to the media tool one item at a time.
pub struct Session<T, P> {
    tool: T,
    prompter: P,
    show_progress: bool,
    summary: RunSummary,
}

impl<T: MediaTool, P: Prompter> Session<T, P> {
    pub fn new(tool: T, prompter: P) -> Self {
        Self {
            tool,
            prompter,
            show_progress: true,
            summary: RunSummary::default(),
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Handle every input in order and return the run tally.
    pub async fn run<I, S>(&mut self, inputs: I) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            self.handle_url(input.as_ref()).await;
        }
        self.summary
    }

    /// Classify `input` and download whatever the user confirms. Never
    /// fails: every error is logged and reported as `false`.
    pub async fn handle_url(&mut self, input: &str) -> bool {
        let success = match self.try_handle_url(input).await {
            Ok(success) => success,
            Err(e) => {
                error!("{}", e);
                false
            }
        };
        self.summary.record(success);
        success
    }

    async fn try_handle_url(&mut self, input: &str) -> Result<bool> {
        match classify(input)? {
            UrlKind::Video {
                url,
                playlist: Some(playlist_url),
            } => {
                info!("Detected YouTube video URL: {}", url);
                info!("Detected playlist URL within video URL: {}", playlist_url);
                let question = "This is a YouTube video URL with an embedded playlist. \
                                Do you want to download audio from this playlist?";
                if self.prompter.confirm(question).await? {
                    Ok(self.download_playlist(&playlist_url).await)
                } else {
                    info!("Skipping download for: {}", url);
                    Ok(false)
                }
            }
            UrlKind::Video { url, playlist: None } => {
                info!("Detected YouTube video URL: {}", url);
                let question =
                    "This is a YouTube video URL. Do you want to download audio from this video?";
                if self.prompter.confirm(question).await? {
                    Ok(self.download_video(&url).await)
                } else {
                    info!("Skipping download for: {}", url);
                    Ok(false)
                }
            }
            UrlKind::Playlist { url } => {
                info!("Detected YouTube playlist URL: {}", url);
                let question = "This is a YouTube playlist URL. \
                                Do you want to download audio from this playlist?";
                if self.prompter.confirm(question).await? {
                    Ok(self.download_playlist(&url).await)
                } else {
                    info!("Skipping download for: {}", url);
                    Ok(false)
                }
            }
        }
    }

    pub async fn download_video(&self, url: &str) -> bool {
        info!("Starting download for: {}", url);
        match self.tool.download_audio(url).await {
            Ok(()) => {
                info!("Successfully downloaded: {}", url);
                true
            }
            Err(e) => {
                error!("Failed to download {}: {}", url, e);
                false
            }
        }
    }

    pub async fn download_playlist(&self, url: &str) -> bool {
        match self.download_playlist_report(url).await {
            Ok(_) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Expand the playlist and download each member in order. Individual
    /// video failures only lower `downloaded`.
    pub async fn download_playlist_report(&self, url: &str) -> Result<PlaylistReport> {
        let video_urls = self.playlist_videos(url).await?;
        if video_urls.is_empty() {
            return Err(Error::EmptyPlaylist(url.to_string()));
        }

        let total = video_urls.len();
        info!("Playlist contains {} videos.", total);

        let progress = self.progress_bar(total);
        let mut downloaded = 0;
        for video_url in &video_urls {
            progress.set_message(video_url.clone());
            // The tool writes to the same terminal; keep the bar off screen meanwhile.
            self.park_progress(&progress);
            if self.download_video(video_url).await {
                downloaded += 1;
            }
            self.restore_progress(&progress);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Downloaded {} out of {} videos.", downloaded, total);
        Ok(PlaylistReport { downloaded, total })
    }

    /// Member video URLs of `url`, as reported by the tool.
    pub async fn playlist_videos(&self, url: &str) -> Result<Vec<String>> {
        let dump = self.tool.dump_playlist(url).await?;
        parse_playlist_json(&dump)
    }

    fn park_progress(&self, bar: &ProgressBar) {
        if self.show_progress {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
    }

    fn restore_progress(&self, bar: &ProgressBar) {
        if self.show_progress {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("Downloading playlist... [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}
