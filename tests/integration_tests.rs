use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::sync::Mutex;
use ytaudio::config::Config;
use ytaudio::core::{
    AutoConfirm, Error, MediaTool, PlaylistReport, Prompter, RunSummary, Session,
};

#[derive(Default)]
struct FakeTool {
    playlist_dump: Option<String>,
    failing_videos: HashSet<String>,
    downloads: Mutex<Vec<String>>,
    playlist_requests: Mutex<Vec<String>>,
}

impl FakeTool {
    fn with_playlist(dump: &str) -> Self {
        Self {
            playlist_dump: Some(dump.to_string()),
            ..Self::default()
        }
    }

    fn failing(mut self, url: &str) -> Self {
        self.failing_videos.insert(url.to_string());
        self
    }

    fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    fn playlist_requests(&self) -> Vec<String> {
        self.playlist_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaTool for FakeTool {
    fn name(&self) -> &str {
        "fake"
    }

    async fn version(&self) -> ytaudio::core::Result<String> {
        Ok("2024.01.01".to_string())
    }

    async fn dump_playlist(&self, url: &str) -> ytaudio::core::Result<String> {
        self.playlist_requests.lock().unwrap().push(url.to_string());
        match &self.playlist_dump {
            Some(dump) => Ok(dump.clone()),
            None => Err(Error::ToolFailed {
                program: "fake".to_string(),
                code: Some(1),
                stderr: "ERROR: The playlist does not exist.".to_string(),
            }),
        }
    }

    async fn download_audio(&self, url: &str) -> ytaudio::core::Result<()> {
        self.downloads.lock().unwrap().push(url.to_string());
        if self.failing_videos.contains(url) {
            return Err(Error::ToolFailed {
                program: "fake".to_string(),
                code: Some(1),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

struct ScriptedPrompter {
    answers: VecDeque<bool>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            questions: Vec::new(),
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&mut self, question: &str) -> ytaudio::core::Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

const THREE_VIDEO_PLAYLIST: &str = r#"{"_type": "url", "id": "aaa", "url": "https://www.youtube.com/watch?v=aaa", "title": "First"}
{"_type": "url", "id": "bbb", "url": "https://www.youtube.com/watch?v=bbb", "title": "Second"}
{"_type": "url", "id": "ccc", "url": "https://www.youtube.com/watch?v=ccc", "title": "Third"}
"#;

fn quiet_session<P: Prompter>(tool: FakeTool, prompter: P) -> Session<FakeTool, P> {
    Session::new(tool, prompter).with_progress(false)
}

#[tokio::test]
async fn test_confirmed_video_is_downloaded() -> Result<()> {
    let mut session = quiet_session(FakeTool::default(), ScriptedPrompter::new(&[true]));

    assert!(session.handle_url("https://youtu.be/dQw4w9WgXcQ").await);
    assert_eq!(session.tool().downloads(), vec!["https://youtu.be/dQw4w9WgXcQ"]);
    assert!(session.tool().playlist_requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_declined_video_is_skipped() -> Result<()> {
    let mut session = quiet_session(FakeTool::default(), ScriptedPrompter::new(&[false]));

    assert!(!session.handle_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await);
    assert!(session.tool().downloads().is_empty());
    assert_eq!(
        session.summary(),
        RunSummary {
            processed: 1,
            succeeded: 0,
            failed: 1
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_unrecognized_url_fails_without_prompting() -> Result<()> {
    let mut prompter = ScriptedPrompter::new(&[true]);

    {
        let mut session = quiet_session(FakeTool::default(), &mut prompter);
        assert!(!session.handle_url("https://vimeo.com/123456").await);
        assert!(session.tool().downloads().is_empty());
    }
    assert!(prompter.questions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_playlist_url_downloads_every_video() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST);
    let mut session = quiet_session(tool, ScriptedPrompter::new(&[true]));

    assert!(
        session
            .handle_url("https://www.youtube.com/playlist?list=PL-abc_123")
            .await
    );
    assert_eq!(
        session.tool().playlist_requests(),
        vec!["https://www.youtube.com/playlist?list=PL-abc_123"]
    );
    assert_eq!(
        session.tool().downloads(),
        vec![
            "https://www.youtube.com/watch?v=aaa",
            "https://www.youtube.com/watch?v=bbb",
            "https://www.youtube.com/watch?v=ccc",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_video_with_embedded_playlist_expands_playlist() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST);
    let mut session = quiet_session(tool, ScriptedPrompter::new(&[true]));

    assert!(
        session
            .handle_url("https://www.youtube.com/watch?v=bbb&list=PL-abc_123&index=2")
            .await
    );
    assert_eq!(
        session.tool().playlist_requests(),
        vec!["https://www.youtube.com/playlist?list=PL-abc_123"]
    );
    assert_eq!(session.tool().downloads().len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_declined_embedded_playlist_downloads_nothing() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST);
    let mut session = quiet_session(tool, ScriptedPrompter::new(&[false]));

    assert!(
        !session
            .handle_url("https://www.youtube.com/watch?v=bbb&list=PL-abc_123")
            .await
    );
    assert!(session.tool().playlist_requests().is_empty());
    assert!(session.tool().downloads().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_playlist_report_counts_failures() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST)
        .failing("https://www.youtube.com/watch?v=bbb");
    let session = quiet_session(tool, AutoConfirm);

    let report = session
        .download_playlist_report("https://www.youtube.com/playlist?list=PL1")
        .await?;
    assert_eq!(
        report,
        PlaylistReport {
            downloaded: 2,
            total: 3
        }
    );
    assert!(report.downloaded <= report.total);

    // Partial failure still counts as a handled playlist.
    assert!(
        session
            .download_playlist("https://www.youtube.com/playlist?list=PL1")
            .await
    );

    Ok(())
}

#[tokio::test]
async fn test_json_array_playlist() -> Result<()> {
    let dump = r#"[{"url": "https://www.youtube.com/watch?v=aaa"}, {"id": "bbb"}]"#;
    let session = quiet_session(FakeTool::with_playlist(dump), AutoConfirm);

    let report = session
        .download_playlist_report("https://www.youtube.com/playlist?list=PL1")
        .await?;
    assert_eq!(report.total, 2);
    assert_eq!(
        session.tool().downloads(),
        vec![
            "https://www.youtube.com/watch?v=aaa",
            "https://www.youtube.com/watch?v=bbb"
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_playlist_fails() -> Result<()> {
    let session = quiet_session(FakeTool::with_playlist(""), AutoConfirm);

    let result = session
        .download_playlist_report("https://www.youtube.com/playlist?list=PL1")
        .await;
    assert!(matches!(result, Err(Error::EmptyPlaylist(_))));
    assert!(
        !session
            .download_playlist("https://www.youtube.com/playlist?list=PL1")
            .await
    );

    Ok(())
}

#[tokio::test]
async fn test_malformed_playlist_json_fails() -> Result<()> {
    let session = quiet_session(FakeTool::with_playlist("{not json"), AutoConfirm);

    assert!(
        !session
            .download_playlist("https://www.youtube.com/playlist?list=PL1")
            .await
    );
    assert!(session.tool().downloads().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_playlist_tool_failure_fails() -> Result<()> {
    let mut session = quiet_session(FakeTool::default(), AutoConfirm);

    assert!(
        !session
            .handle_url("https://www.youtube.com/playlist?list=PL1")
            .await
    );

    Ok(())
}

#[tokio::test]
async fn test_run_tallies_mixed_inputs() -> Result<()> {
    let tool = FakeTool::default().failing("https://youtu.be/broken");
    let mut session = quiet_session(tool, AutoConfirm);

    let summary = session
        .run([
            "https://youtu.be/good",
            "not a url",
            "https://youtu.be/broken",
        ])
        .await;
    assert_eq!(
        summary,
        RunSummary {
            processed: 3,
            succeeded: 1,
            failed: 2
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_prompt_wording_matches_url_kind() -> Result<()> {
    let mut prompter = ScriptedPrompter::new(&[false, false, false]);
    let tool = FakeTool::default();

    {
        let mut session = quiet_session(tool, &mut prompter);
        session.handle_url("https://youtu.be/abc").await;
        session.handle_url("https://youtu.be/abc?list=PL1").await;
        session
            .handle_url("https://www.youtube.com/playlist?list=PL1")
            .await;
    }

    assert_eq!(prompter.questions.len(), 3);
    assert!(prompter.questions[0]
        .contains("video URL. Do you want to download audio from this video"));
    assert!(prompter.questions[1].contains("embedded playlist"));
    assert!(prompter.questions[2].contains("playlist URL"));

    Ok(())
}

#[tokio::test]
async fn test_config_file_loading() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "tool_path = \"/usr/local/bin/yt-dlp\"")?;
    writeln!(file, "audio_format = \"m4a\"")?;
    writeln!(file, "output_dir = \"downloads\"")?;

    let config = Config::load(Some(file.path()))?;
    assert_eq!(config.audio_format, "m4a");
    assert_eq!(
        config.tool_path,
        std::path::PathBuf::from("/usr/local/bin/yt-dlp")
    );
    assert_eq!(
        config.output_dir,
        Some(std::path::PathBuf::from("downloads"))
    );
    assert!(config.embed_metadata);

    Ok(())
}

#[tokio::test]
async fn test_missing_explicit_config_is_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let result = Config::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_short_link_playlist_gets_playlist_prompt() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST);
    let mut prompter = ScriptedPrompter::new(&[true]);

    {
        let mut session = quiet_session(tool, &mut prompter);
        assert!(session.handle_url("https://youtu.be/playlist?list=PL1").await);
        assert_eq!(
            session.tool().playlist_requests(),
            vec!["https://youtu.be/playlist?list=PL1"]
        );
        assert_eq!(session.tool().downloads().len(), 3);
    }

    assert_eq!(
        prompter.questions,
        vec!["This is a YouTube playlist URL. Do you want to download audio from this playlist?"]
    );

    Ok(())
}

#[tokio::test]
async fn test_playlist_with_progress_bar_enabled() -> Result<()> {
    let tool = FakeTool::with_playlist(THREE_VIDEO_PLAYLIST)
        .failing("https://www.youtube.com/watch?v=ccc");
    let session = Session::new(tool, AutoConfirm);

    let report = session
        .download_playlist_report("https://www.youtube.com/playlist?list=PL1")
        .await?;
    assert_eq!(
        report,
        PlaylistReport {
            downloaded: 2,
            total: 3
        }
    );
    assert_eq!(session.tool().downloads().len(), 3);

    Ok(())
}
