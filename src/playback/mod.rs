//! Speech playback and viewer launch for stored article bodies.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::app::{BriefError, Result};
use crate::config::PlaybackConfig;

#[async_trait]
pub trait Playback: Send + Sync {
    /// Read `body` aloud, returning once playback has finished.
    async fn speak(&self, body: &str, speed: f64) -> Result<()>;

    /// Show an article in a viewer.
    async fn view(&self, title: &str, body: &str) -> Result<()>;
}

/// Runs the configured text-to-speech program and viewer.
pub struct SystemPlayback {
    tts_command: String,
    viewer: Option<String>,
}

impl SystemPlayback {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            tts_command: config.tts_command.clone(),
            viewer: config.viewer.clone(),
        }
    }

    fn write_text(text: &str) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("brief-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    async fn run(program: &str, args: &[&OsStr]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|e| BriefError::External(format!("Failed to run {}: {}", program, e)))?;

        if !status.success() {
            return Err(BriefError::External(format!("{} exited with {}", program, status)));
        }
        Ok(())
    }
}

#[async_trait]
impl Playback for SystemPlayback {
    async fn speak(&self, body: &str, speed: f64) -> Result<()> {
        let file = Self::write_text(body)?;
        let speed = speed.to_string();

        tracing::debug!("Speaking {} at {}x", file.path().display(), speed);
        Self::run(
            &self.tts_command,
            &[
                OsStr::new("--file"),
                file.path().as_os_str(),
                OsStr::new("--speed"),
                OsStr::new(&speed),
            ],
        )
        .await
    }

    async fn view(&self, title: &str, body: &str) -> Result<()> {
        let file = Self::write_text(&format!("{}\n\n{}\n", title, body))?;
        let path = file
            .into_temp_path()
            .keep()
            .map_err(|e| BriefError::Io(e.error))?;

        match &self.viewer {
            Some(viewer) => Self::run(viewer, &[path.as_os_str()]).await,
            None => open_with_system(&path),
        }
    }
}

fn open_with_system(path: &Path) -> Result<()> {
    open::that(path).map_err(|e| {
        BriefError::External(format!("Failed to open {}: {}", path.display(), e))
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn playback(tts: &str) -> SystemPlayback {
        SystemPlayback::new(&PlaybackConfig {
            tts_command: tts.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_speak_success() {
        assert!(playback("true").speak("hello", 1.5).await.is_ok());
    }

    #[tokio::test]
    async fn test_speak_nonzero_exit_is_external() {
        let err = playback("false").speak("hello", 1.0).await.unwrap_err();
        assert!(matches!(err, BriefError::External(_)));
    }

    #[tokio::test]
    async fn test_speak_missing_program_is_external() {
        let err = playback("/nonexistent/brief-tts")
            .speak("hello", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::External(_)));
    }

    #[test]
    fn test_write_text() {
        let file = SystemPlayback::write_text("body text").unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "body text");
        assert!(file.path().to_string_lossy().ends_with(".txt"));
    }
}
