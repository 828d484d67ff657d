//! Video probing and frame extraction via an external ffmpeg process.
//!
//! The pipeline talks to [`MediaProber`] rather than to ffmpeg directly, so
//! tests can substitute a fake and the shell-out details stay in one place.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::error::MediaError;

/// Capability seam for the external media decoder.
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Probe a stored video for its duration in seconds.
    ///
    /// `None` means the duration could not be determined (tool failure,
    /// unparseable output). That is an unknown, not an error: callers
    /// continue processing.
    async fn probe_duration(&self, path: &Path) -> Option<f64>;

    /// Extract one frame at `at_second`, downscaled to `max_width` (height
    /// preserved proportionally), and write it to `out`. A failure here is
    /// hard: the gallery has no fallback visual.
    async fn extract_frame(
        &self,
        path: &Path,
        at_second: f64,
        max_width: u32,
        out: &Path,
    ) -> Result<(), MediaError>;
}

/// Parse ffmpeg's diagnostic output for a `Duration: HH:MM:SS[.frac]` line.
pub fn parse_duration(output: &str) -> Option<f64> {
    // Static pattern; compile failure would be a bug caught by tests.
    let re = Regex::new(r"Duration:\s*(\d{2}):(\d{2}):(\d{2}(?:\.\d+)?)").ok()?;
    let caps = re.captures(output)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Real prober shelling out to ffmpeg.
pub struct FfmpegProber {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegProber {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    /// Run ffmpeg with a hard timeout; the child is killed if the future is
    /// dropped or the deadline passes. A hung decoder must not pin a worker.
    async fn run(&self, args: &[&str]) -> Result<std::process::Output, MediaError> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(MediaError::ThumbnailGenerationFailed(format!(
                "{} timed out after {:?}",
                self.ffmpeg_path, self.timeout
            ))),
        }
    }
}

#[async_trait]
impl MediaProber for FfmpegProber {
    #[tracing::instrument(skip(self))]
    async fn probe_duration(&self, path: &Path) -> Option<f64> {
        let path_str = path.to_string_lossy();
        // Metadata-only decode: null muxer, no output file. ffmpeg prints the
        // stream banner (including Duration) on stderr and exits non-zero for
        // some inputs; both are tolerated.
        let args = ["-hide_banner", "-i", path_str.as_ref(), "-f", "null", "-"];
        let output = match self.run(&args).await {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Duration probe failed");
                return None;
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        parse_duration(&text)
    }

    #[tracing::instrument(skip(self))]
    async fn extract_frame(
        &self,
        path: &Path,
        at_second: f64,
        max_width: u32,
        out: &Path,
    ) -> Result<(), MediaError> {
        let path_str = path.to_string_lossy();
        let out_str = out.to_string_lossy();
        let at = format!("{}", at_second);
        let scale = format!("scale={}:-1", max_width);
        let args = [
            "-ss",
            at.as_str(),
            "-i",
            path_str.as_ref(),
            "-frames:v",
            "1",
            "-vf",
            scale.as_str(),
            "-y",
            out_str.as_ref(),
        ];
        let output = self.run(&args).await?;
        if !output.status.success() {
            return Err(MediaError::ThumbnailGenerationFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(())
    }
}
