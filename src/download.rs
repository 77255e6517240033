//! Acquisition stage: fetch a remote URL into the staging directory as an
//! MP3 and pull title/duration metadata out of the downloader's response.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::tools::{run_tool, CancelToken, Toolchain};

/// Everything the pipeline needs to know about a finished download.
#[derive(Clone, Debug)]
pub struct DownloadedAudio {
    /// The transcoded file inside the staging directory.
    pub path: PathBuf,
    /// Title sanitized for filesystem use; this is what the result reports.
    pub safe_title: String,
    pub duration: Option<f64>,
}

/// Subset of the downloader's JSON metadata we care about.
#[derive(Debug, Deserialize)]
struct DownloadMetadata {
    title: Option<String>,
    duration: Option<f64>,
}

/// Invoke the downloader against `url`, transcoding the best audio-only
/// stream to MP3 inside `staging_dir`. Playlist expansion is disabled;
/// exactly one item is fetched.
pub fn download_audio(
    tools: &Toolchain,
    url: &str,
    staging_dir: &Path,
    timeout: Option<Duration>,
    cancel: &CancelToken,
) -> Result<DownloadedAudio> {
    let template = staging_dir.join("%(title)s.%(ext)s");

    let mut cmd = Command::new(&tools.downloader);
    cmd.arg("--format")
        .arg("bestaudio/best")
        .arg("--extract-audio")
        .arg("--audio-format")
        .arg("mp3")
        .arg("--audio-quality")
        .arg("192K")
        .arg("--output")
        .arg(&template)
        .arg("--no-playlist")
        .arg("--print-json");
    if let Some(dir) = &tools.ffmpeg_dir {
        cmd.arg("--ffmpeg-location").arg(dir);
    }
    cmd.arg(url);

    let out = run_tool("yt-dlp", &mut cmd, timeout, cancel)?;
    if !out.success {
        return Err(ExtractError::Acquisition(out.stderr.trim_end().to_string()));
    }

    let meta = parse_metadata(&out.stdout);
    let title = meta
        .as_ref()
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let duration = meta.as_ref().and_then(|m| m.duration);

    let path = find_staged_mp3(staging_dir)?.ok_or_else(|| {
        ExtractError::Acquisition("Download failed - audio file not found".to_string())
    })?;

    info!("downloaded {:?} ({})", path, title);

    Ok(DownloadedAudio {
        path,
        safe_title: sanitize_title(&title),
        duration,
    })
}

/// The downloader prints one JSON object per fetched item; with playlists
/// disabled that is a single line, but scan all of stdout to be safe.
fn parse_metadata(stdout: &str) -> Option<DownloadMetadata> {
    for line in stdout.lines() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        match serde_json::from_str::<DownloadMetadata>(line) {
            Ok(meta) => return Some(meta),
            Err(e) => debug!("unparseable metadata line: {}", e),
        }
    }
    None
}

/// First `.mp3` in the staging directory, if any.
fn find_staged_mp3(staging_dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(staging_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("mp3"))
        })
        .collect();
    entries.sort();
    Ok(entries.into_iter().next())
}

/// Keep alphanumerics, spaces, hyphens and underscores; drop everything
/// else; trim trailing whitespace. Idempotent.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}
