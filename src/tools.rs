//! External tool plumbing: resolved commands, subprocess capture, and the
//! timeout/cancellation policy shared by the downloader and separator.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{ExtractError, Result};

/// Directories checked for a local ffmpeg install before letting the
/// downloader fall back to its own lookup.
const FFMPEG_WELL_KNOWN: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin"];

/// Commands for the two external tools. Defaults come from `PATH`; the
/// environment overrides exist so a host bundle can pin its own copies.
#[derive(Clone, Debug)]
pub struct Toolchain {
    /// The audio/video downloader executable.
    pub downloader: PathBuf,
    /// Python interpreter used to run the separation module.
    pub python: PathBuf,
    /// Directory containing ffmpeg, when one of the well-known install
    /// locations has it.
    pub ffmpeg_dir: Option<PathBuf>,
}

impl Toolchain {
    pub fn from_env() -> Self {
        Self {
            downloader: env::var("STEM_EXTRACTOR_YTDLP")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("yt-dlp")),
            python: env::var("STEM_EXTRACTOR_PYTHON")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("python3")),
            ffmpeg_dir: find_ffmpeg_dir(),
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_env()
    }
}

fn find_ffmpeg_dir() -> Option<PathBuf> {
    FFMPEG_WELL_KNOWN
        .iter()
        .map(Path::new)
        .find(|dir| dir.join("ffmpeg").exists())
        .map(Path::to_path_buf)
}

/// Cooperative cancellation shared between the host-facing API and the
/// subprocess poll loop. Triggering it kills the running child.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Captured output of a finished tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` to completion, capturing both streams.
///
/// Both pipes are drained on background threads so a chatty child cannot
/// deadlock against a full pipe while we wait. The child is polled rather
/// than waited on, so a caller-supplied deadline or a triggered cancel
/// token can kill it; with no timeout the call blocks until the tool
/// exits, however long that takes.
pub fn run_tool(
    name: &str,
    cmd: &mut Command,
    timeout: Option<Duration>,
    cancel: &CancelToken,
) -> Result<ToolOutput> {
    debug!("running {}: {:?}", name, cmd);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExtractError::Unexpected(anyhow::anyhow!("failed to spawn {name}: {e}")))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_handle = thread::spawn(move || drain(stdout));
    let stderr_handle = thread::spawn(move || drain(stderr));

    // On the kill paths the drain threads are left to finish on their
    // own: joining could block on a grandchild that inherited the pipes
    // and outlives the kill.
    let deadline = timeout.map(|t| Instant::now() + t);
    let status = loop {
        if cancel.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExtractError::Cancelled);
        }
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ExtractError::Timeout {
                            tool: name.to_string(),
                            secs: timeout.unwrap_or_default().as_secs(),
                        });
                    }
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExtractError::Unexpected(anyhow::anyhow!(
                    "{name} process failed: {e}"
                )));
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    debug!("{} exited with {}", name, status);

    Ok(ToolOutput {
        success: status.success(),
        stdout,
        stderr,
    })
}

fn drain<R: Read>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        let _ = stream.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
