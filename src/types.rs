use std::path::PathBuf;
use std::time::Duration;

use crate::device::Device;
use crate::tools::{CancelToken, Toolchain};

/// Fixed separation model identifier passed to the Demucs runner. The
/// scratch output tree under the output root is named after it.
pub const SEPARATION_MODEL: &str = "htdemucs_ft";

/// What a single invocation of the bridge operates on.
#[derive(Clone, Debug)]
pub enum JobMode {
    /// Fetch audio from a remote URL first.
    Url(String),
    /// Separate a local audio file directly.
    File(PathBuf),
}

/// One invocation of the pipeline, built from parsed arguments.
#[derive(Clone, Debug)]
pub struct Job {
    pub mode: JobMode,
    /// Destination root; staging, scratch and final folders all live under it.
    pub output_root: PathBuf,
}

/// A single audio file entering the separation stage.
#[derive(Clone, Debug)]
pub struct AudioAsset {
    pub path: PathBuf,
    /// Display title reported in the final result.
    pub title: String,
    /// Duration in seconds, when it could be determined.
    pub duration: Option<f64>,
}

/// The two relocated output files. Vocals are optional; only the
/// instrumental is mandatory.
#[derive(Clone, Debug)]
pub struct StemPair {
    pub instrumental: PathBuf,
    pub vocals: Option<PathBuf>,
}

/// Runtime knobs for one job.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub toolchain: Toolchain,
    /// Inference device; `None` means probe at job start.
    pub device: Option<Device>,
    /// Per-tool-invocation timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub cancel: CancelToken,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::from_env(),
            device: None,
            timeout: None,
            cancel: CancelToken::new(),
        }
    }
}
