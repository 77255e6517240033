//! Separation stage: run the Demucs model runner as a subprocess and hand
//! back the directory its two stems landed in.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::info;

use crate::device::Device;
use crate::error::{ExtractError, Result};
use crate::tools::{run_tool, CancelToken, Toolchain};
use crate::types::SEPARATION_MODEL;

pub const INSTRUMENTAL_FILE: &str = "no_vocals.mp3";
pub const VOCALS_FILE: &str = "vocals.mp3";

/// Separate `input` into vocal and non-vocal stems under
/// `<output_root>/<model>/<input base name>/`.
///
/// The runner's own progress stream is captured, not forwarded; the
/// pipeline reports its own milestone around this call. Returns the
/// per-run stem directory on success.
pub fn separate(
    tools: &Toolchain,
    input: &Path,
    output_root: &Path,
    device: Device,
    timeout: Option<Duration>,
    cancel: &CancelToken,
) -> Result<PathBuf> {
    let mut cmd = Command::new(&tools.python);
    cmd.arg("-m")
        .arg("demucs")
        .arg("--two-stems=vocals")
        .arg("-n")
        .arg(SEPARATION_MODEL)
        .arg("-o")
        .arg(output_root)
        .arg("--device")
        .arg(device.as_arg())
        .arg("--mp3")
        .arg(input)
        .env("PYTHONIOENCODING", "utf-8");

    info!("separating {:?} on {}", input, device.as_arg());

    let out = run_tool("demucs", &mut cmd, timeout, cancel)?;
    if !out.success {
        return Err(ExtractError::Separation(format!(
            "Demucs error: {}",
            out.stderr.trim_end()
        )));
    }

    let base = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExtractError::Separation("input file has no usable name".to_string()))?;
    let stem_dir = output_root.join(SEPARATION_MODEL).join(base);

    if !stem_dir.join(INSTRUMENTAL_FILE).exists() {
        return Err(ExtractError::Separation(
            "Processing failed - output file not found".to_string(),
        ));
    }

    Ok(stem_dir)
}
