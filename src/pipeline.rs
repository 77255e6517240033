//! The per-job state machine: sequence acquisition, separation and
//! placement for one of the two entry modes, emitting milestone progress
//! along the way and exactly one terminal result no matter what happens.

use std::io::Write;

use tracing::{error, info};

use crate::audio::probe_duration;
use crate::device::Device;
use crate::download::download_audio;
use crate::error::{ExtractError, Result};
use crate::placement::{place_stems, StagingArea};
use crate::report::{ExtractResult, Reporter};
use crate::separator::separate;
use crate::types::{ExtractOptions, Job, JobMode};

/// Run one job to completion. Every failure, expected or not, is
/// converted into a failure result here; the caller never sees an error
/// and the process never aborts because of one.
pub fn run<W: Write>(job: &Job, opts: &ExtractOptions, reporter: &mut Reporter<W>) -> ExtractResult {
    let outcome = match &job.mode {
        JobMode::Url(url) => extract_from_url(url, job, opts, reporter),
        JobMode::File(path) => extract_from_file(path, job, opts, reporter),
    };

    let result = match outcome {
        Ok(result) => {
            info!("job finished: {:?}", result.title);
            result
        }
        Err(e) => {
            error!("job failed: {e}");
            ExtractResult::failure(&e)
        }
    };
    reporter.result(&result);
    result
}

fn extract_from_url<W: Write>(
    url: &str,
    job: &Job,
    opts: &ExtractOptions,
    reporter: &mut Reporter<W>,
) -> Result<ExtractResult> {
    let device = opts.device.unwrap_or_else(Device::detect);
    let staging = StagingArea::acquire(&job.output_root)?;

    reporter.progress(0.1, "Downloading audio...", "download");
    let staged = staging.temp_dir()?;
    let downloaded = download_audio(&opts.toolchain, url, staged, opts.timeout, &opts.cancel)?;

    reporter.progress(0.3, "Processing with Demucs...", "demucs");
    let stem_dir = separate(
        &opts.toolchain,
        &downloaded.path,
        &job.output_root,
        device,
        opts.timeout,
        &opts.cancel,
    )?;

    reporter.progress(0.9, "Finalizing...", "finalize");
    // Destination files are named after the downloaded file, which the
    // downloader derived from the raw title; the reported title is the
    // sanitized one.
    let base_name = file_base_name(&downloaded.path)?;
    let stems = place_stems(&stem_dir, &job.output_root, &base_name)?;

    reporter.progress(1.0, "Complete!", "done");
    Ok(ExtractResult::success(
        &stems,
        &downloaded.safe_title,
        downloaded.duration,
    ))
}

fn extract_from_file<W: Write>(
    input: &std::path::Path,
    job: &Job,
    opts: &ExtractOptions,
    reporter: &mut Reporter<W>,
) -> Result<ExtractResult> {
    // Checked before any progress line: a missing input produces a bare
    // failure result with no preceding output.
    if !input.exists() {
        return Err(ExtractError::Input(format!(
            "File not found: {}",
            input.display()
        )));
    }

    let device = opts.device.unwrap_or_else(Device::detect);
    // Held for its Drop: the separator scratch tree is reclaimed on every
    // exit path, not just after a clean placement.
    let _staging = StagingArea::acquire(&job.output_root)?;

    reporter.progress(0.1, "Preparing audio...", "prepare");
    let title = file_base_name(input)?;
    let duration = probe_duration(input);

    reporter.progress(0.2, "Processing with Demucs...", "demucs");
    let stem_dir = separate(
        &opts.toolchain,
        input,
        &job.output_root,
        device,
        opts.timeout,
        &opts.cancel,
    )?;

    reporter.progress(0.9, "Finalizing...", "finalize");
    let stems = place_stems(&stem_dir, &job.output_root, &title)?;

    reporter.progress(1.0, "Complete!", "done");
    Ok(ExtractResult::success(&stems, &title, duration))
}

fn file_base_name(path: &std::path::Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| ExtractError::Input(format!("unusable file name: {}", path.display())))
}
