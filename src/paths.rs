use crate::error::{ExtractError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Per-platform default destination root, e.g.
/// `~/Library/Application Support/dev.StemExtractor.stem-extractor/Output`
/// on macOS. Used when the caller passes no `--output`.
pub fn default_output_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "StemExtractor", "stem-extractor")
        .ok_or_else(|| ExtractError::Input("could not determine output directory".into()))?;
    let mut p = PathBuf::from(proj.data_dir());
    p.push("Output");
    Ok(p)
}
