//! Placement of the final stems and reclamation of everything transient.
//!
//! The `StagingArea` guard owns the job's two transient trees (`temp/`
//! for downloads, `<output>/<model>/` for separator scratch) and removes
//! them when it goes out of scope, on every exit path. The final stems
//! are moved out of those trees before the guard runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::separator::{INSTRUMENTAL_FILE, VOCALS_FILE};
use crate::types::{StemPair, SEPARATION_MODEL};

const INSTRUMENTALS_DIR: &str = "Instrumentals";
const ACAPELLAS_DIR: &str = "Acapellas";

/// Job-scoped transient directories under the output root.
pub struct StagingArea {
    temp_dir: PathBuf,
    scratch_root: PathBuf,
}

impl StagingArea {
    /// Acquire the staging area for a job. Creates the output root;
    /// `temp/` is only created on demand by the URL path.
    pub fn acquire(output_root: &Path) -> Result<Self> {
        fs::create_dir_all(output_root)?;
        Ok(Self {
            temp_dir: output_root.join("temp"),
            scratch_root: output_root.join(SEPARATION_MODEL),
        })
    }

    /// Download staging directory, created on first use.
    pub fn temp_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.temp_dir)?;
        Ok(&self.temp_dir)
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        for dir in [&self.temp_dir, &self.scratch_root] {
            if dir.exists() {
                debug!("reclaiming {:?}", dir);
                let _ = fs::remove_dir_all(dir);
            }
        }
    }
}

/// Move the stems out of `stem_dir` into their destination folders.
///
/// `Instrumentals/<base>.mp3` is mandatory and must exist in `stem_dir`
/// by the time this is called; `Acapellas/<base>.mp3` is written only
/// when the vocals file exists.
pub fn place_stems(stem_dir: &Path, output_root: &Path, base_name: &str) -> Result<StemPair> {
    let instrumentals = output_root.join(INSTRUMENTALS_DIR);
    let acapellas = output_root.join(ACAPELLAS_DIR);
    fs::create_dir_all(&instrumentals)?;
    fs::create_dir_all(&acapellas)?;

    let final_instrumental = instrumentals.join(format!("{base_name}.mp3"));
    move_file(&stem_dir.join(INSTRUMENTAL_FILE), &final_instrumental)?;

    let vocals_src = stem_dir.join(VOCALS_FILE);
    let final_vocals = if vocals_src.exists() {
        let dest = acapellas.join(format!("{base_name}.mp3"));
        move_file(&vocals_src, &dest)?;
        Some(dest)
    } else {
        debug!("no vocals stem in {:?}", stem_dir);
        None
    };

    info!("placed stems for {}", base_name);

    Ok(StemPair {
        instrumental: final_instrumental,
        vocals: final_vocals,
    })
}

/// Rename, falling back to copy-and-remove when the rename fails (e.g.
/// across filesystems). Overwrites an existing destination.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    fs::copy(src, dest).map_err(|e| {
        ExtractError::Placement(format!(
            "could not move {} to {}: {e}",
            src.display(),
            dest.display()
        ))
    })?;
    let _ = fs::remove_file(src);
    Ok(())
}
