//! Machine-readable status lines for the host process.
//!
//! Everything the host parses goes through here: zero or more progress
//! lines followed by exactly one result line, each a single JSON object,
//! newline-terminated and flushed immediately so the host can render
//! progress without buffering delay.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::types::StemPair;

/// Milestone progress line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Fraction in [0, 1], non-decreasing within a job.
    pub progress: f64,
    /// Human-readable phrase.
    pub status: String,
    /// Machine-readable stage tag.
    pub step: String,
}

/// Terminal result line. All keys are always present; unset fields are
/// serialized as null, which is what the host expects.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    pub success: bool,
    pub instrumental_path: Option<String>,
    pub vocals_path: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub error: Option<String>,
}

impl ExtractResult {
    pub fn success(stems: &StemPair, title: &str, duration: Option<f64>) -> Self {
        Self {
            success: true,
            instrumental_path: Some(stems.instrumental.to_string_lossy().into_owned()),
            vocals_path: stems
                .vocals
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            title: Some(title.to_string()),
            duration,
            error: None,
        }
    }

    pub fn failure(err: &ExtractError) -> Self {
        Self {
            success: false,
            instrumental_path: None,
            vocals_path: None,
            title: None,
            duration: None,
            error: Some(err.to_string()),
        }
    }
}

/// Writes protocol lines to any sink, one JSON object per line.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit a milestone. Write failures are swallowed: if the host hung up
    /// there is nobody left to report to.
    pub fn progress(&mut self, progress: f64, status: &str, step: &str) {
        let update = ProgressUpdate {
            progress,
            status: status.to_string(),
            step: step.to_string(),
        };
        self.emit(&update);
    }

    /// Emit the terminal result line.
    pub fn result(&mut self, result: &ExtractResult) {
        self.emit(result);
    }

    fn emit<T: Serialize>(&mut self, value: &T) {
        if let Ok(line) = serde_json::to_string(value) {
            let _ = writeln!(self.out, "{line}");
            let _ = self.out.flush();
        }
    }
}
