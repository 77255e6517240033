//! Maintenance utility: patch placeholder artist/album fields in a stored
//! track library by matching filenames against an ordered pattern table.
//!
//! The table is injected by the caller (loaded from a JSON file), never
//! module-level state; the first matching pattern wins, so order matters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{ExtractError, Result};

/// Replacement metadata for one pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPatch {
    pub artist: String,
    pub album: String,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    pattern: String,
    artist: String,
    album: String,
}

/// Ordered list of `(pattern, patch)` pairs.
#[derive(Debug, Default)]
pub struct MetadataTable {
    entries: Vec<(String, TrackPatch)>,
}

impl MetadataTable {
    pub fn from_entries(entries: Vec<(String, TrackPatch)>) -> Self {
        Self { entries }
    }

    /// Load from a JSON array of `{pattern, artist, album}` objects,
    /// preserving file order.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ExtractError::Input(format!("cannot read table {}: {e}", path.display())))?;
        let entries: Vec<TableEntry> = serde_json::from_str(&raw)?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|e| {
                    (
                        e.pattern,
                        TrackPatch {
                            artist: e.artist,
                            album: e.album,
                        },
                    )
                })
                .collect(),
        })
    }

    /// First entry whose pattern occurs in `name`, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&TrackPatch> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(pattern, _)| name.contains(&pattern.to_lowercase()))
            .map(|(_, patch)| patch)
    }
}

/// One stored track. Fields the patcher does not understand are carried
/// through untouched.
#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(rename = "fileURL", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const PLACEHOLDER_ARTIST: &str = "Unknown Artist";
const PLACEHOLDER_ALBUMS: &[&str] = &["Unknown Album", "Unknown", "YouTube"];

fn is_placeholder(track: &LibraryTrack) -> bool {
    let artist = track.artist.as_deref().unwrap_or(PLACEHOLDER_ARTIST);
    let album = track.album.as_deref().unwrap_or("Unknown Album");
    artist == PLACEHOLDER_ARTIST || PLACEHOLDER_ALBUMS.contains(&album)
}

/// Rewrite placeholder metadata in the library file at `path`. Matching
/// tries the fileURL's basename first, then the title. Returns the number
/// of tracks updated; with `dry_run` the file is left untouched.
pub fn patch_library(path: &Path, table: &MetadataTable, dry_run: bool) -> Result<usize> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ExtractError::Input(format!("cannot read library {}: {e}", path.display())))?;
    let mut tracks: Vec<LibraryTrack> = serde_json::from_str(&raw)?;

    let mut updated = 0;
    for track in &mut tracks {
        let title = track.title.clone().unwrap_or_default();
        let filename = track
            .file_url
            .as_deref()
            .and_then(basename)
            .unwrap_or_else(|| title.clone());

        let patch = table.find(&filename).or_else(|| table.find(&title));
        if let Some(patch) = patch {
            if is_placeholder(track) {
                info!(
                    "{}: {:?}/{:?} -> {}/{}",
                    title, track.artist, track.album, patch.artist, patch.album
                );
                track.artist = Some(patch.artist.clone());
                track.album = Some(patch.album.clone());
                updated += 1;
            }
        }
    }

    if updated > 0 && !dry_run {
        write_atomically(path, &tracks)?;
    }
    Ok(updated)
}

fn basename(url: &str) -> Option<String> {
    url.rsplit('/').next().map(str::to_string).filter(|s| !s.is_empty())
}

/// Temp-then-rename so an interrupted write cannot corrupt the library.
fn write_atomically(path: &Path, tracks: &[LibraryTrack]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(tracks)?)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ExtractError::from(e)
    })?;
    Ok(())
}
