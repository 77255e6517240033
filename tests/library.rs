use std::fs;

use serde_json::{json, Value};
use tempfile::tempdir;

use stem_extractor::library::{patch_library, MetadataTable, TrackPatch};

fn table(entries: &[(&str, &str, &str)]) -> MetadataTable {
    MetadataTable::from_entries(
        entries
            .iter()
            .map(|(pattern, artist, album)| {
                (
                    pattern.to_string(),
                    TrackPatch {
                        artist: artist.to_string(),
                        album: album.to_string(),
                    },
                )
            })
            .collect(),
    )
}

#[test]
fn first_matching_pattern_wins() {
    let table = table(&[
        ("summer", "First Artist", "First Album"),
        ("summertime", "Second Artist", "Second Album"),
    ]);

    let patch = table.find("SUMMERTIME sadness.mp3").expect("no match");
    assert_eq!(patch.artist, "First Artist");
}

#[test]
fn matching_is_case_insensitive_substring() {
    let table = table(&[("lecrae - always knew", "Lecrae", "All Things Work Together")]);
    assert!(table.find("Lecrae - Always Knew (Lyrics).mp3").is_some());
    assert!(table.find("something else").is_none());
}

#[test]
fn patches_only_placeholder_metadata() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("library.json");
    fs::write(
        &lib,
        serde_json::to_string_pretty(&json!([
            {
                "title": "Poker Face",
                "artist": "Unknown Artist",
                "album": "YouTube",
                "fileURL": "file:///music/Poker%20Face.mp3"
            },
            {
                "title": "Poker Face",
                "artist": "Hand Curated",
                "album": "Properly Tagged",
                "fileURL": "file:///music/other/Poker Face.mp3"
            }
        ]))
        .unwrap(),
    )
    .unwrap();

    let table = table(&[("poker face", "Lecrae & 1K Phew", "No Church in a While")]);
    let updated = patch_library(&lib, &table, false).unwrap();
    assert_eq!(updated, 1);

    let tracks: Vec<Value> = serde_json::from_str(&fs::read_to_string(&lib).unwrap()).unwrap();
    assert_eq!(tracks[0]["artist"], "Lecrae & 1K Phew");
    assert_eq!(tracks[0]["album"], "No Church in a While");
    // The properly tagged copy is left alone.
    assert_eq!(tracks[1]["artist"], "Hand Curated");
    assert_eq!(tracks[1]["album"], "Properly Tagged");
}

#[test]
fn unknown_fields_are_preserved_across_a_rewrite() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("library.json");
    fs::write(
        &lib,
        serde_json::to_string(&json!([
            {
                "title": "Sleight of Hand",
                "artist": "Unknown Artist",
                "album": "Unknown",
                "fileURL": "file:///m/Sleight of Hand.mp3",
                "playCount": 42,
                "cuePoints": [0.5, 31.25]
            }
        ]))
        .unwrap(),
    )
    .unwrap();

    let table = table(&[("sleight of hand", "King Chav", "The Leftovers")]);
    assert_eq!(patch_library(&lib, &table, false).unwrap(), 1);

    let tracks: Vec<Value> = serde_json::from_str(&fs::read_to_string(&lib).unwrap()).unwrap();
    assert_eq!(tracks[0]["playCount"], 42);
    assert_eq!(tracks[0]["cuePoints"], json!([0.5, 31.25]));
    assert_eq!(tracks[0]["artist"], "King Chav");
}

#[test]
fn dry_run_counts_but_does_not_write() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("library.json");
    let original = serde_json::to_string(&json!([
        {
            "title": "Not the Same",
            "artist": "Unknown Artist",
            "album": "Unknown Album"
        }
    ]))
    .unwrap();
    fs::write(&lib, &original).unwrap();

    let table = table(&[("not the same", "Unknown", "Single")]);
    assert_eq!(patch_library(&lib, &table, true).unwrap(), 1);
    assert_eq!(fs::read_to_string(&lib).unwrap(), original);
}

#[test]
fn falls_back_to_title_when_file_url_does_not_match() {
    let dir = tempdir().unwrap();
    let lib = dir.path().join("library.json");
    fs::write(
        &lib,
        serde_json::to_string(&json!([
            {
                "title": "We Will Remember",
                "artist": "Unknown Artist",
                "album": "Unknown Album",
                "fileURL": "file:///m/track-0007.mp3"
            }
        ]))
        .unwrap(),
    )
    .unwrap();

    let table = table(&[("we will remember", "Braille", "The IV Edition")]);
    assert_eq!(patch_library(&lib, &table, false).unwrap(), 1);
}
