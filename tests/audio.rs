use std::fs;
use std::path::Path;

use tempfile::tempdir;

use stem_extractor::audio::probe_duration;

/// Minimal canonical PCM WAV: 44-byte header plus silence.
fn write_wav(path: &Path, sample_rate: u32, seconds: u32) {
    let channels: u16 = 1;
    let bits: u16 = 16;
    let block_align = channels * bits / 8;
    let data_len = sample_rate * seconds * block_align as u32;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    fs::write(path, bytes).expect("write wav");
}

#[test]
fn reports_duration_of_a_pcm_wav() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_wav(&path, 8000, 2);

    let duration = probe_duration(&path).expect("no duration");
    assert!(
        (1.9..=2.1).contains(&duration),
        "unexpected duration {duration}"
    );
}

#[test]
fn unreadable_input_yields_none_not_an_error() {
    let dir = tempdir().unwrap();

    let garbage = dir.path().join("garbage.mp3");
    fs::write(&garbage, b"definitely not audio").unwrap();
    assert_eq!(probe_duration(&garbage), None);

    assert_eq!(probe_duration(dir.path().join("missing.wav")), None);
}
