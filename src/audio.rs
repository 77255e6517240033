use std::{fs::File, path::Path};

use symphonia::core::{
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use symphonia::default::get_probe;
use tracing::debug;

/// Duration of an audio file in seconds, or `None` when it cannot be
/// determined. Never fails: an unreadable or unrecognized file is simply
/// a file with unknown duration.
pub fn probe_duration<P: AsRef<Path>>(path: P) -> Option<f64> {
    let path: &Path = path.as_ref();

    let file: File = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("duration probe could not open {:?}: {}", path, e);
            return None;
        }
    };

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .ok()?;

    let format = probed.format;
    let track = format.default_track()?;
    let params = &track.codec_params;

    let time_base = params.time_base?;
    let n_frames = params.n_frames?;
    let time = time_base.calc_time(n_frames);
    Some(time.seconds as f64 + time.frac)
}
