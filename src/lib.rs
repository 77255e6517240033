//! # stem-extractor
//!
//! Subprocess bridge for a host desktop application: turns a remote video
//! URL or a local audio file into an instrumental and an acapella stem by
//! orchestrating an external downloader and the Demucs model runner,
//! streaming newline-delimited JSON progress and a single result line
//! over standard output.

pub mod audio;
pub mod device;
pub mod download;
pub mod error;
pub mod library;
pub mod paths;
pub mod pipeline;
pub mod placement;
pub mod report;
pub mod separator;
pub mod tools;
pub mod types;

pub use crate::{
    device::Device,
    download::sanitize_title,
    error::{ExtractError, Result},
    report::{ExtractResult, ProgressUpdate, Reporter},
    tools::{CancelToken, Toolchain},
    types::{ExtractOptions, Job, JobMode},
};
