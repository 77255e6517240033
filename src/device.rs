//! Inference device selection.
//!
//! Probes in fixed priority order: CUDA GPU, then Apple-silicon unified
//! memory, then CPU. A pure query: no side effects beyond the probe
//! itself and no failure path.

use std::env;
use std::process::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Cuda,
    Mps,
    Cpu,
}

impl Device {
    /// The value passed to the separator's `--device` flag.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Mps => "mps",
            Device::Cpu => "cpu",
        }
    }

    fn parse(s: &str) -> Option<Device> {
        match s {
            "cuda" => Some(Device::Cuda),
            "mps" => Some(Device::Mps),
            "cpu" => Some(Device::Cpu),
            _ => None,
        }
    }

    /// Pick the inference device for this invocation. An explicit
    /// `STEM_EXTRACTOR_DEVICE` override wins when it parses.
    pub fn detect() -> Device {
        if let Some(dev) = env::var("STEM_EXTRACTOR_DEVICE")
            .ok()
            .as_deref()
            .and_then(Device::parse)
        {
            return dev;
        }
        if cuda_available() {
            Device::Cuda
        } else if mps_available() {
            Device::Mps
        } else {
            Device::Cpu
        }
    }
}

fn cuda_available() -> bool {
    Command::new("nvidia-smi")
        .arg("-L")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn mps_available() -> bool {
    cfg!(all(target_os = "macos", target_arch = "aarch64"))
}
