//! Compute device selection.
//!
//! The device is chosen once at process start from `IMGEDIT_BENCH_DEVICE`
//! (`cpu` or `accel:<index>`); everything downstream treats it as fixed.
//! Synchronization barriers live on the pipeline trait, not here, because
//! only the pipeline knows what work it has queued.

use std::fmt;

/// Environment variable consulted by [`Device::from_env`].
pub const DEVICE_ENV_VAR: &str = "IMGEDIT_BENCH_DEVICE";

/// Compute device the pipeline runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    /// Accelerator with a visible-device index.
    Accel(u32),
}

impl Device {
    /// Whether timed regions need synchronization barriers around them.
    pub fn is_accelerated(&self) -> bool {
        matches!(self, Device::Accel(_))
    }

    /// Parse a device spec: `cpu`, `accel`, or `accel:<index>`.
    pub fn parse(spec: &str) -> Option<Device> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("cpu") {
            return Some(Device::Cpu);
        }
        if spec.eq_ignore_ascii_case("accel") {
            return Some(Device::Accel(0));
        }
        let idx = spec.strip_prefix("accel:")?;
        idx.parse::<u32>().ok().map(Device::Accel)
    }

    /// Read the device selection from the environment. Unset or unparsable
    /// values fall back to CPU.
    pub fn from_env() -> Device {
        match std::env::var(DEVICE_ENV_VAR) {
            Ok(spec) => Device::parse(&spec).unwrap_or_else(|| {
                tracing::warn!(
                    "unrecognized {} value {:?}, using cpu",
                    DEVICE_ENV_VAR,
                    spec
                );
                Device::Cpu
            }),
            Err(_) => Device::Cpu,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Accel(idx) => write!(f, "accel:{}", idx),
        }
    }
}
