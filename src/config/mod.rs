//! TOML sweep presets.
//!
//! A preset captures a whole run (executable, grid, repetitions, pacing,
//! store path) so a sweep can be re-run from a file instead of a long
//! command line.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};
use crate::sweep::{SizeRange, Sweep, SweepVariant};

/// Sweep preset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Path to the measurement executable
    pub executable: PathBuf,
    /// Argument shape and store column convention
    pub variant: SweepVariant,
    /// First transfer size in the sweep (MB)
    pub start: u64,
    /// Sweep upper bound, exclusive (MB)
    pub stop: u64,
    /// Stride between sizes (MB)
    pub step: u64,
    /// Explicit size list; takes precedence over start/stop/step when set
    pub sizes: Option<Vec<u64>>,
    /// Mode flag forwarded to the executable
    pub mode: u64,
    /// Repetitions per size
    pub repetitions: u32,
    /// Pacing delay before each invocation, in milliseconds
    pub delay_ms: u64,
    /// Record store path
    pub store: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::new(),
            variant: SweepVariant::LinearCopy,
            start: 8,
            stop: 1024,
            step: 128,
            sizes: None,
            mode: 0,
            repetitions: 8,
            delay_ms: 10,
            store: PathBuf::from("bandwidth_results.csv"),
        }
    }
}

impl SweepConfig {
    /// Load from TOML file
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SweepError::Configuration(format!("cannot read {}: {}", path, e)))?;
        Self::from_toml(&content)
    }

    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SweepError::Configuration(format!("TOML parse error: {}", e)))
    }

    /// Generate sample config
    pub fn sample_toml() -> String {
        r#"# csweep sweep preset
executable = "./GpuCopy"
variant = "linear-copy"

# Transfer sizes in MB: start..stop (exclusive) with the given stride,
# or an explicit list via `sizes = [8, 24, 40]`.
start = 8
stop = 1024
step = 128

mode = 0
repetitions = 8
delay_ms = 10
store = "bandwidth_results.csv"
"#
        .to_string()
    }

    /// Build the sweep this preset describes. An explicit size list wins
    /// over the range rule.
    pub fn build_sweep(&self) -> Result<Sweep> {
        match &self.sizes {
            Some(sizes) => {
                if sizes.is_empty() {
                    return Err(SweepError::Configuration(
                        "explicit size list is empty".to_string(),
                    ));
                }
                Sweep::from_sizes(self.variant, sizes, self.mode, self.repetitions)
            }
            None => {
                let range = SizeRange::new(self.start, self.stop, self.step)?;
                Sweep::from_range(self.variant, range, self.mode, self.repetitions)
            }
        }
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
