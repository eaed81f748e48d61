//! Sweep definition: parameter points, argument-shape variants, and grids.
//!
//! A sweep is built up front from a start/stop/step rule or an explicit size
//! list and is immutable once execution begins. The [`SweepVariant`] names
//! the pairing between the executable's argument shape and the record
//! store's column layout, so the runner and the plotter agree on field
//! positions explicitly rather than by magic index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// One benchmark configuration: an ordered tuple of non-negative integers,
/// rendered as positional string arguments in field order.
///
/// Fields are not validated beyond what the measured executable itself
/// rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterPoint {
    fields: Vec<u64>,
}

impl ParameterPoint {
    pub fn new(fields: Vec<u64>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[u64] {
        &self.fields
    }

    /// Positional arguments for the measurement executable, in field order.
    pub fn args(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.to_string()).collect()
    }

    /// The leading field, which is the transfer size in both known variants.
    pub fn size(&self) -> u64 {
        self.fields.first().copied().unwrap_or(0)
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.fields.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", rendered.join(" "))
    }
}

/// Argument shape and store column convention for one executable flavor.
///
/// The two variants match the two conventions the GpuCopy benchmark family
/// uses: a single-size invocation that reports `size,bandwidth`, and the
/// LinearCopy invocation that takes four sizes plus a mode flag and reports
/// the bandwidth in the fifth column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SweepVariant {
    /// One positional size argument; output convention `size,bandwidth`
    Size,
    /// Four size arguments plus a mode flag; bandwidth in column 4
    LinearCopy,
}

impl SweepVariant {
    /// Header line written when a fresh store is created.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Size => "size_mb,bandwidth_gbs",
            Self::LinearCopy => "size_mb,copy_x,copy_y,copy_z,bandwidth_gbs",
        }
    }

    /// Build the parameter point for one transfer size.
    ///
    /// `mode` is only forwarded by the `LinearCopy` shape; the single-size
    /// shape ignores it.
    pub fn point(&self, size: u64, mode: u64) -> ParameterPoint {
        match self {
            Self::Size => ParameterPoint::new(vec![size]),
            Self::LinearCopy => ParameterPoint::new(vec![size, size, size, size, mode]),
        }
    }

    /// Store column holding the transfer size.
    pub fn size_field(&self) -> usize {
        0
    }

    /// Store column holding the measured bandwidth.
    pub fn bandwidth_field(&self) -> usize {
        match self {
            Self::Size => 1,
            Self::LinearCopy => 4,
        }
    }
}

impl fmt::Display for SweepVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size => write!(f, "size"),
            Self::LinearCopy => write!(f, "linear-copy"),
        }
    }
}

/// Start/stop/step size rule. `stop` is exclusive, matching the half-open
/// ranges the benchmark scripts sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub start: u64,
    pub stop: u64,
    pub step: u64,
}

impl SizeRange {
    pub fn new(start: u64, stop: u64, step: u64) -> Result<Self> {
        if step == 0 {
            return Err(SweepError::Configuration(
                "size step must be at least 1".to_string(),
            ));
        }
        Ok(Self { start, stop, step })
    }

    /// Enumerate the sizes in sweep order.
    pub fn sizes(&self) -> Vec<u64> {
        (self.start..self.stop).step_by(self.step as usize).collect()
    }
}

/// A finite, ordered sequence of parameter points plus a repetition count.
///
/// Immutable once built; the runner walks it strictly in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sweep {
    points: Vec<ParameterPoint>,
    repetitions: u32,
}

impl Sweep {
    pub fn new(points: Vec<ParameterPoint>, repetitions: u32) -> Result<Self> {
        if repetitions == 0 {
            return Err(SweepError::Configuration(
                "repetitions must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            points,
            repetitions,
        })
    }

    /// Build a sweep from a size range, one point per size.
    pub fn from_range(
        variant: SweepVariant,
        range: SizeRange,
        mode: u64,
        repetitions: u32,
    ) -> Result<Self> {
        let points = range
            .sizes()
            .into_iter()
            .map(|size| variant.point(size, mode))
            .collect();
        Self::new(points, repetitions)
    }

    /// Build a sweep from an explicit size list, in the given order.
    pub fn from_sizes(
        variant: SweepVariant,
        sizes: &[u64],
        mode: u64,
        repetitions: u32,
    ) -> Result<Self> {
        let points = sizes.iter().map(|&size| variant.point(size, mode)).collect();
        Self::new(points, repetitions)
    }

    pub fn points(&self) -> &[ParameterPoint] {
        &self.points
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total invocations the sweep will attempt.
    pub fn total_runs(&self) -> usize {
        self.points.len() * self.repetitions as usize
    }
}
