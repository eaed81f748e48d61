//! GPU copy-bandwidth sweep driver
//!
//! Drives an external memory-copy benchmark executable across a sweep of
//! transfer sizes, repeats each configuration to average out noise, records
//! every successful measurement as one delimited line, and renders the
//! recorded series as a bandwidth-vs-size curve.
//!
//! Two components, composed only through the on-disk record store:
//!
//! - [`runner`] enumerates the parameter grid and invokes the executable
//!   once per (point, repetition), strictly in order, appending raw output
//!   lines to the store as they arrive. A failed run is logged and skipped,
//!   never fatal.
//! - [`plot`] reads a store back, extracts two columns as a series, and
//!   draws the bandwidth curve.
//!
//! Because the components never share state in-process, historical stores
//! can be re-plotted without re-running the sweep, and an interrupted sweep
//! leaves a valid, plottable prefix.

pub mod config;
pub mod error;
pub mod plot;
pub mod runner;
pub mod store;
pub mod sweep;

pub use config::SweepConfig;
pub use error::{Result, SweepError};
pub use plot::{plot_series, render, PlotConfig};
pub use runner::{
    run_sweep, InvocationError, Measure, ProcessMeasure, RunFailure, SweepReport, SweepRunner,
};
pub use store::{read_records, read_series, RecordStore, Series};
pub use sweep::{ParameterPoint, SizeRange, Sweep, SweepVariant};
