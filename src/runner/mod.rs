//! Sweep execution.
//!
//! The measurement executable is treated as an opaque oracle behind the
//! [`Measure`] trait: one invocation per (point, repetition), strictly
//! sequential so the device under test is never contended, with a small
//! pacing delay between launches. Successful raw lines go to the record
//! store as they arrive; failed runs are logged and collected, never fatal
//! to the sweep.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SweepError};
use crate::store::RecordStore;
use crate::sweep::{ParameterPoint, Sweep, SweepVariant};

/// Pacing delay inserted before every invocation, letting the previous
/// run's teardown settle before the next launch.
pub const DEFAULT_PACING: Duration = Duration::from_millis(10);

/// Failure modes of a single measurement invocation.
///
/// Neither case is inspected further: a run either produced a usable line
/// or it did not.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// The process could not be started
    #[error("failed to start process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The process ran but reported failure
    #[error("process exited with {0}")]
    NonZeroExit(std::process::ExitStatus),
}

/// The opaque measurement oracle.
///
/// One call performs one invocation and returns the trimmed single-line
/// stdout on success. The runner never parses the line; it is recorded
/// verbatim.
pub trait Measure {
    fn measure(&self, point: &ParameterPoint)
        -> std::result::Result<String, InvocationError>;
}

/// [`Measure`] implementation that spawns an external executable with the
/// point's fields rendered as positional arguments.
#[derive(Debug)]
pub struct ProcessMeasure {
    executable: PathBuf,
}

impl ProcessMeasure {
    /// The executable must already exist on disk. A missing path is a
    /// configuration error raised here, before any store I/O, not a
    /// per-run failure.
    pub fn new<P: AsRef<Path>>(executable: P) -> Result<Self> {
        let executable = executable.as_ref().to_path_buf();
        if !executable.is_file() {
            return Err(SweepError::ExecutableNotFound(executable));
        }
        Ok(Self { executable })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Measure for ProcessMeasure {
    fn measure(
        &self,
        point: &ParameterPoint,
    ) -> std::result::Result<String, InvocationError> {
        // No timeout: a hung measurement process blocks the sweep.
        let output = Command::new(&self.executable).args(point.args()).output()?;
        if !output.status.success() {
            return Err(InvocationError::NonZeroExit(output.status));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// One failed invocation, with enough context to diagnose it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    pub point: ParameterPoint,
    /// 1-based repetition index within the point
    pub repetition: u32,
    pub error: String,
}

/// Summary of a completed sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Invocations attempted (points x repetitions)
    pub attempted: usize,
    /// Invocations that produced a recorded line
    pub succeeded: usize,
    pub failures: Vec<RunFailure>,
}

impl SweepReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Drives a sweep against a measurement oracle.
pub struct SweepRunner<M: Measure> {
    measure: M,
    pacing: Duration,
}

impl<M: Measure> SweepRunner<M> {
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Walk the sweep in order, appending each successful raw line to the
    /// store immediately.
    ///
    /// A failed invocation is recorded and skipped; only store I/O errors
    /// abort the sweep.
    pub fn run(&self, sweep: &Sweep, store: &mut RecordStore) -> Result<SweepReport> {
        let started_at = Local::now();
        let mut failures = Vec::new();
        let mut attempted = 0usize;
        let mut succeeded = 0usize;

        for point in sweep.points() {
            log::info!("sweeping point {}", point);
            for repetition in 1..=sweep.repetitions() {
                attempted += 1;
                thread::sleep(self.pacing);
                match self.measure.measure(point) {
                    Ok(line) => {
                        log::info!("run {}: {}", repetition, line);
                        store.append(&line)?;
                        succeeded += 1;
                    }
                    Err(err) => {
                        log::warn!("run {} of point {} failed: {}", repetition, point, err);
                        failures.push(RunFailure {
                            point: point.clone(),
                            repetition,
                            error: err.to_string(),
                        });
                    }
                }
            }
        }

        Ok(SweepReport {
            started_at,
            finished_at: Local::now(),
            attempted,
            succeeded,
            failures,
        })
    }
}

/// Run a full sweep against an external executable, creating a fresh store
/// with the variant's header.
///
/// The executable is validated first: a missing path fails fatally and
/// leaves no store file at all.
pub fn run_sweep<P: AsRef<Path>, Q: AsRef<Path>>(
    executable: P,
    sweep: &Sweep,
    variant: SweepVariant,
    store_path: Q,
    pacing: Duration,
) -> Result<SweepReport> {
    let measure = ProcessMeasure::new(executable)?;
    let mut store = RecordStore::create(store_path, variant.header())?;
    SweepRunner::new(measure).with_pacing(pacing).run(sweep, &mut store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::read_series;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Scripted oracle: succeeds with a canned line unless the point's size
    /// is on the failure list.
    struct ScriptedMeasure {
        fail_sizes: Vec<u64>,
        calls: RefCell<Vec<u64>>,
    }

    impl ScriptedMeasure {
        fn new(fail_sizes: Vec<u64>) -> Self {
            Self {
                fail_sizes,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Measure for ScriptedMeasure {
        fn measure(
            &self,
            point: &ParameterPoint,
        ) -> std::result::Result<String, InvocationError> {
            let size = point.size();
            self.calls.borrow_mut().push(size);
            if self.fail_sizes.contains(&size) {
                return Err(InvocationError::Spawn(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "scripted failure",
                )));
            }
            Ok(format!("{},0,0,0,12.5", size))
        }
    }

    fn scenario_sweep() -> Sweep {
        let range = crate::sweep::SizeRange::new(8, 56, 16).unwrap();
        Sweep::from_range(SweepVariant::LinearCopy, range, 0, 2).unwrap()
    }

    #[test]
    fn test_failure_free_sweep_records_all_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let sweep = scenario_sweep();
        let mut store =
            RecordStore::create(&path, SweepVariant::LinearCopy.header()).unwrap();

        let runner = SweepRunner::new(ScriptedMeasure::new(vec![]))
            .with_pacing(Duration::ZERO);
        let report = runner.run(&sweep, &mut store).unwrap();
        drop(store);

        assert_eq!(report.attempted, 6);
        assert_eq!(report.succeeded, 6);
        assert!(report.failures.is_empty());

        // 1 header + L x R data lines
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 7);

        let series = read_series(&path, 0, 4).unwrap();
        assert_eq!(series.x, vec![8, 8, 24, 24, 40, 40]);
        assert_eq!(series.y, vec![12.5; 6]);
    }

    #[test]
    fn test_failed_point_never_stops_the_sweep() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let sweep = scenario_sweep();
        let mut store =
            RecordStore::create(&path, SweepVariant::LinearCopy.header()).unwrap();

        let measure = ScriptedMeasure::new(vec![24]);
        let runner = SweepRunner::new(measure).with_pacing(Duration::ZERO);
        let report = runner.run(&sweep, &mut store).unwrap();
        drop(store);

        assert_eq!(report.attempted, 6);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.failures[0].point.size(), 24);
        assert_eq!(report.failures[0].repetition, 1);
        assert_eq!(report.failures[1].repetition, 2);

        // Both repetitions of the failing size are simply absent.
        let series = read_series(&path, 0, 4).unwrap();
        assert_eq!(series.x, vec![8, 8, 40, 40]);
    }

    #[test]
    fn test_every_repetition_is_attempted_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let sweep = scenario_sweep();
        let mut store =
            RecordStore::create(&path, SweepVariant::LinearCopy.header()).unwrap();

        let measure = ScriptedMeasure::new(vec![8, 24, 40]);
        let runner = SweepRunner::new(measure).with_pacing(Duration::ZERO);
        let report = runner.run(&sweep, &mut store).unwrap();

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed(), 6);
        assert_eq!(
            *runner.measure.calls.borrow(),
            vec![8, 8, 24, 24, 40, 40]
        );
    }

    #[test]
    fn test_empty_sweep_records_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let sweep = Sweep::from_sizes(SweepVariant::Size, &[], 0, 4).unwrap();
        let mut store = RecordStore::create(&path, SweepVariant::Size.header()).unwrap();

        let runner = SweepRunner::new(ScriptedMeasure::new(vec![]))
            .with_pacing(Duration::ZERO);
        let report = runner.run(&sweep, &mut store).unwrap();
        drop(store);

        assert_eq!(report.attempted, 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_missing_executable_creates_no_store() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("GpuCopy.exe");
        let path = dir.path().join("results.csv");
        let sweep = scenario_sweep();

        let err = run_sweep(&exe, &sweep, SweepVariant::LinearCopy, &path, Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, SweepError::ExecutableNotFound(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_process_measure_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = ProcessMeasure::new(dir.path()).unwrap_err();
        assert!(matches!(err, SweepError::ExecutableNotFound(_)));
    }
}
