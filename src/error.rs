//! Error types.
//!
//! The simulator itself is infallible for a well-formed instance; every
//! failure is caught either when the instance is built, before an optimizer
//! is invoked, or when results are written out.

use thiserror::Error;

/// Rejected job-shop instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// An operation has a zero or negative duration.
    #[error("job {job_id} operation {op_index}: duration must be positive, got {duration}")]
    NonPositiveDuration {
        job_id: usize,
        op_index: usize,
        duration: i64,
    },
    /// An operation references a negative machine id.
    #[error("job {job_id} operation {op_index}: machine id must be non-negative, got {machine_id}")]
    NegativeMachine {
        job_id: usize,
        op_index: usize,
        machine_id: i64,
    },
    /// The sum of all durations does not fit in `i64`, so schedule times could overflow.
    #[error("job {job_id} operation {op_index}: total processing time exceeds i64::MAX")]
    HorizonOverflow { job_id: usize, op_index: usize },
    /// A generator was configured with an empty or inverted range.
    #[error("invalid generator setting `{field}`: {reason}")]
    InvalidGenerator {
        field: &'static str,
        reason: String,
    },
}

/// Misuse of the optimizer contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Weighted objective with a weight vector that does not match the job count.
    #[error("weights length must equal number of jobs (expected {expected}, got {actual})")]
    WeightCountMismatch { expected: usize, actual: usize },
    /// The search settings were rejected.
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),
}

/// Failure while writing tables or charts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart rendering failed: {0}")]
    Chart(String),
}

/// Failure of a scenario batch.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
