//! GA-based schedule optimization.
//!
//! Implements a job-shop encoding on top of `u-metaheur`'s generic GA
//! framework and exposes it as a [`ScheduleOptimizer`](crate::optimizer::ScheduleOptimizer).
//!
//! # Encoding
//!
//! **Operation sequence**: a permutation with repetition of job ids. The
//! k-th occurrence of job `j` is `j`'s k-th operation; decoding appends each
//! operation as early as its job and machine allow.
//!
//! # Reference
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

mod chromosome;
mod problem;

pub use chromosome::{insert_mutation, pox_crossover, swap_mutation, OperationSequence};
pub use problem::{GaOptimizer, JobShopGaProblem, DEFAULT_TIME_LIMIT_MS};
