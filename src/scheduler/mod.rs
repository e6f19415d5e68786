//! FCFS dispatch simulation and KPI evaluation.
//!
//! # Algorithm
//!
//! `simulate` runs a discrete-event simulation: operations queue at their
//! machine in arrival order, and each machine starts the earliest arrival
//! as soon as it is free. It is not optimal, but it is a fast, fully
//! deterministic baseline against which optimized schedules are compared.
//!
//! # KPI
//!
//! `ScheduleKpi` computes standard scheduling metrics: makespan, total
//! completion time, flow time, utilization and idle time.
//!
//! # Concurrency
//!
//! Each simulation owns its state, so independent instances can be
//! simulated in parallel with `simulate_batch`.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4, 7
//! - Law (2015), "Simulation Modeling and Analysis", Ch. 1 (event scheduling)

mod fcfs;
mod kpi;
mod queue;

use rayon::prelude::*;

use crate::models::{Instance, Schedule};

pub use fcfs::simulate;
pub use kpi::ScheduleKpi;

/// Simulates many independent instances in parallel.
///
/// Results are returned in input order.
pub fn simulate_batch(instances: &[Instance]) -> Vec<Schedule> {
    instances.par_iter().map(simulate).collect()
}
