//! First-come-first-served dispatch simulation for job shops.
//!
//! A job shop has jobs, each an ordered route of operations, and machines
//! that process one operation at a time. This crate simulates FCFS
//! dispatching, compares it against optimized schedules and exports the
//! results.
//!
//! # Modules
//!
//! - **`models`**: `Instance`, `Job`, `Operation`, `Schedule`, `ScheduledOp`
//! - **`scheduler`**: the FCFS discrete-event simulator and schedule KPIs
//! - **`optimizer`**: objectives and the optimizer contract
//! - **`ga`**: a `u-metaheur` genetic-algorithm optimizer
//! - **`validation`**: feasibility checks for produced schedules
//! - **`presets`** / **`generator`**: built-in and random instances
//! - **`report`** / **`runner`**: tables, Gantt charts and scenario batches
//!
//! # Example
//!
//! ```
//! use jobshop_fcfs::models::Instance;
//! use jobshop_fcfs::scheduler::simulate;
//!
//! let instance = Instance::new("demo", vec![
//!     vec![(0, 3), (1, 2)],
//!     vec![(0, 2), (1, 1)],
//!     vec![(1, 4)],
//! ]).unwrap();
//!
//! let schedule = simulate(&instance);
//! assert_eq!(schedule.makespan(), 7);
//! assert_eq!(schedule.job_completion(), &[6, 7, 4]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod error;
pub mod ga;
pub mod generator;
pub mod models;
pub mod optimizer;
pub mod presets;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod validation;
