//! Random job-shop instance generation.
//!
//! Produces Taillard-style instances: each job visits a random sequence of
//! machines with uniformly drawn processing times. Without recirculation a
//! job visits each machine at most once; with recirculation machines are
//! drawn independently per operation and may repeat.
//!
//! Generation is reproducible for a seeded RNG.
//!
//! # Reference
//! Taillard (1993), "Benchmarks for basic scheduling problems"

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::InstanceError;
use crate::models::Instance;

/// Random instance generator settings.
///
/// # Example
/// ```
/// use jobshop_fcfs::generator::InstanceGenerator;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let instance = InstanceGenerator::new(4, 3)
///     .with_durations(1, 9)
///     .generate("random", &mut rng)
///     .unwrap();
/// assert_eq!(instance.num_jobs(), 4);
/// assert_eq!(instance.num_operations(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceGenerator {
    /// Number of jobs.
    pub num_jobs: usize,
    /// Number of machines available to draw from.
    pub num_machines: usize,
    /// Minimum operations per job (inclusive).
    pub min_ops: usize,
    /// Maximum operations per job (inclusive).
    pub max_ops: usize,
    /// Minimum processing time (inclusive, ≥ 1).
    pub min_duration: i64,
    /// Maximum processing time (inclusive).
    pub max_duration: i64,
    /// Whether a job may visit the same machine more than once.
    pub recirculation: bool,
}

impl InstanceGenerator {
    /// Classic job shop: every job visits every machine exactly once,
    /// durations in `1..=10`.
    pub fn new(num_jobs: usize, num_machines: usize) -> Self {
        Self {
            num_jobs,
            num_machines,
            min_ops: num_machines,
            max_ops: num_machines,
            min_duration: 1,
            max_duration: 10,
            recirculation: false,
        }
    }

    /// Sets the per-job operation count range.
    pub fn with_ops_per_job(mut self, min_ops: usize, max_ops: usize) -> Self {
        self.min_ops = min_ops;
        self.max_ops = max_ops;
        self
    }

    /// Sets the processing time range.
    pub fn with_durations(mut self, min_duration: i64, max_duration: i64) -> Self {
        self.min_duration = min_duration;
        self.max_duration = max_duration;
        self
    }

    /// Allows or forbids repeated machines within a job.
    pub fn with_recirculation(mut self, recirculation: bool) -> Self {
        self.recirculation = recirculation;
        self
    }

    /// Checks that the ranges are non-empty and satisfiable.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let invalid = |field: &'static str, reason: String| {
            Err(InstanceError::InvalidGenerator { field, reason })
        };

        if self.min_ops > self.max_ops {
            return invalid("min_ops", format!("{} exceeds max_ops {}", self.min_ops, self.max_ops));
        }
        if self.max_ops > 0 && self.num_machines == 0 {
            return invalid("num_machines", "operations need at least one machine".to_string());
        }
        if !self.recirculation && self.max_ops > self.num_machines {
            return invalid(
                "max_ops",
                format!(
                    "{} operations per job cannot visit {} machines once each",
                    self.max_ops, self.num_machines
                ),
            );
        }
        if self.min_duration < 1 {
            return invalid("min_duration", format!("must be at least 1, got {}", self.min_duration));
        }
        if self.min_duration > self.max_duration {
            return invalid(
                "min_duration",
                format!("{} exceeds max_duration {}", self.min_duration, self.max_duration),
            );
        }
        Ok(())
    }

    /// Draws one instance.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        name: impl Into<String>,
        rng: &mut R,
    ) -> Result<Instance, InstanceError> {
        self.validate()?;

        let mut builder = Instance::builder(name);
        let mut machines: Vec<usize> = (0..self.num_machines).collect();

        for _ in 0..self.num_jobs {
            let ops = rng.random_range(self.min_ops..=self.max_ops);
            let route: Vec<usize> = if self.recirculation {
                (0..ops).map(|_| rng.random_range(0..self.num_machines)).collect()
            } else {
                machines.shuffle(rng);
                machines[..ops].to_vec()
            };

            builder = builder.job(
                route
                    .into_iter()
                    .map(|m| (m as i64, rng.random_range(self.min_duration..=self.max_duration)))
                    .collect::<Vec<_>>(),
            );
        }

        builder.build()
    }

    /// Draws `count` instances named `{prefix}_{i}`.
    pub fn generate_many<R: Rng + ?Sized>(
        &self,
        prefix: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Instance>, InstanceError> {
        (0..count)
            .map(|i| self.generate(format!("{prefix}_{i}"), rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_classic_shape() {
        let mut rng = SmallRng::seed_from_u64(5);
        let instance = InstanceGenerator::new(6, 4).generate("classic", &mut rng).unwrap();

        assert_eq!(instance.num_jobs(), 6);
        assert_eq!(instance.num_operations(), 24);
        for job in instance.jobs() {
            let visited: HashSet<usize> = job.operations().iter().map(|op| op.machine_id).collect();
            assert_eq!(visited.len(), 4);
            assert!(job.operations().iter().all(|op| (1..=10).contains(&op.duration)));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generator = InstanceGenerator::new(5, 3).with_ops_per_job(0, 3);
        let a = generator
            .generate_many("r", 4, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        let b = generator
            .generate_many("r", 4, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a[3].name(), "r_3");
    }

    #[test]
    fn test_recirculation_ranges() {
        let mut rng = SmallRng::seed_from_u64(21);
        let generator = InstanceGenerator::new(20, 2)
            .with_ops_per_job(2, 6)
            .with_durations(3, 4)
            .with_recirculation(true);
        let instance = generator.generate("recirc", &mut rng).unwrap();

        for job in instance.jobs() {
            assert!((2..=6).contains(&job.len()));
            for op in job.operations() {
                assert!(op.machine_id < 2);
                assert!((3..=4).contains(&op.duration));
            }
        }
    }

    #[test]
    fn test_invalid_settings() {
        let mut rng = SmallRng::seed_from_u64(0);

        let err = InstanceGenerator::new(2, 2)
            .with_ops_per_job(3, 3)
            .generate("x", &mut rng)
            .unwrap_err();
        assert!(matches!(err, InstanceError::InvalidGenerator { field: "max_ops", .. }));

        let err = InstanceGenerator::new(2, 2)
            .with_durations(0, 5)
            .generate("x", &mut rng)
            .unwrap_err();
        assert!(matches!(err, InstanceError::InvalidGenerator { field: "min_duration", .. }));

        let err = InstanceGenerator::new(2, 2)
            .with_ops_per_job(2, 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, InstanceError::InvalidGenerator { field: "min_ops", .. }));

        let err = InstanceGenerator::new(2, 0)
            .with_ops_per_job(0, 1)
            .with_recirculation(true)
            .validate()
            .unwrap_err();
        assert!(matches!(err, InstanceError::InvalidGenerator { field: "num_machines", .. }));
    }
}
