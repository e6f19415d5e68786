//! Optimizer contract.
//!
//! Optimized schedules are an independent baseline: nothing in the FCFS
//! simulator calls into this module. Every optimizer receives an instance
//! and an [`Objective`] and answers with an [`OptimizedSchedule`] whose
//! [`SolveStatus`] callers must check before using the schedule.
//!
//! The search itself lives in [`crate::ga`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::models::{Instance, Schedule, NO_SOLUTION};

/// What an optimizer minimizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Minimize the latest job completion time.
    Makespan,
    /// Minimize `Σ w_j * C_j`; one weight per job.
    WeightedCompletion { weights: Vec<i64> },
}

impl Objective {
    /// Weighted-completion objective.
    pub fn weighted(weights: impl Into<Vec<i64>>) -> Self {
        Self::WeightedCompletion {
            weights: weights.into(),
        }
    }

    /// Short objective name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Makespan => "makespan",
            Self::WeightedCompletion { .. } => "weighted_completion_sum",
        }
    }

    /// Checks the objective against an instance.
    ///
    /// # Errors
    /// [`SolveError::WeightCountMismatch`] if the weight vector length is not
    /// the instance's job count.
    pub fn validate(&self, instance: &Instance) -> Result<(), SolveError> {
        match self {
            Self::Makespan => Ok(()),
            Self::WeightedCompletion { weights } if weights.len() != instance.num_jobs() => {
                Err(SolveError::WeightCountMismatch {
                    expected: instance.num_jobs(),
                    actual: weights.len(),
                })
            }
            Self::WeightedCompletion { .. } => Ok(()),
        }
    }

    /// Objective value of a complete schedule.
    ///
    /// Weighted completion pairs weights with job completions; missing
    /// entries on either side contribute nothing. The sum saturates.
    pub fn evaluate(&self, schedule: &Schedule) -> i64 {
        match self {
            Self::Makespan => schedule.makespan(),
            Self::WeightedCompletion { weights } => weighted_sum(schedule.job_completion(), weights),
        }
    }

    /// A value no feasible schedule can beat.
    ///
    /// Makespan: longest job or busiest machine. Weighted completion: every
    /// job finishing right after its own processing time, which only bounds
    /// the objective when no weight is negative.
    pub fn lower_bound(&self, instance: &Instance) -> Option<i64> {
        match self {
            Self::Makespan => Some(instance.makespan_lower_bound()),
            Self::WeightedCompletion { weights } if weights.iter().any(|&w| w < 0) => None,
            Self::WeightedCompletion { weights } => {
                let lengths: Vec<i64> = instance.jobs().iter().map(|job| job.total_duration()).collect();
                Some(weighted_sum(&lengths, weights))
            }
        }
    }
}

fn weighted_sum(values: &[i64], weights: &[i64]) -> i64 {
    values
        .iter()
        .zip(weights)
        .fold(0i64, |acc, (v, w)| acc.saturating_add(v.saturating_mul(*w)))
}

/// Solver outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Valid schedule, optimality not proven.
    Feasible,
    /// Proven to have no solution.
    Infeasible,
    /// Nothing found within the budget.
    NoSolution,
}

impl SolveStatus {
    /// Whether the accompanying schedule can be used.
    pub fn has_schedule(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }

    /// Upper-case status label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Feasible => "FEASIBLE",
            Self::Infeasible => "INFEASIBLE",
            Self::NoSolution => "UNKNOWN",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an optimizer run.
///
/// Check [`OptimizedSchedule::status`] before trusting the other fields:
/// without a solution the schedule is empty and the objective value and
/// makespan are [`NO_SOLUTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedSchedule {
    /// Solver outcome.
    pub status: SolveStatus,
    /// Name of the optimized objective.
    pub objective_name: String,
    /// Achieved objective value, or [`NO_SOLUTION`].
    pub objective_value: i64,
    /// The schedule (empty without a solution).
    pub schedule: Schedule,
}

impl OptimizedSchedule {
    /// A result carrying no schedule.
    pub fn unsolved(instance: &Instance, objective: &Objective, status: SolveStatus) -> Self {
        Self {
            status,
            objective_name: objective.name().to_string(),
            objective_value: NO_SOLUTION,
            schedule: Schedule::unsolved(instance.name()),
        }
    }

    /// A result for a complete schedule; `Optimal` when the objective value
    /// reaches the instance lower bound.
    pub fn solved(instance: &Instance, objective: &Objective, schedule: Schedule) -> Self {
        let objective_value = objective.evaluate(&schedule);
        let status = match objective.lower_bound(instance) {
            Some(bound) if objective_value <= bound => SolveStatus::Optimal,
            _ => SolveStatus::Feasible,
        };
        Self {
            status,
            objective_name: objective.name().to_string(),
            objective_value,
            schedule,
        }
    }
}

/// An optimizer for job-shop instances.
pub trait ScheduleOptimizer {
    /// Optimizer name (for logs and reports).
    fn name(&self) -> &str;

    /// Runs the optimizer. `objective` has already been validated.
    fn optimize(&self, instance: &Instance, objective: &Objective) -> OptimizedSchedule;

    /// Validates the objective, then runs the optimizer.
    ///
    /// # Errors
    /// [`SolveError::WeightCountMismatch`] before any solver work is done.
    fn solve(&self, instance: &Instance, objective: &Objective) -> Result<OptimizedSchedule, SolveError> {
        objective.validate(instance)?;
        Ok(self.optimize(instance, objective))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use std::cell::Cell;

    /// Records how often it was invoked; returns nothing.
    struct CountingOptimizer {
        calls: Cell<usize>,
    }

    impl ScheduleOptimizer for CountingOptimizer {
        fn name(&self) -> &str {
            "counting"
        }

        fn optimize(&self, instance: &Instance, objective: &Objective) -> OptimizedSchedule {
            self.calls.set(self.calls.get() + 1);
            OptimizedSchedule::unsolved(instance, objective, SolveStatus::Infeasible)
        }
    }

    #[test]
    fn test_weight_mismatch_rejected_before_solver() {
        let instance = presets::assignment_jobs();
        let optimizer = CountingOptimizer { calls: Cell::new(0) };

        for weights in [vec![1, 1, 1, 1], vec![1; 6], vec![]] {
            let len = weights.len();
            let err = optimizer
                .solve(&instance, &Objective::weighted(weights))
                .unwrap_err();
            assert_eq!(
                err,
                SolveError::WeightCountMismatch {
                    expected: 5,
                    actual: len,
                }
            );
        }
        assert_eq!(optimizer.calls.get(), 0);

        let result = optimizer
            .solve(&instance, &Objective::weighted(vec![1; 5]))
            .unwrap();
        assert_eq!(optimizer.calls.get(), 1);
        assert_eq!(result.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_unsolved_sentinels() {
        let instance = presets::three_job_example();
        let result = OptimizedSchedule::unsolved(&instance, &Objective::Makespan, SolveStatus::NoSolution);

        assert!(!result.status.has_schedule());
        assert_eq!(result.objective_name, "makespan");
        assert_eq!(result.objective_value, NO_SOLUTION);
        assert_eq!(result.schedule.makespan(), NO_SOLUTION);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_objective_evaluate_and_bounds() {
        let instance = presets::three_job_example();
        let schedule = crate::scheduler::simulate(&instance);

        assert_eq!(Objective::Makespan.evaluate(&schedule), 7);
        // Completions [6, 7, 4].
        assert_eq!(Objective::weighted(vec![2, 1, 1]).evaluate(&schedule), 23);
        assert_eq!(Objective::weighted(vec![3, 1, 2]).evaluate(&schedule), 33);

        // Machine 1 carries 2 + 1 + 4 = 7.
        assert_eq!(Objective::Makespan.lower_bound(&instance), Some(7));
        // Job lengths 5, 3, 4.
        assert_eq!(Objective::weighted(vec![2, 1, 1]).lower_bound(&instance), Some(17));
        assert_eq!(Objective::weighted(vec![2, -1, 1]).lower_bound(&instance), None);
        assert_eq!(Objective::weighted(vec![2, 1, 1]).name(), "weighted_completion_sum");
    }

    #[test]
    fn test_weighted_sum_saturates() {
        let schedule = crate::scheduler::simulate(&presets::three_job_example());
        assert_eq!(Objective::weighted(vec![i64::MAX, 1, 1]).evaluate(&schedule), i64::MAX);
        assert_eq!(Objective::weighted(vec![0, 0, 0]).evaluate(&schedule), 0);
    }

    #[test]
    fn test_solved_status_from_lower_bound() {
        let instance = presets::three_job_example();
        let schedule = crate::scheduler::simulate(&instance);

        let by_makespan = OptimizedSchedule::solved(&instance, &Objective::Makespan, schedule.clone());
        assert_eq!(by_makespan.status, SolveStatus::Optimal);
        assert_eq!(by_makespan.objective_value, 7);

        let weighted = OptimizedSchedule::solved(&instance, &Objective::weighted(vec![1, 1, 1]), schedule);
        assert_eq!(weighted.status, SolveStatus::Feasible);
        assert_eq!(weighted.objective_value, 17);
    }
}
