//! Feasibility checks for schedules.
//!
//! Verifies that a schedule is a valid solution of its instance. Detects:
//! - Missing, duplicated or unknown operations
//! - Operations placed on the wrong machine or with the wrong duration
//! - Overlapping operations on a shared machine
//! - Operations of a job starting before their predecessor ends
//! - Inconsistent job completion times or makespan
//!
//! Every check runs; all detected problems are returned together.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2.3

use std::collections::HashMap;

use crate::models::{Instance, Schedule, ScheduledOp};

/// Validation result.
pub type ValidationResult = Result<(), Vec<Violation>>;

/// A feasibility violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of feasibility violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// An instance operation has no placement.
    MissingOperation,
    /// An operation is placed more than once.
    DuplicateOperation,
    /// A placement refers to an operation the instance does not have.
    UnknownOperation,
    /// Placed on a machine other than the one the operation requires.
    MachineMismatch,
    /// `end - start` or the recorded duration differs from the instance.
    DurationMismatch,
    /// Starts before time zero.
    NegativeStart,
    /// Two operations overlap on the same machine.
    MachineOverlap,
    /// An operation starts before its job predecessor ends.
    PrecedenceViolation,
    /// A job's completion time differs from its last operation's end.
    CompletionMismatch,
    /// Makespan differs from the latest operation end.
    MakespanMismatch,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a schedule against its instance.
///
/// # Returns
/// `Ok(())` if the schedule is feasible and internally consistent,
/// `Err(violations)` with every detected problem otherwise.
pub fn validate_schedule(instance: &Instance, schedule: &Schedule) -> ValidationResult {
    let mut errors = Vec::new();
    let mut placed: HashMap<(usize, usize), &ScheduledOp> = HashMap::new();

    for op in schedule.ops() {
        let key = (op.job_id, op.op_index);
        let Some(expected) = instance.operation(op.job_id, op.op_index) else {
            errors.push(Violation::new(
                ViolationKind::UnknownOperation,
                format!("J{}-{} is not part of instance '{}'", op.job_id, op.op_index, instance.name()),
            ));
            continue;
        };
        if placed.insert(key, op).is_some() {
            errors.push(Violation::new(
                ViolationKind::DuplicateOperation,
                format!("J{}-{} is scheduled more than once", op.job_id, op.op_index),
            ));
        }
        if op.machine_id != expected.machine_id {
            errors.push(Violation::new(
                ViolationKind::MachineMismatch,
                format!(
                    "J{}-{} runs on M{} but requires M{}",
                    op.job_id, op.op_index, op.machine_id, expected.machine_id
                ),
            ));
        }
        if op.duration != expected.duration || op.end - op.start != expected.duration {
            errors.push(Violation::new(
                ViolationKind::DurationMismatch,
                format!(
                    "J{}-{} occupies [{}, {}) but needs {}",
                    op.job_id, op.op_index, op.start, op.end, expected.duration
                ),
            ));
        }
        if op.start < 0 {
            errors.push(Violation::new(
                ViolationKind::NegativeStart,
                format!("J{}-{} starts at {}", op.job_id, op.op_index, op.start),
            ));
        }
    }

    for expected in instance.operations() {
        if !placed.contains_key(&(expected.job_id, expected.op_index)) {
            errors.push(Violation::new(
                ViolationKind::MissingOperation,
                format!("J{}-{} is not scheduled", expected.job_id, expected.op_index),
            ));
        }
    }

    check_machine_overlap(schedule, &mut errors);
    check_job_order(instance, &placed, &mut errors);
    check_completion(instance, schedule, &placed, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Adjacent operations on each machine, sorted by start, must not overlap.
fn check_machine_overlap(schedule: &Schedule, errors: &mut Vec<Violation>) {
    for (machine_id, ops) in schedule.by_machine() {
        for pair in ops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.overlaps(b) {
                errors.push(Violation::new(
                    ViolationKind::MachineOverlap,
                    format!(
                        "M{machine_id}: J{}-{} [{}, {}) overlaps J{}-{} [{}, {})",
                        a.job_id, a.op_index, a.start, a.end, b.job_id, b.op_index, b.start, b.end
                    ),
                ));
            }
        }
    }
}

fn check_job_order(
    instance: &Instance,
    placed: &HashMap<(usize, usize), &ScheduledOp>,
    errors: &mut Vec<Violation>,
) {
    for job in instance.jobs() {
        for k in 1..job.len() {
            let (Some(prev), Some(next)) = (placed.get(&(job.id(), k - 1)), placed.get(&(job.id(), k)))
            else {
                continue;
            };
            if next.start < prev.end {
                errors.push(Violation::new(
                    ViolationKind::PrecedenceViolation,
                    format!(
                        "J{}-{} starts at {} before J{}-{} ends at {}",
                        job.id(),
                        k,
                        next.start,
                        job.id(),
                        k - 1,
                        prev.end
                    ),
                ));
            }
        }
    }
}

fn check_completion(
    instance: &Instance,
    schedule: &Schedule,
    placed: &HashMap<(usize, usize), &ScheduledOp>,
    errors: &mut Vec<Violation>,
) {
    if schedule.job_completion().len() != instance.num_jobs() {
        errors.push(Violation::new(
            ViolationKind::CompletionMismatch,
            format!(
                "{} completion times for {} jobs",
                schedule.job_completion().len(),
                instance.num_jobs()
            ),
        ));
    } else {
        for job in instance.jobs() {
            let expected = match job.last() {
                Some(last) => match placed.get(&(job.id(), last.op_index)) {
                    Some(op) => op.end,
                    None => continue,
                },
                None => 0,
            };
            let actual = schedule.job_completion()[job.id()];
            if actual != expected {
                errors.push(Violation::new(
                    ViolationKind::CompletionMismatch,
                    format!("J{} completes at {actual}, last operation ends at {expected}", job.id()),
                ));
            }
        }
    }

    if schedule.makespan() != schedule.max_end() {
        errors.push(Violation::new(
            ViolationKind::MakespanMismatch,
            format!(
                "makespan {} differs from latest end {}",
                schedule.makespan(),
                schedule.max_end()
            ),
        ));
    }
}
