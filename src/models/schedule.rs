//! Schedule (solution) model.
//!
//! A schedule fixes a start and end time for every operation of an
//! instance. Records are write-once: they are produced by the simulator or
//! an optimizer and only read afterwards.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel used for objective and makespan when no schedule was found.
pub const NO_SOLUTION: i64 = -1;

/// One operation placed on its machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledOp {
    /// Owning job.
    pub job_id: usize,
    /// Position within the job.
    pub op_index: usize,
    /// Machine the operation ran on.
    pub machine_id: usize,
    /// Start time.
    pub start: i64,
    /// End time (`start + duration`).
    pub end: i64,
    /// Processing time.
    pub duration: i64,
}

impl ScheduledOp {
    /// Whether two operations share any instant of time.
    #[inline]
    pub fn overlaps(&self, other: &ScheduledOp) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A complete schedule for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    instance_name: String,
    ops: Vec<ScheduledOp>,
    job_completion: Vec<i64>,
    makespan: i64,
}

impl Schedule {
    /// Assembles a schedule.
    ///
    /// Operations are sorted by `(start, machine_id, job_id, op_index)`.
    pub(crate) fn from_parts(
        instance_name: impl Into<String>,
        mut ops: Vec<ScheduledOp>,
        job_completion: Vec<i64>,
        makespan: i64,
    ) -> Self {
        ops.sort_by_key(|op| (op.start, op.machine_id, op.job_id, op.op_index));
        Self {
            instance_name: instance_name.into(),
            ops,
            job_completion,
            makespan,
        }
    }

    /// Placeholder returned when an optimizer produced nothing usable.
    pub(crate) fn unsolved(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            ops: Vec::new(),
            job_completion: Vec::new(),
            makespan: NO_SOLUTION,
        }
    }

    /// Name of the scheduled instance.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Operations sorted by `(start, machine_id, job_id, op_index)`.
    pub fn ops(&self) -> &[ScheduledOp] {
        &self.ops
    }

    /// Completion time per job (0 for a job without operations).
    pub fn job_completion(&self) -> &[i64] {
        &self.job_completion
    }

    /// Completion time of a single job.
    pub fn completion_of(&self, job_id: usize) -> Option<i64> {
        self.job_completion.get(job_id).copied()
    }

    /// Time at which the last operation finishes.
    pub fn makespan(&self) -> i64 {
        self.makespan
    }

    /// Number of scheduled operations.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Whether no operation was scheduled.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Finds the placement of `(job_id, op_index)`.
    pub fn find(&self, job_id: usize, op_index: usize) -> Option<&ScheduledOp> {
        self.ops
            .iter()
            .find(|op| op.job_id == job_id && op.op_index == op_index)
    }

    /// Operations of one job in `op_index` order.
    pub fn ops_for_job(&self, job_id: usize) -> Vec<&ScheduledOp> {
        let mut ops: Vec<&ScheduledOp> = self.ops.iter().filter(|op| op.job_id == job_id).collect();
        ops.sort_by_key(|op| op.op_index);
        ops
    }

    /// Operations of one machine in time order.
    pub fn ops_for_machine(&self, machine_id: usize) -> Vec<&ScheduledOp> {
        let mut ops: Vec<&ScheduledOp> = self
            .ops
            .iter()
            .filter(|op| op.machine_id == machine_id)
            .collect();
        ops.sort_by_key(|op| (op.start, op.end, op.job_id, op.op_index));
        ops
    }

    /// Groups operations by machine, each group ordered by `(start, end, job_id, op_index)`.
    pub fn by_machine(&self) -> BTreeMap<usize, Vec<ScheduledOp>> {
        let mut out: BTreeMap<usize, Vec<ScheduledOp>> = BTreeMap::new();
        for op in &self.ops {
            out.entry(op.machine_id).or_default().push(*op);
        }
        for ops in out.values_mut() {
            ops.sort_by_key(|op| (op.start, op.end, op.job_id, op.op_index));
        }
        out
    }

    /// Latest end time among all operations (0 when empty).
    pub fn max_end(&self) -> i64 {
        self.ops.iter().map(|op| op.end).max().unwrap_or(0)
    }

    /// Busy time of a machine.
    pub fn machine_busy_time(&self, machine_id: usize) -> i64 {
        self.ops
            .iter()
            .filter(|op| op.machine_id == machine_id)
            .map(|op| op.duration)
            .sum()
    }

    /// `Σ completion_j` over all jobs.
    pub fn total_completion(&self) -> i64 {
        self.job_completion.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(job_id: usize, op_index: usize, machine_id: usize, start: i64, end: i64) -> ScheduledOp {
        ScheduledOp {
            job_id,
            op_index,
            machine_id,
            start,
            end,
            duration: end - start,
        }
    }

    fn sample_schedule() -> Schedule {
        Schedule::from_parts(
            "sample",
            vec![
                op(1, 0, 0, 3, 5),
                op(0, 1, 1, 3, 5),
                op(0, 0, 0, 0, 3),
                op(1, 1, 1, 5, 6),
            ],
            vec![5, 6],
            6,
        )
    }

    #[test]
    fn test_ops_sorted_on_construction() {
        let s = sample_schedule();
        let keys: Vec<(usize, usize)> = s.ops().iter().map(|o| (o.job_id, o.op_index)).collect();
        // (start, machine, job, op): (0,0,0,0) (3,0,1,0) (3,1,0,1) (5,1,1,1)
        assert_eq!(keys, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_lookup() {
        let s = sample_schedule();
        assert_eq!(s.instance_name(), "sample");
        assert_eq!(s.op_count(), 4);
        assert_eq!(s.find(1, 1).unwrap().start, 5);
        assert!(s.find(2, 0).is_none());
        assert_eq!(s.completion_of(1), Some(6));
        assert_eq!(s.completion_of(9), None);
        assert_eq!(s.makespan(), 6);
        assert_eq!(s.max_end(), 6);
        assert_eq!(s.total_completion(), 11);
    }

    #[test]
    fn test_ops_for_job_and_machine() {
        let s = sample_schedule();
        let job0: Vec<usize> = s.ops_for_job(0).iter().map(|o| o.op_index).collect();
        assert_eq!(job0, vec![0, 1]);

        let m1: Vec<i64> = s.ops_for_machine(1).iter().map(|o| o.start).collect();
        assert_eq!(m1, vec![3, 5]);
        assert_eq!(s.machine_busy_time(0), 5);
    }

    #[test]
    fn test_by_machine() {
        let s = sample_schedule();
        let groups = s.by_machine();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&0].iter().map(|o| o.job_id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(groups[&1].iter().map(|o| o.job_id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_overlaps() {
        let a = op(0, 0, 0, 0, 3);
        let b = op(1, 0, 0, 3, 5);
        let c = op(2, 0, 0, 2, 4);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_unsolved_sentinel() {
        let s = Schedule::unsolved("x");
        assert!(s.is_empty());
        assert_eq!(s.makespan(), NO_SOLUTION);
        assert!(s.job_completion().is_empty());
        assert_eq!(s.max_end(), 0);
    }
}
