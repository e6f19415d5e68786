//! First-come-first-served discrete-event dispatch simulation.
//!
//! # Algorithm
//!
//! 1. Every job's first operation arrives at its machine at t=0.
//! 2. A dispatch pass visits machines in id order. An idle machine
//!    (`free_time <= now`) with a non-empty queue takes the earliest arrival,
//!    ties broken by `(job_id, op_index)`, and starts it at
//!    `max(free_time, arrival)`. A completion event is scheduled.
//! 3. The earliest completion event (ties: machine, job, op) becomes `now`;
//!    the job's next operation arrives at its machine at `now`, or the job is
//!    complete. A dispatch pass runs at `now`.
//! 4. Repeat until no events remain.
//!
//! One pass is always enough to reach a fixed point: a dispatch moves the
//! machine's `free_time` strictly past `now` (durations are positive), so no
//! machine can dispatch twice at the same instant.
//!
//! # Complexity
//! O(n log n + n * m) where n = operations, m = machines.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching (FIFO rule)

use tracing::{debug, debug_span, trace};

use super::queue::{CompletionEvent, MinQueue, WaitingOp};
use crate::models::{Instance, Schedule, ScheduledOp};

/// Simulates FCFS dispatching and returns the resulting schedule.
///
/// Deterministic: the same instance always produces the same schedule.
///
/// # Example
///
/// ```
/// use jobshop_fcfs::models::Instance;
/// use jobshop_fcfs::scheduler::simulate;
///
/// let instance = Instance::new(
///     "three_jobs",
///     vec![
///         vec![(0, 3), (1, 2)],
///         vec![(0, 2), (1, 1)],
///         vec![(1, 4)],
///     ],
/// )
/// .unwrap();
///
/// let schedule = simulate(&instance);
/// assert_eq!(schedule.makespan(), 7);
/// assert_eq!(schedule.job_completion(), &[6, 7, 4]);
/// ```
pub fn simulate(instance: &Instance) -> Schedule {
    let _span = debug_span!("fcfs", instance = instance.name()).entered();
    FcfsRun::new(instance).run()
}

/// Mutable state of one simulation. Owned by a single `simulate` call.
pub(crate) struct FcfsRun<'a> {
    instance: &'a Instance,
    /// Index of the next unfinished operation per job.
    next_op: Vec<usize>,
    /// Earliest time each machine can start new work.
    free_time: Vec<i64>,
    /// Arrived, not yet dispatched operations per machine.
    queues: Vec<MinQueue<WaitingOp>>,
    events: MinQueue<CompletionEvent>,
    scheduled: Vec<ScheduledOp>,
    job_completion: Vec<i64>,
    last_time: i64,
}

impl<'a> FcfsRun<'a> {
    /// Initializes run state and seeds first-operation arrivals at t=0.
    pub(crate) fn new(instance: &'a Instance) -> Self {
        let num_jobs = instance.num_jobs();
        let num_machines = instance.num_machines();

        let mut run = Self {
            instance,
            next_op: vec![0; num_jobs],
            free_time: vec![0; num_machines],
            queues: (0..num_machines).map(|_| MinQueue::new()).collect(),
            events: MinQueue::new(),
            scheduled: Vec::with_capacity(instance.num_operations()),
            job_completion: vec![0; num_jobs],
            last_time: 0,
        };

        for job_id in 0..num_jobs {
            run.enqueue_next(job_id, 0);
        }
        run
    }

    /// Runs the event loop to completion.
    pub(crate) fn run(mut self) -> Schedule {
        self.dispatch(0);
        while self.step().is_some() {}
        self.finish()
    }

    /// Processes the earliest completion event and the dispatch pass that
    /// follows it. Returns the event time, or `None` when no events remain.
    pub(crate) fn step(&mut self) -> Option<i64> {
        let event = self.events.pop()?;
        let now = event.end;
        trace!(
            now,
            job = event.job_id,
            op = event.op_index,
            machine = event.machine_id,
            started = event.start,
            "completed"
        );

        self.last_time = now;
        let job_id = event.job_id;
        self.next_op[job_id] = event.op_index + 1;
        if self.next_op[job_id] >= self.instance.job(job_id).len() {
            self.job_completion[job_id] = now;
        } else {
            self.enqueue_next(job_id, now);
        }

        self.dispatch(now);
        Some(now)
    }

    /// Puts the job's next operation (if any) into its machine's queue.
    fn enqueue_next(&mut self, job_id: usize, arrival: i64) {
        let op_index = self.next_op[job_id];
        if let Some(op) = self.instance.operation(job_id, op_index) {
            self.queues[op.machine_id].push(WaitingOp {
                arrival,
                job_id,
                op_index,
            });
        }
    }

    /// One dispatch pass at `now`. Returns how many operations were started.
    pub(crate) fn dispatch(&mut self, now: i64) -> usize {
        let mut dispatched = 0;

        for machine_id in 0..self.free_time.len() {
            if self.free_time[machine_id] > now {
                continue;
            }
            let Some(waiting) = self.queues[machine_id].pop() else {
                continue;
            };

            let op = self.instance.job(waiting.job_id).operations()[waiting.op_index];
            let start = self.free_time[machine_id].max(waiting.arrival);
            let end = start + op.duration;
            debug_assert!(end > now, "machine {machine_id} would stay idle at t={now}");

            trace!(
                now,
                job = waiting.job_id,
                op = waiting.op_index,
                machine = machine_id,
                arrival = waiting.arrival,
                start,
                end,
                "dispatched"
            );

            self.free_time[machine_id] = end;
            self.events.push(CompletionEvent {
                end,
                machine_id,
                job_id: waiting.job_id,
                op_index: waiting.op_index,
                start,
            });
            self.scheduled.push(ScheduledOp {
                job_id: waiting.job_id,
                op_index: waiting.op_index,
                machine_id: op.machine_id,
                start,
                end,
                duration: op.duration,
            });
            dispatched += 1;
        }

        debug_assert!(self.is_settled(now));
        dispatched
    }

    /// Whether no idle machine still has waiting work at `now`.
    pub(crate) fn is_settled(&self, now: i64) -> bool {
        self.free_time
            .iter()
            .zip(&self.queues)
            .all(|(&free, queue)| free > now || queue.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn finish(self) -> Schedule {
        // The floor keeps empty jobs (completion 0) from under-reporting.
        let makespan = self
            .job_completion
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(self.last_time);

        debug!(
            ops = self.scheduled.len(),
            makespan,
            "fcfs simulation finished"
        );

        Schedule::from_parts(
            self.instance.name(),
            self.scheduled,
            self.job_completion,
            makespan,
        )
    }
}
