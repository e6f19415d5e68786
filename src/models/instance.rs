//! Job-shop instance model.
//!
//! An instance is a named list of jobs; each job is a fixed sequence of
//! operations, and each operation occupies exactly one machine for a fixed
//! duration. Instances are validated once, at construction, and are
//! read-only afterwards.
//!
//! # Machine Numbering
//! Machines are identified by dense indices starting at 0. The machine
//! count is `1 + max(machine_id)`, so an id that no operation references
//! still counts when a higher id is referenced.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7 (Job Shops)

use serde::{Deserialize, Serialize};

use crate::error::InstanceError;

/// Raw operation as supplied by callers and files: `(machine_id, duration)`.
pub type RawOperation = (i64, i64);

/// A single processing step of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Owning job.
    pub job_id: usize,
    /// Position within the job (0-indexed).
    pub op_index: usize,
    /// Machine that processes this operation.
    pub machine_id: usize,
    /// Processing time, always positive.
    pub duration: i64,
}

/// An ordered sequence of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: usize,
    operations: Vec<Operation>,
}

impl Job {
    /// Job index within its instance.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Operations in processing order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the job has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Sum of operation durations.
    pub fn total_duration(&self) -> i64 {
        self.operations.iter().map(|op| op.duration).sum()
    }

    /// Last operation, if any.
    pub fn last(&self) -> Option<&Operation> {
        self.operations.last()
    }
}

/// An immutable job-shop instance.
///
/// # Example
/// ```
/// use jobshop_fcfs::models::Instance;
///
/// let instance = Instance::builder("demo")
///     .job([(0, 3), (1, 2)])
///     .job([(1, 4)])
///     .build()
///     .unwrap();
///
/// assert_eq!(instance.num_jobs(), 2);
/// assert_eq!(instance.num_machines(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "InstanceSpec", try_from = "InstanceSpec")]
pub struct Instance {
    name: String,
    jobs: Vec<Job>,
    num_machines: usize,
}

impl Instance {
    /// Starts building an instance.
    pub fn builder(name: impl Into<String>) -> InstanceBuilder {
        InstanceBuilder::new(name)
    }

    /// Builds an instance from raw `(machine_id, duration)` routes.
    pub fn new<J>(name: impl Into<String>, jobs: J) -> Result<Self, InstanceError>
    where
        J: IntoIterator,
        J::Item: IntoIterator<Item = RawOperation>,
    {
        jobs.into_iter()
            .fold(Self::builder(name), |builder, job| builder.job(job))
            .build()
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All jobs, indexed by job id.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job by id.
    ///
    /// # Panics
    /// Panics if `job_id >= num_jobs()`.
    pub fn job(&self, job_id: usize) -> &Job {
        &self.jobs[job_id]
    }

    /// Operation by `(job_id, op_index)`, if it exists.
    pub fn operation(&self, job_id: usize, op_index: usize) -> Option<&Operation> {
        self.jobs.get(job_id)?.operations.get(op_index)
    }

    /// Number of jobs.
    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines: `1 + max(machine_id)`, or 0 if there are no operations.
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Total number of operations across all jobs.
    pub fn num_operations(&self) -> usize {
        self.jobs.iter().map(Job::len).sum()
    }

    /// Sum of every operation's duration. Upper bound on any non-delay schedule.
    pub fn total_duration(&self) -> i64 {
        self.jobs.iter().map(Job::total_duration).sum()
    }

    /// Total processing time required on a machine.
    pub fn machine_load(&self, machine_id: usize) -> i64 {
        self.operations()
            .filter(|op| op.machine_id == machine_id)
            .map(|op| op.duration)
            .sum()
    }

    /// Iterates every operation, job by job.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.jobs.iter().flat_map(|job| job.operations.iter())
    }

    /// Simple makespan lower bound: max of the longest job and the busiest machine.
    pub fn makespan_lower_bound(&self) -> i64 {
        let longest_job = self.jobs.iter().map(Job::total_duration).max().unwrap_or(0);
        let busiest_machine = (0..self.num_machines)
            .map(|m| self.machine_load(m))
            .max()
            .unwrap_or(0);
        longest_job.max(busiest_machine)
    }
}

/// Builder for [`Instance`]. Validation happens in [`InstanceBuilder::build`].
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    name: String,
    routes: Vec<Vec<RawOperation>>,
}

impl InstanceBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: Vec::new(),
        }
    }

    /// Appends a job given its `(machine_id, duration)` route.
    pub fn job(mut self, route: impl IntoIterator<Item = RawOperation>) -> Self {
        self.routes.push(route.into_iter().collect());
        self
    }

    /// Appends a job with no operations.
    pub fn empty_job(mut self) -> Self {
        self.routes.push(Vec::new());
        self
    }

    /// Validates every operation and freezes the instance.
    ///
    /// # Errors
    /// - [`InstanceError::NonPositiveDuration`] for a duration ≤ 0
    /// - [`InstanceError::NegativeMachine`] for a machine id < 0
    /// - [`InstanceError::HorizonOverflow`] if the durations sum past `i64::MAX`
    pub fn build(self) -> Result<Instance, InstanceError> {
        let mut jobs = Vec::with_capacity(self.routes.len());
        let mut num_machines = 0usize;
        // Every start and end a schedule computes lies within [0, horizon].
        let mut horizon = 0i64;

        for (job_id, route) in self.routes.into_iter().enumerate() {
            let mut operations = Vec::with_capacity(route.len());
            for (op_index, (machine_id, duration)) in route.into_iter().enumerate() {
                if duration <= 0 {
                    return Err(InstanceError::NonPositiveDuration {
                        job_id,
                        op_index,
                        duration,
                    });
                }
                let machine = usize::try_from(machine_id).map_err(|_| {
                    InstanceError::NegativeMachine {
                        job_id,
                        op_index,
                        machine_id,
                    }
                })?;
                horizon = horizon
                    .checked_add(duration)
                    .ok_or(InstanceError::HorizonOverflow { job_id, op_index })?;
                num_machines = num_machines.max(machine + 1);
                operations.push(Operation {
                    job_id,
                    op_index,
                    machine_id: machine,
                    duration,
                });
            }
            jobs.push(Job {
                id: job_id,
                operations,
            });
        }

        Ok(Instance {
            name: self.name,
            jobs,
            num_machines,
        })
    }
}

/// Serialized form: `{ "name": ..., "jobs": [[[machine, duration], ...], ...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstanceSpec {
    name: String,
    jobs: Vec<Vec<RawOperation>>,
}

impl From<Instance> for InstanceSpec {
    fn from(instance: Instance) -> Self {
        let jobs = instance
            .jobs
            .iter()
            .map(|job| {
                job.operations
                    .iter()
                    .map(|op| (op.machine_id as i64, op.duration))
                    .collect()
            })
            .collect();
        Self {
            name: instance.name,
            jobs,
        }
    }
}

impl TryFrom<InstanceSpec> for Instance {
    type Error = InstanceError;

    fn try_from(spec: InstanceSpec) -> Result<Self, Self::Error> {
        Instance::new(spec.name, spec.jobs)
    }
}
