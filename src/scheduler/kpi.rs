//! Schedule quality metrics (KPIs).
//!
//! Computes standard scheduling performance indicators from a completed
//! schedule and its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Completion (ΣC_j) | Sum of job completion times |
//! | Avg Flow Time | Mean completion time (all jobs released at t=0) |
//! | Utilization | Machine busy time / makespan |
//! | Idle Time | Σ (makespan - busy) over machines |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::{Instance, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Sum of completion times across all jobs.
    pub total_completion: i64,
    /// Average flow time over jobs that have operations.
    pub avg_flow_time: f64,
    /// Busy time per machine, indexed by machine id.
    pub busy_by_machine: Vec<i64>,
    /// Utilization per machine (0.0..1.0), indexed by machine id.
    pub utilization_by_machine: Vec<f64>,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Total idle machine time within the makespan.
    pub total_idle_time: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    ///
    /// # Arguments
    /// * `schedule` - The completed schedule.
    /// * `instance` - The instance it was built for (machine count, empty jobs).
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let makespan = schedule.makespan().max(0);
        let total_completion = schedule.total_completion();

        let mut flow_sum = 0i64;
        let mut counted_jobs = 0usize;
        for job in instance.jobs() {
            if job.is_empty() {
                continue;
            }
            if let Some(completion) = schedule.completion_of(job.id()) {
                flow_sum += completion;
                counted_jobs += 1;
            }
        }
        let avg_flow_time = if counted_jobs == 0 {
            0.0
        } else {
            flow_sum as f64 / counted_jobs as f64
        };

        let busy_by_machine: Vec<i64> = (0..instance.num_machines())
            .map(|m| schedule.machine_busy_time(m))
            .collect();

        let utilization_by_machine: Vec<f64> = busy_by_machine
            .iter()
            .map(|&busy| {
                if makespan == 0 {
                    0.0
                } else {
                    busy as f64 / makespan as f64
                }
            })
            .collect();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let total_idle_time = busy_by_machine.iter().map(|&busy| makespan - busy).sum();

        Self {
            makespan,
            total_completion,
            avg_flow_time,
            busy_by_machine,
            utilization_by_machine,
            avg_utilization,
            total_idle_time,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::scheduler::simulate;

    #[test]
    fn test_kpi_three_job_example() {
        let instance = presets::three_job_example();
        let schedule = simulate(&instance);
        let kpi = ScheduleKpi::calculate(&schedule, &instance);

        assert_eq!(kpi.makespan, 7);
        assert_eq!(kpi.total_completion, 17);
        assert!((kpi.avg_flow_time - 17.0 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.busy_by_machine, vec![5, 7]);
        assert!((kpi.utilization_by_machine[0] - 5.0 / 7.0).abs() < 1e-10);
        assert!((kpi.utilization_by_machine[1] - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 6.0 / 7.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle_time, 2);
    }

    #[test]
    fn test_kpi_ignores_empty_jobs_in_flow_time() {
        let instance = crate::models::Instance::builder("e")
            .empty_job()
            .job([(0, 4)])
            .build()
            .unwrap();
        let schedule = simulate(&instance);
        let kpi = ScheduleKpi::calculate(&schedule, &instance);

        assert_eq!(kpi.makespan, 4);
        assert!((kpi.avg_flow_time - 4.0).abs() < 1e-10);
        assert_eq!(kpi.total_idle_time, 0);
    }

    #[test]
    fn test_kpi_empty_instance() {
        let instance = crate::models::Instance::builder("none").build().unwrap();
        let schedule = simulate(&instance);
        let kpi = ScheduleKpi::calculate(&schedule, &instance);

        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.avg_flow_time, 0.0);
        assert_eq!(kpi.avg_utilization, 0.0);
        assert!(kpi.busy_by_machine.is_empty());
    }

    #[test]
    fn test_meets_thresholds() {
        let instance = presets::three_job_example();
        let kpi = ScheduleKpi::calculate(&simulate(&instance), &instance);
        assert!(kpi.meets_thresholds(7, 0.8));
        assert!(!kpi.meets_thresholds(6, 0.8));
        assert!(!kpi.meets_thresholds(10, 0.9));
    }
}
