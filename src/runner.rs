//! Scenario batches: FCFS against optimized baselines.
//!
//! For every instance the runner produces
//!
//! - `fcfs`: the dispatch simulation,
//! - `opt_makespan`: the optimizer minimizing makespan,
//! - `opt_weighted_{label}`: the optimizer minimizing weighted completion,
//!   once per weight pattern,
//!
//! and writes per-scenario operation tables, Gantt charts and one summary
//! table into `out_dir/{instance}/`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::error::{ExportError, RunError, SolveError};
use crate::ga::{GaOptimizer, DEFAULT_TIME_LIMIT_MS};
use crate::models::{Instance, Schedule};
use crate::optimizer::{Objective, ScheduleOptimizer, SolveStatus};
use crate::presets::{self, WeightPattern};
use crate::report::{self, SummaryRow};
use crate::scheduler::{simulate, ScheduleKpi};

/// Runner settings.
///
/// # Example
/// ```
/// use jobshop_fcfs::runner::RunConfig;
///
/// let config = RunConfig::default()
///     .with_out_dir("out")
///     .with_charts(false);
/// assert!(config.optimize);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root output directory; each instance gets a subdirectory.
    pub out_dir: PathBuf,
    /// Whether to run the optimizer scenarios.
    pub optimize: bool,
    /// Whether to render Gantt charts.
    pub charts: bool,
    /// Weight patterns; `None` uses [`presets::weight_patterns`].
    pub weight_patterns: Option<Vec<WeightPattern>>,
    /// Wall-clock budget per optimizer solve, in milliseconds.
    pub time_limit_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("jobshop_outputs"),
            optimize: true,
            charts: true,
            weight_patterns: None,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
        }
    }
}

impl RunConfig {
    /// Sets the output directory.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Enables or disables the optimizer scenarios.
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Enables or disables chart rendering.
    pub fn with_charts(mut self, charts: bool) -> Self {
        self.charts = charts;
        self
    }

    /// Uses fixed weight patterns instead of the presets.
    pub fn with_weight_patterns(mut self, patterns: Vec<WeightPattern>) -> Self {
        self.weight_patterns = Some(patterns);
        self
    }

    /// Sets the per-solve optimizer budget.
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    /// The GA optimizer with this config's time budget.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] for a zero time limit.
    pub fn optimizer(&self) -> Result<GaOptimizer, SolveError> {
        let config = GaOptimizer::default().config().clone().with_time_limit_ms(self.time_limit_ms);
        GaOptimizer::new(config)
    }

    /// Weight patterns for an instance with `num_jobs` jobs.
    pub fn patterns_for(&self, num_jobs: usize) -> Vec<WeightPattern> {
        match &self.weight_patterns {
            Some(patterns) => patterns.clone(),
            None => presets::weight_patterns(num_jobs),
        }
    }

    /// Output directory of one instance.
    pub fn instance_dir(&self, instance: &Instance) -> PathBuf {
        self.out_dir.join(instance.name())
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// `fcfs`, `opt_makespan` or `opt_weighted_{label}`.
    pub schedule_type: String,
    /// Objective description.
    pub objective: String,
    /// Objective value (`-1` without a solution).
    pub objective_value: i64,
    /// Solver outcome; `None` for the simulation.
    pub status: Option<SolveStatus>,
    /// The schedule.
    pub schedule: Schedule,
}

impl ScenarioResult {
    /// Makespan of the scenario schedule.
    pub fn makespan(&self) -> i64 {
        self.schedule.makespan()
    }

    /// Row of the summary table.
    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            schedule_type: self.schedule_type.clone(),
            objective: self.objective.clone(),
            objective_value: self.objective_value,
            status: self.status.map_or("-", SolveStatus::as_str).to_string(),
            makespan: self.makespan(),
            job_completion: self.schedule.job_completion().to_vec(),
        }
    }
}

/// Runs every scenario for one instance and writes its artifacts.
///
/// Optimizer scenarios run only when `config.optimize` is set and an
/// optimizer is given.
///
/// # Errors
/// [`RunError::Solve`] for a configured weight pattern whose length is not
/// the job count; [`RunError::Export`] when an artifact cannot be written.
pub fn run_instance(
    instance: &Instance,
    config: &RunConfig,
    optimizer: Option<&dyn ScheduleOptimizer>,
) -> Result<Vec<ScenarioResult>, RunError> {
    let _span = info_span!("run_instance", instance = instance.name()).entered();
    let dir = config.instance_dir(instance);
    fs::create_dir_all(&dir).map_err(ExportError::from)?;

    let mut results = Vec::new();

    let fcfs = simulate(instance);
    let title = format!("{}: FCFS (makespan={})", instance.name(), fcfs.makespan());
    results.push(ScenarioResult {
        schedule_type: "fcfs".to_string(),
        objective: "makespan (derived)".to_string(),
        objective_value: fcfs.makespan(),
        status: None,
        schedule: fcfs,
    });
    write_scenario(&dir, instance, config, &results[0], &title)?;

    if let Some(optimizer) = optimizer.filter(|_| config.optimize) {
        let result = optimizer.solve(instance, &Objective::Makespan)?;
        let title = format!(
            "{}: {} makespan-min (makespan={})",
            instance.name(),
            optimizer.name(),
            result.schedule.makespan()
        );
        let scenario = ScenarioResult {
            schedule_type: "opt_makespan".to_string(),
            objective: result.objective_name,
            objective_value: result.objective_value,
            status: Some(result.status),
            schedule: result.schedule,
        };
        write_scenario(&dir, instance, config, &scenario, &title)?;
        results.push(scenario);

        for (label, weights) in config.patterns_for(instance.num_jobs()) {
            let objective = Objective::weighted(weights.clone());
            let result = optimizer.solve(instance, &objective)?;
            let title = format!(
                "{}: {} weighted ({label}) (obj={}, makespan={})",
                instance.name(),
                optimizer.name(),
                result.objective_value,
                result.schedule.makespan()
            );
            let scenario = ScenarioResult {
                schedule_type: format!("opt_weighted_{label}"),
                objective: format!("{} weights={weights:?}", result.objective_name),
                objective_value: result.objective_value,
                status: Some(result.status),
                schedule: result.schedule,
            };
            write_scenario(&dir, instance, config, &scenario, &title)?;
            results.push(scenario);
        }
    }

    let rows: Vec<SummaryRow> = results.iter().map(ScenarioResult::summary_row).collect();
    let summary_path = dir.join(format!("{}_summary.csv", instance.name()));
    report::write_summary_table(BufWriter::new(File::create(&summary_path).map_err(ExportError::from)?), &rows)?;
    info!(path = %summary_path.display(), scenarios = results.len(), "wrote summary");

    Ok(results)
}

/// Runs [`run_instance`] for each instance in turn.
pub fn run_all(
    instances: &[Instance],
    config: &RunConfig,
    optimizer: Option<&dyn ScheduleOptimizer>,
) -> Result<Vec<Vec<ScenarioResult>>, RunError> {
    instances
        .iter()
        .map(|instance| run_instance(instance, config, optimizer))
        .collect()
}

fn write_scenario(
    dir: &Path,
    instance: &Instance,
    config: &RunConfig,
    scenario: &ScenarioResult,
    title: &str,
) -> Result<(), ExportError> {
    let stem = format!("{}_{}", instance.name(), scenario.schedule_type);

    let ops_path = dir.join(format!("{stem}_ops.csv"));
    report::write_ops_table(BufWriter::new(File::create(&ops_path)?), scenario.schedule.ops())?;

    if config.charts {
        report::save_gantt(&scenario.schedule, title, dir.join(format!("{stem}_gantt.svg")))?;
    }

    if let Some(status) = scenario.status.filter(|status| !status.has_schedule()) {
        warn!(scenario = %scenario.schedule_type, %status, "optimizer returned no schedule");
    }

    if scenario.makespan() > 0 {
        let kpi = ScheduleKpi::calculate(&scenario.schedule, instance);
        debug!(
            scenario = %scenario.schedule_type,
            total_completion = kpi.total_completion,
            avg_utilization = kpi.avg_utilization,
            idle = kpi.total_idle_time,
            "scenario kpi"
        );
    }

    info!(
        scenario = %scenario.schedule_type,
        objective_value = scenario.objective_value,
        makespan = scenario.makespan(),
        status = scenario.status.map_or("-", SolveStatus::as_str),
        "scenario done"
    );
    Ok(())
}
