//! Job-shop GA problem and the optimizer built on it.
//!
//! Implements `u_metaheur::ga::GaProblem` for an [`Instance`] and an
//! [`Objective`]: chromosomes decode into semi-active schedules and their
//! fitness is the objective value of that schedule.
//!
//! # Reference
//! Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

use rand::Rng;
use tracing::{debug, debug_span};
use u_metaheur::ga::{GaConfig, GaProblem, GaRunner};

use super::chromosome::{insert_mutation, pox_crossover, swap_mutation, OperationSequence};
use crate::error::SolveError;
use crate::models::{Instance, Schedule, ScheduledOp};
use crate::optimizer::{Objective, OptimizedSchedule, ScheduleOptimizer};
use crate::scheduler::simulate;

/// Default wall-clock budget of one optimizer run.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 10_000;

/// Share of the initial population copied from the seed sequences.
const SEED_RATIO: f64 = 0.1;

/// GA problem definition for one instance and objective.
///
/// # Example
/// ```
/// use jobshop_fcfs::ga::JobShopGaProblem;
/// use jobshop_fcfs::optimizer::Objective;
/// use jobshop_fcfs::presets;
/// use u_metaheur::ga::{GaConfig, GaRunner};
///
/// let instance = presets::three_job_example();
/// let problem = JobShopGaProblem::new(&instance, Objective::Makespan);
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_seed(7)
///     .with_parallel(false);
/// let result = GaRunner::run(&problem, &config);
/// // Machine 1 alone needs 7.
/// assert!(result.best_fitness >= 7.0);
/// ```
pub struct JobShopGaProblem<'a> {
    instance: &'a Instance,
    objective: Objective,
    /// Known sequences injected into the initial population.
    seeds: Vec<OperationSequence>,
}

impl<'a> JobShopGaProblem<'a> {
    /// Creates a problem seeded with the job-by-job sequence.
    pub fn new(instance: &'a Instance, objective: Objective) -> Self {
        Self {
            instance,
            objective,
            seeds: vec![OperationSequence::job_by_job(instance)],
        }
    }

    /// Adds a seed sequence. Invalid sequences are ignored.
    pub fn with_seed(mut self, seed: OperationSequence) -> Self {
        if seed.is_valid(self.instance) {
            self.seeds.push(OperationSequence::new(seed.genes));
        }
        self
    }

    /// Seed sequences, job-by-job first.
    pub fn seeds(&self) -> &[OperationSequence] {
        &self.seeds
    }

    /// Decodes a sequence into a semi-active schedule.
    ///
    /// Each gene appends the job's next operation to its machine, starting
    /// when both the job and the machine are free. Genes beyond a job's
    /// operation count are skipped.
    pub fn decode(&self, sequence: &OperationSequence) -> Schedule {
        let instance = self.instance;
        let mut next_op = vec![0usize; instance.num_jobs()];
        let mut job_ready = vec![0i64; instance.num_jobs()];
        let mut machine_ready = vec![0i64; instance.num_machines()];
        let mut job_completion = vec![0i64; instance.num_jobs()];
        let mut ops = Vec::with_capacity(instance.num_operations());

        for &job_id in &sequence.genes {
            let Some(op) = next_op
                .get(job_id)
                .and_then(|&op_index| instance.operation(job_id, op_index))
            else {
                continue;
            };

            // Bounded by the instance's total processing time.
            let start = job_ready[job_id].max(machine_ready[op.machine_id]);
            let end = start + op.duration;

            ops.push(ScheduledOp {
                job_id,
                op_index: op.op_index,
                machine_id: op.machine_id,
                start,
                end,
                duration: op.duration,
            });
            job_ready[job_id] = end;
            machine_ready[op.machine_id] = end;
            next_op[job_id] += 1;
            if next_op[job_id] == instance.job(job_id).len() {
                job_completion[job_id] = end;
            }
        }

        let makespan = job_completion.iter().copied().max().unwrap_or(0);
        Schedule::from_parts(instance.name(), ops, job_completion, makespan)
    }

    /// Objective value of a decoded sequence.
    pub fn objective_value(&self, sequence: &OperationSequence) -> i64 {
        self.objective.evaluate(&self.decode(sequence))
    }
}

impl GaProblem for JobShopGaProblem<'_> {
    type Individual = OperationSequence;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> OperationSequence {
        if !self.seeds.is_empty() && rng.random_bool(SEED_RATIO) {
            let pick = rng.random_range(0..self.seeds.len());
            self.seeds[pick].clone()
        } else {
            OperationSequence::random(self.instance, rng)
        }
    }

    fn evaluate(&self, individual: &OperationSequence) -> f64 {
        self.objective_value(individual) as f64
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &OperationSequence,
        parent2: &OperationSequence,
        rng: &mut R,
    ) -> Vec<OperationSequence> {
        let (c1, c2) = pox_crossover(parent1, parent2, self.instance.num_jobs(), rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut OperationSequence, rng: &mut R) {
        // 50% swap, 50% insert
        if rng.random_bool(0.5) {
            swap_mutation(individual, rng);
        } else {
            insert_mutation(individual, rng);
        }
    }
}

/// Genetic-algorithm optimizer.
///
/// The FCFS schedule seeds the search, and the reported schedule is the
/// best of the GA result and the seeds, so it never scores worse than FCFS
/// on the requested objective.
///
/// # Example
/// ```
/// use jobshop_fcfs::ga::GaOptimizer;
/// use jobshop_fcfs::optimizer::{Objective, ScheduleOptimizer};
/// use jobshop_fcfs::presets;
///
/// let instance = presets::three_job_example();
/// let result = GaOptimizer::default().solve(&instance, &Objective::Makespan).unwrap();
/// assert!(result.status.has_schedule());
/// assert_eq!(result.objective_value, 7);
/// ```
#[derive(Debug, Clone)]
pub struct GaOptimizer {
    config: GaConfig,
}

impl GaOptimizer {
    /// Creates an optimizer with a GA configuration.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] when `u-metaheur` rejects the
    /// configuration (population below 2, zero generations, a zero time
    /// limit, or elites filling the population).
    pub fn new(config: GaConfig) -> Result<Self, SolveError> {
        config.validate().map_err(SolveError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// The GA configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }
}

impl Default for GaOptimizer {
    fn default() -> Self {
        Self {
            config: GaConfig::default()
                .with_population_size(60)
                .with_max_generations(300)
                .with_stagnation_limit(60)
                .with_seed(42)
                .with_time_limit_ms(DEFAULT_TIME_LIMIT_MS),
        }
    }
}

impl ScheduleOptimizer for GaOptimizer {
    fn name(&self) -> &str {
        "ga"
    }

    fn optimize(&self, instance: &Instance, objective: &Objective) -> OptimizedSchedule {
        let _span = debug_span!("ga", instance = instance.name(), objective = objective.name()).entered();

        let fcfs = simulate(instance);
        if instance.num_operations() == 0 {
            return OptimizedSchedule::solved(instance, objective, fcfs);
        }

        let problem = JobShopGaProblem::new(instance, objective.clone())
            .with_seed(OperationSequence::from_schedule(&fcfs));
        let result = GaRunner::run(&problem, &self.config);

        let (value, schedule) = std::iter::once(&result.best)
            .chain(problem.seeds())
            .map(|sequence| {
                let schedule = problem.decode(sequence);
                (objective.evaluate(&schedule), schedule)
            })
            .min_by_key(|(value, _)| *value)
            .unwrap_or_else(|| (objective.evaluate(&fcfs), fcfs));

        debug!(
            generations = result.generations,
            stagnated = result.stagnated,
            timed_out = result.timed_out,
            ga_best = result.best_fitness,
            value,
            "ga finished"
        );

        OptimizedSchedule::solved(instance, objective, schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::InstanceGenerator;
    use crate::optimizer::SolveStatus;
    use crate::presets;
    use crate::validation::validate_schedule;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quick_optimizer() -> GaOptimizer {
        GaOptimizer::new(
            GaConfig::default()
                .with_population_size(30)
                .with_max_generations(40)
                .with_seed(42)
                .with_parallel(false),
        )
        .unwrap()
    }

    /// Two jobs competing for one machine: a long one and a short one.
    fn one_machine_pair() -> Instance {
        Instance::new("pair", vec![vec![(0, 5)], vec![(0, 1)]]).unwrap()
    }

    #[test]
    fn test_decode_fcfs_sequence_reproduces_simulation() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut instances = presets::default_instances();
        instances.push(presets::three_job_example());
        instances.extend(
            InstanceGenerator::new(6, 4)
                .with_recirculation(true)
                .generate_many("random", 5, &mut rng)
                .unwrap(),
        );

        for instance in &instances {
            let fcfs = simulate(instance);
            let problem = JobShopGaProblem::new(instance, Objective::Makespan);
            let decoded = problem.decode(&OperationSequence::from_schedule(&fcfs));
            assert_eq!(decoded, fcfs, "instance {}", instance.name());
        }
    }

    #[test]
    fn test_decode_is_feasible() {
        let instance = presets::custom_jobs();
        let problem = JobShopGaProblem::new(&instance, Objective::Makespan);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let sequence = problem.create_individual(&mut rng);
            let schedule = problem.decode(&sequence);
            assert_eq!(schedule.op_count(), instance.num_operations());
            assert!(validate_schedule(&instance, &schedule).is_ok());
            assert!(schedule.makespan() >= instance.makespan_lower_bound());
        }
    }

    #[test]
    fn test_fitness_is_selected_objective() {
        let instance = one_machine_pair();
        let job_by_job = OperationSequence::new(vec![0, 1]);

        let makespan = JobShopGaProblem::new(&instance, Objective::Makespan);
        let weighted = JobShopGaProblem::new(&instance, Objective::weighted(vec![1, 10]));
        assert_eq!(makespan.evaluate(&job_by_job), 6.0);
        // C = [5, 6]
        assert_eq!(weighted.evaluate(&job_by_job), 65.0);
    }

    #[test]
    fn test_invalid_seed_ignored() {
        let instance = presets::three_job_example();
        let problem =
            JobShopGaProblem::new(&instance, Objective::Makespan).with_seed(OperationSequence::new(vec![0, 1]));
        assert_eq!(problem.seeds().len(), 1);
    }

    #[test]
    fn test_ga_runner_integration() {
        let instance = presets::custom_jobs();
        let problem = JobShopGaProblem::new(&instance, Objective::Makespan);
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_seed(42)
            .with_parallel(false);

        let result = GaRunner::run(&problem, &config);
        assert!(result.best_fitness.is_finite());
        assert!(result.best_fitness >= instance.makespan_lower_bound() as f64);
        assert!(result.best.is_valid(&instance));
        assert!(result.generations > 0);
    }

    #[test]
    fn test_weights_change_schedule() {
        let instance = one_machine_pair();
        let optimizer = quick_optimizer();

        let short_first = optimizer.solve(&instance, &Objective::weighted(vec![1, 10])).unwrap();
        let long_first = optimizer.solve(&instance, &Objective::weighted(vec![10, 1])).unwrap();

        // 1*6 + 10*1 = 16 beats 1*5 + 10*6 = 65.
        assert_eq!(short_first.objective_value, 16);
        assert_eq!(short_first.schedule.job_completion(), &[6, 1]);
        // 10*5 + 1*6 = 56 beats 10*6 + 1*1 = 61.
        assert_eq!(long_first.objective_value, 56);
        assert_eq!(long_first.schedule.job_completion(), &[5, 6]);
        assert_ne!(short_first.schedule, long_first.schedule);
    }

    #[test]
    fn test_weight_patterns_differ_on_presets() {
        let instance = presets::assignment_jobs();
        let optimizer = quick_optimizer();

        let completions: Vec<Vec<i64>> = presets::weight_patterns(instance.num_jobs())
            .into_iter()
            .map(|(_, weights)| {
                optimizer
                    .solve(&instance, &Objective::weighted(weights))
                    .unwrap()
                    .schedule
                    .job_completion()
                    .to_vec()
            })
            .collect();

        assert!(
            completions.windows(2).any(|pair| pair[0] != pair[1]),
            "all weight patterns gave {:?}",
            completions[0]
        );
    }

    #[test]
    fn test_never_worse_than_fcfs_on_presets() {
        let optimizer = quick_optimizer();
        let mut instances = presets::default_instances();
        instances.push(presets::three_job_example());

        for instance in &instances {
            let fcfs = simulate(instance);

            let result = optimizer.solve(instance, &Objective::Makespan).unwrap();
            assert!(result.status.has_schedule());
            assert!(
                result.objective_value <= fcfs.makespan(),
                "{}: opt {} > fcfs {}",
                instance.name(),
                result.objective_value,
                fcfs.makespan()
            );
            assert_eq!(result.objective_value, result.schedule.makespan());
            assert!(result.objective_value >= instance.makespan_lower_bound());
            assert!(validate_schedule(instance, &result.schedule).is_ok());

            for (label, weights) in presets::weight_patterns(instance.num_jobs()) {
                let objective = Objective::weighted(weights);
                let result = optimizer.solve(instance, &objective).unwrap();
                assert!(
                    result.objective_value <= objective.evaluate(&fcfs),
                    "{} {label}: opt {} worse than fcfs",
                    instance.name(),
                    result.objective_value
                );
                assert!(validate_schedule(instance, &result.schedule).is_ok());
            }
        }
    }

    #[test]
    fn test_tiny_budget_still_beats_or_matches_fcfs() {
        let optimizer = GaOptimizer::new(
            GaConfig::default()
                .with_population_size(2)
                .with_max_generations(1)
                .with_elite_ratio(0.0)
                .with_seed(1)
                .with_parallel(false),
        )
        .unwrap();
        let instance = presets::custom_jobs();

        let result = optimizer.solve(&instance, &Objective::Makespan).unwrap();
        assert!(result.objective_value <= simulate(&instance).makespan());
    }

    #[test]
    fn test_empty_instance() {
        let instance = Instance::builder("empty").empty_job().build().unwrap();
        let result = quick_optimizer().solve(&instance, &Objective::Makespan).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective_value, 0);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        for config in [
            GaConfig::default().with_population_size(1),
            GaConfig::default().with_max_generations(0),
            GaConfig::default().with_time_limit_ms(0),
        ] {
            assert!(matches!(
                GaOptimizer::new(config),
                Err(SolveError::InvalidConfig(_))
            ));
        }
        assert!(GaOptimizer::default().config().validate().is_ok());
        assert_eq!(
            GaOptimizer::default().config().time_limit_ms,
            Some(DEFAULT_TIME_LIMIT_MS)
        );
    }
}
