//! Job-shop FCFS command line.
//!
//! Runs scenario batches, prints simulated schedules and generates random
//! instances. JSON goes to stdout, logs to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use jobshop_fcfs::generator::InstanceGenerator;
use jobshop_fcfs::models::Instance;
use jobshop_fcfs::optimizer::ScheduleOptimizer;
use jobshop_fcfs::presets;
use jobshop_fcfs::runner::{self, RunConfig};
use jobshop_fcfs::scheduler::simulate_batch;

#[derive(Parser, Debug)]
#[command(name = "jobshop-fcfs", version, about = "FCFS job-shop simulation with optimized baselines")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run FCFS and optimizer scenarios, writing tables and charts
    Run {
        /// Instances as a JSON array (defaults to the built-in set)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Run settings as JSON; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Skip the optimizer scenarios
        #[arg(long)]
        no_optimize: bool,

        /// Skip Gantt charts
        #[arg(long)]
        no_charts: bool,

        /// Optimizer budget per solve, in milliseconds
        #[arg(long = "time-limit", value_name = "MS")]
        time_limit_ms: Option<u64>,
    },

    /// Print FCFS schedules as JSON
    Simulate {
        /// Instances as a JSON array
        #[arg(short, long, conflicts_with = "preset")]
        input: Option<PathBuf>,

        /// Built-in instance (all built-ins when neither this nor --input is given)
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,
    },

    /// Print random instances as JSON
    Generate {
        /// Number of jobs
        #[arg(long, default_value_t = 5)]
        jobs: usize,

        /// Number of machines
        #[arg(long, default_value_t = 3)]
        machines: usize,

        /// Minimum operations per job (defaults to the machine count)
        #[arg(long)]
        min_ops: Option<usize>,

        /// Maximum operations per job (defaults to the machine count)
        #[arg(long)]
        max_ops: Option<usize>,

        /// Minimum processing time
        #[arg(long, default_value_t = 1)]
        min_duration: i64,

        /// Maximum processing time
        #[arg(long, default_value_t = 10)]
        max_duration: i64,

        /// Allow a job to revisit a machine
        #[arg(long)]
        recirculation: bool,

        /// Number of instances
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Instance name prefix
        #[arg(long, default_value = "random")]
        prefix: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    AssignmentJobs,
    CustomJobs,
    ThreeJobExample,
}

impl Preset {
    fn instance(self) -> Instance {
        match self {
            Preset::AssignmentJobs => presets::assignment_jobs(),
            Preset::CustomJobs => presets::custom_jobs(),
            Preset::ThreeJobExample => presets::three_job_example(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            config,
            out_dir,
            no_optimize,
            no_charts,
            time_limit_ms,
        } => {
            let mut run_config = match &config {
                Some(path) => read_json::<RunConfig>(path)?,
                None => RunConfig::default(),
            };
            if let Some(out_dir) = out_dir {
                run_config = run_config.with_out_dir(out_dir);
            }
            if no_optimize {
                run_config = run_config.with_optimize(false);
            }
            if no_charts {
                run_config = run_config.with_charts(false);
            }
            if let Some(time_limit_ms) = time_limit_ms {
                run_config = run_config.with_time_limit_ms(time_limit_ms);
            }

            let instances = match &input {
                Some(path) => read_json::<Vec<Instance>>(path)?,
                None => presets::default_instances(),
            };

            let optimizer = run_config.optimizer().context("invalid optimizer settings")?;
            let results = runner::run_all(&instances, &run_config, Some(&optimizer as &dyn ScheduleOptimizer))
                .context("scenario run failed")?;

            info!(
                instances = results.len(),
                out_dir = %run_config.out_dir.display(),
                "saved outputs"
            );
        }

        Commands::Simulate { input, preset } => {
            let instances = match (&input, preset) {
                (Some(path), _) => read_json::<Vec<Instance>>(path)?,
                (None, Some(preset)) => vec![preset.instance()],
                (None, None) => presets::default_instances(),
            };
            let schedules = simulate_batch(&instances);
            println!(
                "{}",
                serde_json::to_string_pretty(&schedules).context("failed to serialize schedules")?
            );
        }

        Commands::Generate {
            jobs,
            machines,
            min_ops,
            max_ops,
            min_duration,
            max_duration,
            recirculation,
            count,
            seed,
            prefix,
        } => {
            let generator = InstanceGenerator::new(jobs, machines)
                .with_ops_per_job(min_ops.unwrap_or(machines), max_ops.unwrap_or(machines))
                .with_durations(min_duration, max_duration)
                .with_recirculation(recirculation);

            let mut rng = SmallRng::seed_from_u64(seed);
            let instances = generator
                .generate_many(&prefix, count, &mut rng)
                .context("invalid generator settings")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&instances).context("failed to serialize instances")?
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
