//! Built-in instances and objective weight patterns.

use crate::models::Instance;

/// Builds a preset from literal routes.
///
/// # Panics
/// If a literal route below is malformed (a non-positive duration or a
/// negative machine). The routes are fixed, so this only fires on an edit
/// to this file, and the tests below build every preset.
fn preset(name: &str, jobs: Vec<Vec<(i64, i64)>>) -> Instance {
    match Instance::new(name, jobs) {
        Ok(instance) => instance,
        Err(err) => unreachable!("preset '{name}' is malformed: {err}"),
    }
}

/// Five jobs on three machines.
pub fn assignment_jobs() -> Instance {
    preset(
        "assignment_jobs",
        vec![
            vec![(0, 3), (1, 2), (2, 2)],
            vec![(0, 2), (2, 1), (1, 4)],
            vec![(1, 4), (2, 3)],
            vec![(1, 2), (0, 1), (2, 4)],
            vec![(2, 1), (0, 2), (1, 1)],
        ],
    )
}

/// Five jobs on three machines, mixing short and long operations so that
/// machines are contended.
pub fn custom_jobs() -> Instance {
    preset(
        "custom_jobs",
        vec![
            vec![(0, 2), (1, 5), (2, 2)],
            vec![(1, 2), (2, 4), (0, 2)],
            vec![(2, 3), (0, 4)],
            vec![(0, 3), (2, 1), (1, 2)],
            vec![(1, 4), (0, 1), (2, 3)],
        ],
    )
}

/// Three jobs on two machines; FCFS makespan is 7.
pub fn three_job_example() -> Instance {
    preset(
        "three_job_example",
        vec![vec![(0, 3), (1, 2)], vec![(0, 2), (1, 1)], vec![(1, 4)]],
    )
}

/// All built-in instances used by the default run.
pub fn default_instances() -> Vec<Instance> {
    vec![assignment_jobs(), custom_jobs()]
}

/// A labelled job-weight vector for the weighted-completion objective.
pub type WeightPattern = (String, Vec<i64>);

/// Three weight patterns for `num_jobs` jobs.
///
/// - `A_uniform`: every job weighs 1.
/// - `B_front_heavy`: the first jobs dominate.
/// - `C_middle_heavy`: jobs 2 and 3 dominate.
///
/// With fewer than five jobs the middle-heavy pattern has nothing to
/// emphasise and falls back to uniform weights.
pub fn weight_patterns(num_jobs: usize) -> Vec<WeightPattern> {
    let uniform = vec![1; num_jobs];

    if num_jobs < 5 {
        let front: Vec<i64> = (0..num_jobs).map(|j| if j == 0 { 3 } else { 1 }).collect();
        return vec![
            ("A_uniform".to_string(), uniform.clone()),
            ("B_front_heavy".to_string(), front),
            ("C_middle_heavy".to_string(), uniform),
        ];
    }

    let mut front = vec![5, 3, 1, 1, 1];
    front.resize(num_jobs, 1);
    let mut middle = vec![1, 1, 5, 3, 1];
    middle.resize(num_jobs, 1);

    vec![
        ("A_uniform".to_string(), uniform),
        ("B_front_heavy".to_string(), front),
        ("C_middle_heavy".to_string(), middle),
    ]
}
