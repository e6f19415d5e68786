//! Operation-sequence chromosome and its genetic operators.
//!
//! A chromosome is a permutation with repetition of job ids: the k-th
//! occurrence of job `j` stands for operation `k` of job `j`. Any such
//! permutation decodes to a feasible schedule, so crossover and mutation
//! only have to preserve the per-job counts.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to job shop
//! scheduling with genetic algorithms"

use rand::seq::SliceRandom;
use rand::Rng;
use u_metaheur::ga::Individual;

use crate::models::{Instance, Schedule};

/// Operation sequence with its cached fitness (lower is better).
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSequence {
    /// Job ids in dispatch order.
    pub genes: Vec<usize>,
    /// Objective value of the decoded schedule.
    pub fitness: f64,
}

impl Individual for OperationSequence {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl OperationSequence {
    /// Wraps a gene vector; fitness is unknown until evaluated.
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
        }
    }

    /// Job 0's operations, then job 1's, and so on.
    pub fn job_by_job(instance: &Instance) -> Self {
        Self::new(
            instance
                .jobs()
                .iter()
                .flat_map(|job| std::iter::repeat(job.id()).take(job.len()))
                .collect(),
        )
    }

    /// A uniformly shuffled sequence.
    pub fn random<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        let mut sequence = Self::job_by_job(instance);
        sequence.genes.shuffle(rng);
        sequence
    }

    /// The start-time order of an existing schedule.
    ///
    /// Decoding the result reproduces any non-delay schedule exactly, e.g.
    /// an FCFS simulation.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut ops: Vec<_> = schedule.ops().iter().collect();
        ops.sort_by_key(|op| (op.start, op.machine_id, op.job_id, op.op_index));
        Self::new(ops.into_iter().map(|op| op.job_id).collect())
    }

    /// Whether every job appears exactly as often as it has operations.
    pub fn is_valid(&self, instance: &Instance) -> bool {
        let mut counts = vec![0usize; instance.num_jobs()];
        for &job_id in &self.genes {
            match counts.get_mut(job_id) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        instance.jobs().iter().all(|job| counts[job.id()] == job.len())
    }
}

/// Precedence-preserving order crossover (POX).
///
/// A random non-empty subset of jobs keeps its positions from one parent;
/// the remaining positions are filled with the other parent's genes in
/// order.
///
/// # Reference
/// Bierwirth et al. (1996)
pub fn pox_crossover<R: Rng>(
    p1: &OperationSequence,
    p2: &OperationSequence,
    num_jobs: usize,
    rng: &mut R,
) -> (OperationSequence, OperationSequence) {
    if num_jobs < 2 {
        return (
            OperationSequence::new(p1.genes.clone()),
            OperationSequence::new(p2.genes.clone()),
        );
    }

    let mut jobs: Vec<usize> = (0..num_jobs).collect();
    jobs.shuffle(rng);
    let keep = rng.random_range(1..num_jobs);
    let mut selected = vec![false; num_jobs];
    for &job in &jobs[..keep] {
        selected[job] = true;
    }

    (
        OperationSequence::new(pox_child(&p1.genes, &p2.genes, &selected)),
        OperationSequence::new(pox_child(&p2.genes, &p1.genes, &selected)),
    )
}

fn pox_child(template: &[usize], donor: &[usize], selected: &[bool]) -> Vec<usize> {
    let mut donor_genes = donor.iter().copied().filter(|&job| !selected[job]);
    template
        .iter()
        .map(|&job| {
            if selected[job] {
                job
            } else {
                donor_genes.next().unwrap_or(job)
            }
        })
        .collect()
}

/// Exchanges two random positions.
pub fn swap_mutation<R: Rng>(sequence: &mut OperationSequence, rng: &mut R) {
    let len = sequence.genes.len();
    if len < 2 {
        return;
    }
    let i = rng.random_range(0..len);
    let j = rng.random_range(0..len);
    sequence.genes.swap(i, j);
}

/// Moves one random gene to a random position.
pub fn insert_mutation<R: Rng>(sequence: &mut OperationSequence, rng: &mut R) {
    let len = sequence.genes.len();
    if len < 2 {
        return;
    }
    let from = rng.random_range(0..len);
    let to = rng.random_range(0..len);
    let gene = sequence.genes.remove(from);
    sequence.genes.insert(to, gene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::scheduler::simulate;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_job_by_job() {
        let instance = presets::three_job_example();
        let sequence = OperationSequence::job_by_job(&instance);
        assert_eq!(sequence.genes, vec![0, 0, 1, 1, 2]);
        assert_eq!(sequence.fitness, f64::INFINITY);
        assert!(sequence.is_valid(&instance));
    }

    #[test]
    fn test_from_fcfs_schedule() {
        let instance = presets::three_job_example();
        let sequence = OperationSequence::from_schedule(&simulate(&instance));
        // J0-0, J2-0 at t=0; J1-0 at 3; J0-1 at 4; J1-1 at 6.
        assert_eq!(sequence.genes, vec![0, 2, 1, 0, 1]);
    }

    #[test]
    fn test_is_valid() {
        let instance = presets::three_job_example();
        assert!(!OperationSequence::new(vec![0, 0, 1, 2]).is_valid(&instance));
        assert!(!OperationSequence::new(vec![0, 0, 1, 1, 7]).is_valid(&instance));
        assert!(OperationSequence::new(vec![2, 1, 0, 1, 0]).is_valid(&instance));
    }

    #[test]
    fn test_operators_keep_sequences_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        let instance = presets::custom_jobs();

        for _ in 0..200 {
            let p1 = OperationSequence::random(&instance, &mut rng);
            let p2 = OperationSequence::random(&instance, &mut rng);
            assert!(p1.is_valid(&instance));

            let (mut c1, mut c2) = pox_crossover(&p1, &p2, instance.num_jobs(), &mut rng);
            assert!(c1.is_valid(&instance));
            assert!(c2.is_valid(&instance));
            assert_eq!(c1.fitness, f64::INFINITY);

            swap_mutation(&mut c1, &mut rng);
            insert_mutation(&mut c2, &mut rng);
            assert!(c1.is_valid(&instance));
            assert!(c2.is_valid(&instance));
        }
    }

    #[test]
    fn test_pox_single_job_copies_parents() {
        let p1 = OperationSequence::new(vec![0, 0, 0]);
        let p2 = OperationSequence::new(vec![0, 0, 0]);
        let mut rng = SmallRng::seed_from_u64(1);
        let (c1, c2) = pox_crossover(&p1, &p2, 1, &mut rng);
        assert_eq!(c1.genes, p1.genes);
        assert_eq!(c2.genes, p2.genes);
    }
}
