//! Chromosome manipulation utilities for the genetic algorithm.
//!
//! Provides random generation, single-point crossover and single-gene mutation.

use rand::prelude::*;

use crate::schema::{Chromosome, GENE_COUNT};

/// Random number generator wrapper for chromosome operations.
pub struct ChromosomeRng {
    rng: StdRng,
}

impl ChromosomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a chromosome with every gene uniform in [0, 1].
    pub fn random_chromosome(&mut self) -> Chromosome {
        Chromosome::new(std::array::from_fn(|_| self.random_gene()))
    }

    fn random_gene(&mut self) -> f32 {
        self.rng.gen_range(0.0..=1.0)
    }

    /// Pick a crossover point uniformly from `0..GENE_COUNT`.
    pub fn crossover_point(&mut self) -> usize {
        self.rng.gen_range(0..GENE_COUNT)
    }

    /// Single-point crossover at a random point.
    ///
    /// Returns both children and the crossover point used.
    pub fn crossover(
        &mut self,
        fittest: &Chromosome,
        second_fittest: &Chromosome,
    ) -> (Chromosome, Chromosome, usize) {
        let point = self.crossover_point();
        let (a, b) = crossover_at(fittest, second_fittest, point);
        (a, b, point)
    }

    /// With `probability`, replace one uniformly chosen gene by a fresh uniform value.
    ///
    /// Returns the index of the replaced gene.
    pub fn mutate(&mut self, chromosome: &mut Chromosome, probability: f32) -> Option<usize> {
        if self.rng.r#gen::<f32>() >= probability {
            return None;
        }
        let index = self.rng.gen_range(0..GENE_COUNT);
        let value = self.random_gene();
        chromosome.set_gene(index, value);
        Some(index)
    }
}

/// Single-point crossover at `point`.
///
/// Child A takes genes `[0, point)` from `p` and the rest from `q`; child B is
/// the complement. `point == 0` makes child A a copy of `q`, and
/// `point == GENE_COUNT` makes it a copy of `p`.
pub fn crossover_at(p: &Chromosome, q: &Chromosome, point: usize) -> (Chromosome, Chromosome) {
    let point = point.min(GENE_COUNT);
    let a = std::array::from_fn(|i| if i < point { p.gene(i) } else { q.gene(i) });
    let b = std::array::from_fn(|i| if i < point { q.gene(i) } else { p.gene(i) });
    (Chromosome::new(a), Chromosome::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn genes() -> impl Strategy<Value = [f32; GENE_COUNT]> {
        proptest::array::uniform4(0.0f32..=1.0f32)
    }

    #[test]
    fn test_random_chromosome_in_range() {
        let mut rng = ChromosomeRng::new(42);
        for _ in 0..100 {
            let chromosome = rng.random_chromosome();
            assert!(chromosome.genes().iter().all(|g| (0.0..=1.0).contains(g)));
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = ChromosomeRng::new(7);
        let mut b = ChromosomeRng::new(7);
        for _ in 0..10 {
            assert_eq!(a.random_chromosome(), b.random_chromosome());
            assert_eq!(a.crossover_point(), b.crossover_point());
        }
    }

    #[test]
    fn test_crossover_at_two() {
        let fittest = Chromosome::new([0.1, 0.2, 0.3, 0.4]);
        let second = Chromosome::new([0.9, 0.8, 0.7, 0.6]);
        let (a, b) = crossover_at(&fittest, &second, 2);
        assert_eq!(a.genes(), &[0.1, 0.2, 0.7, 0.6]);
        assert_eq!(b.genes(), &[0.9, 0.8, 0.3, 0.4]);
    }

    #[test]
    fn test_crossover_at_zero_swaps_parents() {
        let p = Chromosome::new([0.1, 0.2, 0.3, 0.4]);
        let q = Chromosome::new([0.9, 0.8, 0.7, 0.6]);
        let (a, b) = crossover_at(&p, &q, 0);
        assert_eq!(a, q);
        assert_eq!(b, p);
    }

    #[test]
    fn test_crossover_at_full_length_copies_parents() {
        let p = Chromosome::new([0.1, 0.2, 0.3, 0.4]);
        let q = Chromosome::new([0.9, 0.8, 0.7, 0.6]);
        let (a, b) = crossover_at(&p, &q, GENE_COUNT);
        assert_eq!(a, p);
        assert_eq!(b, q);
    }

    #[test]
    fn test_crossover_point_covers_all_indices() {
        let mut rng = ChromosomeRng::new(1);
        let mut seen = [false; GENE_COUNT];
        for _ in 0..200 {
            seen[rng.crossover_point()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_mutation_probability_bounds() {
        let mut rng = ChromosomeRng::new(3);
        let original = Chromosome::new([0.5; GENE_COUNT]);

        let mut never = original;
        for _ in 0..50 {
            assert_eq!(rng.mutate(&mut never, 0.0), None);
        }
        assert_eq!(never, original);

        let mut always = original;
        for _ in 0..50 {
            assert!(rng.mutate(&mut always, 1.0).is_some());
        }
    }

    proptest! {
        #[test]
        fn proptest_crossover_structure(p in genes(), q in genes(), point in 0usize..=GENE_COUNT) {
            let (p, q) = (Chromosome::new(p), Chromosome::new(q));
            let (a, b) = crossover_at(&p, &q, point);
            for i in 0..GENE_COUNT {
                if i < point {
                    prop_assert_eq!(a.gene(i), p.gene(i));
                    prop_assert_eq!(b.gene(i), q.gene(i));
                } else {
                    prop_assert_eq!(a.gene(i), q.gene(i));
                    prop_assert_eq!(b.gene(i), p.gene(i));
                }
            }
        }

        #[test]
        fn proptest_mutation_changes_at_most_one_gene(
            g in genes(),
            seed in any::<u64>(),
            probability in 0.0f32..=1.0,
        ) {
            let mut rng = ChromosomeRng::new(seed);
            let original = Chromosome::new(g);
            let mut mutated = original;
            let index = rng.mutate(&mut mutated, probability);

            let changed: Vec<usize> = (0..GENE_COUNT)
                .filter(|&i| mutated.gene(i) != original.gene(i))
                .collect();
            prop_assert!(changed.len() <= 1);
            if let Some(&i) = changed.first() {
                prop_assert_eq!(index, Some(i));
            }
            prop_assert!(mutated.genes().iter().all(|g| (0.0..=1.0).contains(g)));
        }
    }
}
