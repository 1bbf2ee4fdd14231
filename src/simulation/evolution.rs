//! Genetic search over car brains.
//!
//! Each generation the best fifth of the cars become parents. The top tenth
//! of those parents pass on unchanged; every other slot receives a mutated
//! clone of a random parent.

use rand::Rng;
use tracing::info;

use super::brain::Brain;
use super::car::Car;
use super::params::Params;

/// Selection, elitism and mutation state carried across generations.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    /// Number of brains produced per generation.
    pub population_size: usize,
    /// Base per-weight mutation probability.
    pub mutation_rate: f32,
    /// Maximum perturbation per mutated weight.
    pub mutation_amount: f32,
    /// Range of the random factor applied to `mutation_rate` per child.
    pub mutation_jitter: (f32, f32),
    /// Fraction of the population kept as parents.
    pub selection_fraction: f32,
    /// Fraction of the parents copied verbatim.
    pub elite_fraction: f32,
    /// Completed generations.
    pub generation: u32,
    /// Best score ever seen.
    pub all_time_best: f32,
    /// Copy of the brain that scored `all_time_best`.
    pub best_brain: Option<Brain>,
}

impl GeneticAlgorithm {
    /// Creates the search state for generation 0.
    pub fn new(params: &Params) -> Self {
        Self {
            population_size: params.population_size,
            mutation_rate: params.mutation_rate,
            mutation_amount: params.mutation_amount,
            mutation_jitter: (params.mutation_jitter_min, params.mutation_jitter_max),
            selection_fraction: params.selection_fraction,
            elite_fraction: params.elite_fraction,
            generation: 0,
            all_time_best: 0.0,
            best_brain: None,
        }
    }

    /// Number of parents selected each generation.
    pub fn parent_count(&self) -> usize {
        ((self.population_size as f32 * self.selection_fraction).ceil() as usize).max(1)
    }

    /// Number of parents copied unchanged, given how many were selected.
    pub fn elite_count(&self, parents: usize) -> usize {
        ((parents as f32 * self.elite_fraction).ceil() as usize).min(parents)
    }

    /// Returns the `count` highest-scoring cars, best first.
    ///
    /// Equal scores keep their original order.
    pub fn select_best(cars: &[Car], count: usize) -> Vec<&Car> {
        let mut ranked: Vec<&Car> = cars.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(count);
        ranked
    }

    /// Produces the brains of the next generation.
    ///
    /// The result always holds `population_size` brains. The caller assigns
    /// them to the car slots and resets the cars.
    pub fn evolve<R: Rng + ?Sized>(&mut self, cars: &[Car], rng: &mut R) -> Vec<Brain> {
        self.generation += 1;

        let parents = Self::select_best(cars, self.parent_count());
        let Some(champion) = parents.first() else {
            return (0..self.population_size)
                .map(|_| Brain::driver(rng))
                .collect();
        };

        if champion.score > self.all_time_best {
            self.all_time_best = champion.score;
            self.best_brain = champion.brain.clone();
            info!(
                generation = self.generation,
                score = self.all_time_best,
                "new all-time best"
            );
        }

        let mut brains: Vec<Brain> = Vec::with_capacity(self.population_size);

        for elite in parents.iter().take(self.elite_count(parents.len())) {
            if brains.len() == self.population_size {
                break;
            }
            brains.push(brain_of(elite, rng));
        }

        let (jitter_min, jitter_max) = self.mutation_jitter;
        while brains.len() < self.population_size {
            let parent = parents[rng.random_range(0..parents.len())];
            let mut child = brain_of(parent, rng);

            let rate = self.mutation_rate * (jitter_min + rng.random::<f32>() * (jitter_max - jitter_min));
            child.mutate(rate, self.mutation_amount, rng);

            brains.push(child);
        }

        brains
    }
}

fn brain_of<R: Rng + ?Sized>(car: &Car, rng: &mut R) -> Brain {
    car.brain.clone().unwrap_or_else(|| Brain::driver(rng))
}
