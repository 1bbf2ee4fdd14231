//! Car slots of one generation and their aggregate statistics.

use geo::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::brain::Brain;
use super::car::{Car, ControlMode, PLAYER_COLOR, population_color};
use super::evolution::GeneticAlgorithm;
use super::params::Params;
use super::road::Road;

/// Aggregate statistics reported after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Completed generations.
    pub generation: u32,
    /// Cars still driving.
    pub alive: usize,
    /// Car slots.
    pub total: usize,
    /// Highest current score.
    pub best_score: f32,
    /// Mean current score.
    pub avg_score: f32,
    /// Best score ever seen.
    pub all_time_best: f32,
}

/// Fixed set of car slots reused across generations.
///
/// In AI mode there are `population_size` slots; in manual and assist modes
/// a single player car.
#[derive(Debug, Clone)]
pub struct Population {
    /// Car slots, in stable order.
    pub cars: Vec<Car>,
    /// Evolution state.
    pub genetics: GeneticAlgorithm,
    /// Mode of every car in the population.
    pub mode: ControlMode,
    /// Where every car starts.
    pub start: Coord<f32>,
}

impl Population {
    /// Creates generation 0 with freshly randomized brains.
    pub fn new<R: Rng + ?Sized>(params: &Params, road: &Road, rng: &mut R) -> Self {
        let start = Coord {
            x: road.lane_center(params.start_lane),
            y: params.start_y,
        };
        let mode = params.control_mode;

        let cars = if mode == ControlMode::Ai {
            (0..params.population_size)
                .map(|i| {
                    Car::driver(
                        start,
                        mode,
                        params,
                        Some(Brain::driver(rng)),
                        population_color(i),
                    )
                })
                .collect()
        } else {
            vec![Car::driver(
                start,
                mode,
                params,
                Some(Brain::driver(rng)),
                PLAYER_COLOR,
            )]
        };

        Self {
            cars,
            genetics: GeneticAlgorithm::new(params),
            mode,
            start,
        }
    }

    /// Completed generations.
    pub fn generation(&self) -> u32 {
        self.genetics.generation
    }

    /// Best score ever seen.
    pub fn all_time_best(&self) -> f32 {
        self.genetics.all_time_best
    }

    /// Brain that achieved the best score ever seen.
    pub fn best_brain(&self) -> Option<&Brain> {
        self.genetics.best_brain.as_ref()
    }

    /// The player car in manual and assist modes.
    pub fn player_mut(&mut self) -> Option<&mut Car> {
        if self.mode == ControlMode::Ai {
            None
        } else {
            self.cars.first_mut()
        }
    }

    /// Number of undamaged cars.
    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|car| car.is_alive()).count()
    }

    /// Returns `true` once every car is damaged.
    pub fn is_extinct(&self) -> bool {
        self.cars.iter().all(|car| car.damaged)
    }

    /// Index of the best-scoring undamaged car; the first one on ties.
    pub fn leader(&self) -> Option<usize> {
        let mut leader: Option<(usize, f32)> = None;
        for (i, car) in self.cars.iter().enumerate() {
            if car.damaged {
                continue;
            }
            if leader.is_none_or(|(_, best)| car.score > best) {
                leader = Some((i, car.score));
            }
        }
        leader.map(|(i, _)| i)
    }

    /// Evolves the brains and restarts every slot at the start line.
    pub fn next_generation<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let brains = self.genetics.evolve(&self.cars, rng);
        for (car, brain) in self.cars.iter_mut().zip(brains) {
            car.brain = Some(brain);
            car.reset(self.start);
        }

        let stats = self.stats();
        info!(
            generation = stats.generation,
            all_time_best = stats.all_time_best,
            "generation complete"
        );
    }

    /// Puts every car back on the start line without evolving.
    pub fn restart(&mut self) {
        for car in &mut self.cars {
            car.reset(self.start);
        }
    }

    /// Installs `brain` and restarts the run.
    ///
    /// In AI mode the first slot gets the brain verbatim and every other slot
    /// a mutated clone; the player car simply takes it over.
    pub fn install_brain<R: Rng + ?Sized>(&mut self, brain: &Brain, rng: &mut R) {
        let (rate, amount) = (self.genetics.mutation_rate, self.genetics.mutation_amount);
        for (i, car) in self.cars.iter_mut().enumerate() {
            let mut copy = brain.clone();
            if i > 0 {
                copy.mutate(rate, amount, rng);
            }
            car.brain = Some(copy);
        }
        self.restart();
    }

    /// Aggregates the current scores.
    pub fn stats(&self) -> StatsSnapshot {
        let total = self.cars.len();
        let scores = self.cars.iter().map(|car| car.score);
        let best_score = scores.clone().fold(f32::NEG_INFINITY, f32::max);
        let sum: f32 = scores.sum();

        StatsSnapshot {
            generation: self.generation(),
            alive: self.alive_count(),
            total,
            best_score: if total == 0 { 0.0 } else { best_score },
            avg_score: if total == 0 { 0.0 } else { sum / total as f32 },
            all_time_best: self.all_time_best(),
        }
    }
}
