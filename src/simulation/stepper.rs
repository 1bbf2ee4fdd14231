//! The per-tick driver of a simulation run.
//!
//! A tick updates every driving car against a frozen snapshot of the road
//! and traffic, then moves traffic, then handles the end of a generation.
//! Evolution always completes inside the tick that detected extinction.

use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use super::brain::{Brain, BrainError};
use super::car::{Car, ControlInputs, ControlMode};
use super::params::{ConfigError, Params};
use super::population::{Population, StatsSnapshot};
use super::road::Road;
use super::snapshot::ModelSnapshot;
use super::traffic;

/// A complete simulation run.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Parameters the run was built from.
    pub params: Params,
    /// Static road.
    pub road: Road,
    /// Driving cars.
    pub population: Population,
    /// Scripted obstacles.
    pub traffic: Vec<Car>,
    /// Ticks executed while running.
    pub ticks: u64,
    paused: bool,
    leader: Option<usize>,
    rng: StdRng,
}

impl Simulation {
    /// Builds a run from validated parameters.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = params.seeded_rng();
        let road = Road::new(&params)?;
        let population = Population::new(&params, &road, &mut rng);
        let traffic = traffic::spawn_traffic(&road, &params, &mut rng);

        Ok(Self {
            params,
            road,
            population,
            traffic,
            ticks: 0,
            paused: false,
            leader: None,
            rng,
        })
    }

    /// Tears the run down and rebuilds it from `params`.
    ///
    /// On error the current run is left untouched.
    pub fn reset(&mut self, params: Params) -> Result<(), ConfigError> {
        *self = Self::new(params)?;
        Ok(())
    }

    /// Advances the simulation by one tick and reports statistics.
    ///
    /// While paused nothing changes and the current statistics are returned.
    pub fn tick(&mut self, speed_multiplier: f32, controls: ControlInputs) -> StatsSnapshot {
        if self.paused {
            return self.stats();
        }
        self.ticks += 1;

        if let Some(player) = self.population.player_mut() {
            player.controls = controls;
        }

        let obstacles = traffic::obstacle_snapshot(&self.traffic);
        let borders = &self.road.borders;
        self.population
            .cars
            .par_iter_mut()
            .for_each(|car| car.update(borders, &obstacles, speed_multiplier));

        self.leader = self.population.leader();
        let reference_y = self.reference_y();
        for car in &mut self.traffic {
            car.update(&[], &[], speed_multiplier);
            traffic::respawn_if_passed(car, &self.road, reference_y, &self.params, &mut self.rng);
        }

        if self.leader.is_none() {
            match self.population.mode {
                ControlMode::Ai => self.population.next_generation(&mut self.rng),
                _ => {
                    debug!(ticks = self.ticks, "player crashed, restarting");
                    self.population.restart();
                }
            }
            self.respawn_traffic();
        }

        self.stats()
    }

    fn reference_y(&self) -> f32 {
        self.leader()
            .map_or(self.population.start.y, |leader| leader.pos.y)
    }

    fn respawn_traffic(&mut self) {
        self.traffic = traffic::spawn_traffic(&self.road, &self.params, &mut self.rng);
    }

    /// Current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.population.stats()
    }

    /// Pauses or resumes ticking.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The best undamaged car as of the last tick.
    pub fn leader(&self) -> Option<&Car> {
        self.leader.and_then(|i| self.population.cars.get(i))
    }

    /// Driving cars.
    pub fn cars(&self) -> &[Car] {
        &self.population.cars
    }

    /// Changes the traffic density and rebuilds the traffic.
    pub fn set_traffic_density(&mut self, density: f32) -> Result<(), ConfigError> {
        let params = Params {
            traffic_density: density,
            ..self.params.clone()
        };
        params.validate()?;
        self.params = params;
        self.respawn_traffic();
        Ok(())
    }

    /// Seeds the population with a persisted brain and restarts the run.
    ///
    /// The brain must have the driving topology; otherwise the population is
    /// left untouched.
    pub fn load_brain(&mut self, brain: Brain) -> Result<(), BrainError> {
        let brain = brain.expect_driver()?;
        self.population.install_brain(&brain, &mut self.rng);
        self.respawn_traffic();
        Ok(())
    }

    /// Seeds the population from a persisted brain record, substituting a
    /// random brain if the record is unusable.
    pub fn load_brain_json_or_random(&mut self, json: &str) {
        let brain = Brain::from_json_or_random(json, &mut self.rng);
        self.population.install_brain(&brain, &mut self.rng);
        self.respawn_traffic();
    }

    /// Snapshot of the all-time best brain, or of the current leader's brain
    /// before any generation has completed.
    pub fn export_best(&self, name: &str) -> Option<ModelSnapshot> {
        let (brain, score) = match self.population.best_brain() {
            Some(brain) => (brain, self.population.all_time_best()),
            None => {
                let leader = self.leader()?;
                (leader.brain.as_ref()?, leader.score)
            }
        };
        Some(ModelSnapshot::new(
            name,
            self.population.generation(),
            score,
            brain.clone(),
        ))
    }
}
