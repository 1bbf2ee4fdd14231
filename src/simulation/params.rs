use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::car::ControlMode;

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    /// The configuration file could not be read or written.
    #[error("configuration io error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for [`Params`].
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Heuristic that retires AI cars which stopped making progress.
///
/// A car is marked damaged once it has been alive for more than `ticks`
/// and is either slower than `min_speed` or has covered less than
/// `min_distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StallPolicy {
    /// Time alive (in ticks) after which the check applies.
    pub ticks: f32,
    /// Speed below which a car counts as stalled.
    pub min_speed: f32,
    /// Distance below which a car counts as stalled.
    pub min_distance: f32,
}

impl Default for StallPolicy {
    fn default() -> Self {
        Self {
            ticks: 200.0,
            min_speed: 0.2,
            min_distance: 20.0,
        }
    }
}

impl StallPolicy {
    /// Returns `true` if a car with this history should be retired.
    pub fn is_stalled(&self, time_alive: f32, speed: f32, distance: f32) -> bool {
        time_alive > self.ticks && (speed < self.min_speed || distance < self.min_distance)
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of AI cars per generation.
    pub population_size: usize,
    /// Control mode of the driven cars.
    pub control_mode: ControlMode,
    /// Base per-weight mutation probability.
    pub mutation_rate: f32,
    /// Maximum magnitude of a single weight perturbation.
    pub mutation_amount: f32,
    /// Lower bound of the random factor applied to `mutation_rate` per child.
    pub mutation_jitter_min: f32,
    /// Upper bound of the random factor applied to `mutation_rate` per child.
    pub mutation_jitter_max: f32,
    /// Fraction of the population selected as parents.
    pub selection_fraction: f32,
    /// Fraction of the parents copied unchanged into the next generation.
    pub elite_fraction: f32,
    /// Stall timeout for AI cars.
    pub stall: StallPolicy,

    /// Horizontal center of the road.
    pub road_center_x: f32,
    /// Total road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Y coordinate where the borders start (far ahead).
    pub road_top: f32,
    /// Y coordinate where the borders end (behind the start line).
    pub road_bottom: f32,

    /// Lane the driven cars start in.
    pub start_lane: usize,
    /// Y coordinate of the start line.
    pub start_y: f32,
    /// Car body width.
    pub car_width: f32,
    /// Car body length.
    pub car_height: f32,
    /// Top speed of driven cars.
    pub max_speed: f32,
    /// Top (and constant) speed of traffic.
    pub traffic_max_speed: f32,
    /// Speed gained per tick of throttle.
    pub acceleration: f32,
    /// Speed lost every tick.
    pub friction: f32,
    /// Turn rate at full steering deflection (radians per tick).
    pub steer_rate: f32,
    /// Length of each sensor ray.
    pub sensor_length: f32,

    /// Traffic density in percent of `base_traffic_count`.
    pub traffic_density: f32,
    /// Number of traffic cars at 100% density.
    pub base_traffic_count: usize,
    /// Distance between the start line and the first traffic car.
    pub traffic_first_offset: f32,
    /// Spacing between consecutive traffic cars.
    pub traffic_spacing: f32,
    /// Traffic further than this behind the reference car is respawned.
    pub traffic_respawn_behind: f32,
    /// Distance ahead of the reference car where traffic respawns.
    pub traffic_respawn_ahead: f32,

    /// Seed for the simulation random stream. `None` draws one from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 100,
            control_mode: ControlMode::Ai,
            mutation_rate: 0.1,
            mutation_amount: 0.3,
            mutation_jitter_min: 0.5,
            mutation_jitter_max: 2.0,
            selection_fraction: 0.2,
            elite_fraction: 0.1,
            stall: StallPolicy::default(),

            road_center_x: 400.0,
            road_width: 300.0,
            lane_count: 3,
            road_top: -100_000.0,
            road_bottom: 10_000.0,

            start_lane: 1,
            start_y: 100.0,
            car_width: 30.0,
            car_height: 50.0,
            max_speed: 3.0,
            traffic_max_speed: 2.0,
            acceleration: 0.2,
            friction: 0.05,
            steer_rate: 0.03,
            sensor_length: 150.0,

            traffic_density: 100.0,
            base_traffic_count: 50,
            traffic_first_offset: 300.0,
            traffic_spacing: 400.0,
            traffic_respawn_behind: 280.0,
            traffic_respawn_ahead: 520.0,

            rng_seed: None,
        }
    }
}

impl Params {
    /// Checks every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Invalid("population_size must be positive"));
        }
        if self.control_mode == ControlMode::Traffic {
            return Err(ConfigError::Invalid(
                "control_mode must be Ai, Manual or AiAssist",
            ));
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate < 1.0) {
            return Err(ConfigError::Invalid("mutation_rate must lie in (0, 1)"));
        }
        if !(self.mutation_amount >= 0.0) || !self.mutation_amount.is_finite() {
            return Err(ConfigError::Invalid("mutation_amount must be non-negative"));
        }
        if !(self.mutation_jitter_min >= 0.0 && self.mutation_jitter_min <= self.mutation_jitter_max)
        {
            return Err(ConfigError::Invalid(
                "mutation jitter range must satisfy 0 <= min <= max",
            ));
        }
        if !(self.selection_fraction > 0.0 && self.selection_fraction <= 1.0)
            || !(self.elite_fraction >= 0.0 && self.elite_fraction <= 1.0)
        {
            return Err(ConfigError::Invalid(
                "selection_fraction must lie in (0, 1] and elite_fraction in [0, 1]",
            ));
        }
        if self.lane_count == 0 || !(self.road_width > 0.0) {
            return Err(ConfigError::Invalid("road needs a positive width and lane count"));
        }
        if !(self.road_top < self.road_bottom) {
            return Err(ConfigError::Invalid("road_top must lie above road_bottom"));
        }
        if !(self.car_width > 0.0 && self.car_height > 0.0) {
            return Err(ConfigError::Invalid("car dimensions must be positive"));
        }
        if !(self.max_speed > 0.0 && self.traffic_max_speed >= 0.0) {
            return Err(ConfigError::Invalid("speeds must be positive"));
        }
        if self.acceleration < 0.0 || self.friction < 0.0 || self.steer_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "acceleration, friction and steer_rate must be non-negative",
            ));
        }
        if !(self.sensor_length > 0.0) {
            return Err(ConfigError::Invalid("sensor_length must be positive"));
        }
        if !(self.traffic_density >= 0.0) || !self.traffic_density.is_finite() {
            return Err(ConfigError::Invalid("traffic_density must be non-negative"));
        }
        if self.traffic_spacing < 0.0 || self.traffic_respawn_behind < 0.0 {
            return Err(ConfigError::Invalid("traffic distances must be non-negative"));
        }
        Ok(())
    }

    /// Number of traffic cars for the current density.
    pub fn traffic_count(&self) -> usize {
        (self.base_traffic_count as f32 * (self.traffic_density / 100.0)).floor() as usize
    }

    /// Builds the simulation random stream from `rng_seed`.
    pub fn seeded_rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
        assert_eq!(Params::default().traffic_count(), 50);
    }

    #[test]
    fn traffic_count_scales_with_density() {
        let params = Params {
            traffic_density: 250.0,
            ..Params::default()
        };
        assert_eq!(params.traffic_count(), 125);

        let params = Params {
            traffic_density: 0.0,
            ..Params::default()
        };
        assert_eq!(params.traffic_count(), 0);
    }

    #[test]
    fn stall_policy_only_after_timeout() {
        let stall = StallPolicy::default();
        assert!(!stall.is_stalled(150.0, 0.0, 0.0));
        assert!(stall.is_stalled(201.0, 0.1, 500.0));
        assert!(stall.is_stalled(201.0, 3.0, 10.0));
        assert!(!stall.is_stalled(201.0, 3.0, 500.0));
    }
}
