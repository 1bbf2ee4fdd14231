//! Car state, kinematics and damage.

use geo::{Coord, Line};
use ndarray::Array1;

use super::super::brain::{Activations, Brain};
use super::super::geometric_utils::{
    CarPolygon, car_polygon, distance, polygon_intersects_line, polygons_intersect,
};
use super::super::params::{Params, StallPolicy};
use super::control::{self, Command, ControlInputs, ControlMode};
use super::sensor::{self, SensorArray, SensorReading};

/// Weight of survival time in the fitness score.
pub const TIME_SCORE_WEIGHT: f32 = 0.1;

/// RGB color tag used by renderers.
pub type Color = [u8; 3];

/// Color of the player car in manual and assist modes.
pub const PLAYER_COLOR: Color = [0x00, 0xff, 0xff];
/// Palette traffic colors are drawn from.
pub const TRAFFIC_COLORS: [Color; 3] = [[0xff, 0x00, 0xff], [0xff, 0x00, 0x80], [0x80, 0x00, 0xff]];

/// Converts HSL (hue in degrees, saturation and lightness in percent) to RGB.
pub fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}

/// Color of the `index`-th AI car: a cyan-to-blue ramp that brightens.
pub fn population_color(index: usize) -> Color {
    let i = index as f32;
    hsl_color(180.0 + i * 5.0, 100.0, 50.0 + i)
}

/// A simulated car.
///
/// Driving cars own a brain and a sensor array; traffic cars carry neither
/// and only scroll forward.
#[derive(Debug, Clone)]
pub struct Car {
    /// Center position.
    pub pos: Coord<f32>,
    /// Heading in radians; 0 faces negative y.
    pub angle: f32,
    /// Current speed, within `[0, max_speed]` between ticks.
    pub speed: f32,
    /// Heading change applied per moving tick.
    pub angle_speed: f32,
    /// Body width.
    pub width: f32,
    /// Body length.
    pub height: f32,
    /// Top speed.
    pub max_speed: f32,
    /// Speed gained per tick of throttle.
    pub acceleration: f32,
    /// Speed lost every tick.
    pub friction: f32,
    /// Turn rate at full steering.
    pub steer_rate: f32,
    /// Policy steering this car.
    pub control_mode: ControlMode,
    /// Color tag for rendering.
    pub color: Color,
    /// Set on collision or stall; sticky until [`Car::reset`].
    pub damaged: bool,
    /// Fitness: distance traveled plus a tenth of the time alive.
    pub score: f32,
    /// Path length covered since the last reset.
    pub distance_traveled: f32,
    /// Ticks survived since the last reset, scaled by the speed multiplier.
    pub time_alive: f32,
    /// Ray sensors.
    pub sensors: SensorArray,
    /// Readings from the last cast, one per ray.
    pub readings: Vec<Option<SensorReading>>,
    /// Inputs applied in manual and assist modes.
    pub controls: ControlInputs,
    /// Danger level derived from the nearest reading (manual and assist only).
    pub collision_proximity: f32,
    /// Advisory escape heading relative to the car (manual and assist only).
    pub safe_direction: Option<f32>,
    /// Neural network steering the car.
    pub brain: Option<Brain>,
    /// Activations of the last forward pass.
    pub last_activations: Option<Activations>,
    /// Stall timeout for AI cars.
    pub stall: StallPolicy,
}

impl Car {
    /// Creates a driving car at rest, facing forward.
    pub fn driver(
        pos: Coord<f32>,
        control_mode: ControlMode,
        params: &Params,
        brain: Option<Brain>,
        color: Color,
    ) -> Self {
        Self {
            pos,
            angle: 0.0,
            speed: 0.0,
            angle_speed: 0.0,
            width: params.car_width,
            height: params.car_height,
            max_speed: params.max_speed,
            acceleration: params.acceleration,
            friction: params.friction,
            steer_rate: params.steer_rate,
            control_mode,
            color,
            damaged: false,
            score: 0.0,
            distance_traveled: 0.0,
            time_alive: 0.0,
            sensors: SensorArray::new(params.sensor_length),
            readings: Vec::new(),
            controls: ControlInputs::default(),
            collision_proximity: 0.0,
            safe_direction: None,
            brain,
            last_activations: None,
            stall: params.stall,
        }
    }

    /// Creates a traffic car already cruising at its constant speed.
    pub fn traffic(pos: Coord<f32>, params: &Params, color: Color) -> Self {
        Self {
            speed: params.traffic_max_speed,
            max_speed: params.traffic_max_speed,
            sensors: SensorArray::none(),
            ..Self::driver(pos, ControlMode::Traffic, params, None, color)
        }
    }

    /// Advances the car by one tick.
    ///
    /// `borders` and `obstacles` are a read-only snapshot of the world;
    /// only this car's own state changes. Damaged cars are left untouched.
    pub fn update(
        &mut self,
        borders: &[Line<f32>],
        obstacles: &[CarPolygon],
        speed_multiplier: f32,
    ) {
        if self.damaged {
            return;
        }

        self.time_alive += speed_multiplier;
        let start = self.pos;

        match self.control_mode {
            ControlMode::Ai => {
                self.move_forward();
                self.sense(borders, obstacles);
                let command = self.think().map(|outputs| control::ai_command(&outputs));
                self.apply(command.unwrap_or_default());
            }
            ControlMode::Manual => {
                self.move_forward();
                self.sense(borders, obstacles);
                self.apply(control::manual_command(self.controls));
                self.assess_danger();
            }
            ControlMode::AiAssist => {
                self.move_forward();
                self.sense(borders, obstacles);
                self.assess_danger();
                let command = match self.think() {
                    Some(outputs) => {
                        control::assist_command(self.controls, &outputs, self.collision_proximity)
                    }
                    None => control::manual_command(self.controls),
                };
                self.apply(command);
            }
            ControlMode::Traffic => {
                self.pos.y -= self.speed * speed_multiplier;
            }
        }

        self.distance_traveled += distance(start, self.pos);
        self.score = self.distance_traveled + self.time_alive * TIME_SCORE_WEIGHT;

        if !self.control_mode.senses() {
            return;
        }

        if self.assess_damage(borders, obstacles) {
            self.damaged = true;
        }

        if self.control_mode == ControlMode::Ai
            && self
                .stall
                .is_stalled(self.time_alive, self.speed, self.distance_traveled)
        {
            self.damaged = true;
        }
    }

    /// Applies friction, turns while rolling, and integrates the position.
    pub fn move_forward(&mut self) {
        self.speed = (self.speed - self.friction).clamp(0.0, self.max_speed);

        if self.speed > 0.5 {
            self.angle += self.angle_speed;
        }

        self.pos.x -= self.angle.sin() * self.speed;
        self.pos.y -= self.angle.cos() * self.speed;
    }

    fn sense(&mut self, borders: &[Line<f32>], obstacles: &[CarPolygon]) {
        self.readings = self.sensors.cast(self.pos, self.angle, borders, obstacles);
    }

    /// Brain inputs: every closeness followed by the normalized speed.
    pub fn brain_inputs(&self) -> Array1<f32> {
        sensor::closenesses(&self.readings)
            .chain(std::iter::once(self.speed / self.max_speed))
            .collect()
    }

    fn think(&mut self) -> Option<Array1<f32>> {
        let brain = self.brain.as_ref()?;
        let activations = brain.predict(&self.brain_inputs());
        let outputs = activations.outputs.clone();
        self.last_activations = Some(activations);
        Some(outputs)
    }

    fn apply(&mut self, command: Command) {
        self.angle_speed = command.steer * self.steer_rate;
        self.speed += self.acceleration * command.throttle;
        self.speed -= self.acceleration * command.brake;
        self.speed = self.speed.clamp(0.0, self.max_speed);
    }

    fn assess_danger(&mut self) {
        self.collision_proximity = sensor::collision_proximity(&self.readings);
        self.safe_direction = Some(sensor::safe_direction(&self.sensors.rays, &self.readings));
    }

    /// Oriented bounding rectangle of the car body.
    pub fn polygon(&self) -> CarPolygon {
        car_polygon(self.pos, self.angle, self.width, self.height)
    }

    /// Returns `true` if the body touches a border or an obstacle.
    pub fn assess_damage(&self, borders: &[Line<f32>], obstacles: &[CarPolygon]) -> bool {
        let polygon = self.polygon();

        borders
            .iter()
            .any(|border| polygon_intersects_line(&polygon, *border))
            || obstacles
                .iter()
                .any(|obstacle| polygons_intersect(&polygon, obstacle))
    }

    /// Returns the car to the start pose with a clean record.
    ///
    /// The brain is kept; callers swap it separately when evolving.
    pub fn reset(&mut self, pos: Coord<f32>) {
        self.pos = pos;
        self.angle = 0.0;
        self.speed = 0.0;
        self.angle_speed = 0.0;
        self.damaged = false;
        self.score = 0.0;
        self.distance_traveled = 0.0;
        self.time_alive = 0.0;
        self.readings.clear();
        self.controls = ControlInputs::default();
        self.collision_proximity = 0.0;
        self.safe_direction = None;
        self.last_activations = None;
    }

    /// Returns `true` while the car is still driving.
    pub fn is_alive(&self) -> bool {
        !self.damaged
    }
}
