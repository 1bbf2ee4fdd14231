//! Control modes and the per-mode steering policies.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Which policy steers a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Fully driven by the car's brain.
    #[default]
    Ai,
    /// Driven by external control inputs.
    Manual,
    /// External inputs blended with the brain as obstacles get close.
    AiAssist,
    /// Scripted obstacle moving at constant speed.
    Traffic,
}

impl ControlMode {
    /// Returns `true` for modes that read sensors.
    pub fn senses(self) -> bool {
        !matches!(self, ControlMode::Traffic)
    }
}

/// Directional input flags supplied by the caller each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Throttle.
    pub forward: bool,
    /// Brake.
    pub backward: bool,
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
}

impl ControlInputs {
    /// Steering in [-1, 1], positive turning left. Right wins when both are held.
    pub fn steering(self) -> f32 {
        if self.right {
            -1.0
        } else if self.left {
            1.0
        } else {
            0.0
        }
    }
}

/// Decision for a single tick, in units of the car's handling constants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    /// Steering in [-1, 1], multiplied by the steer rate.
    pub steer: f32,
    /// Multiple of the acceleration added to the speed.
    pub throttle: f32,
    /// Multiple of the acceleration removed from the speed.
    pub brake: f32,
}

const BRAKE_FACTOR: f32 = 2.0;
const ASSIST_BRAKE_PROXIMITY: f32 = 0.7;

fn ai_steer(outputs: &Array1<f32>) -> f32 {
    (outputs[0] - 0.5) * 2.0
}

fn ai_brakes(outputs: &Array1<f32>) -> bool {
    outputs[2] > 0.5
}

/// Maps brain outputs `[steer, throttle, brake]` to a command.
pub fn ai_command(outputs: &Array1<f32>) -> Command {
    Command {
        steer: ai_steer(outputs),
        throttle: if outputs[1] > 0.5 { 1.0 } else { 0.0 },
        brake: if ai_brakes(outputs) { BRAKE_FACTOR } else { 0.0 },
    }
}

/// Maps control inputs directly to a command.
pub fn manual_command(inputs: ControlInputs) -> Command {
    Command {
        steer: inputs.steering(),
        throttle: if inputs.forward { 1.0 } else { 0.0 },
        brake: if inputs.backward { BRAKE_FACTOR } else { 0.0 },
    }
}

/// Blends manual inputs with the brain's suggestion.
///
/// `proximity` is the share of steering handed to the brain. Throttle fades
/// by up to half as it grows, and above 0.7 the brain may brake on its own.
pub fn assist_command(inputs: ControlInputs, outputs: &Array1<f32>, proximity: f32) -> Command {
    let steer = inputs.steering() * (1.0 - proximity) + ai_steer(outputs) * proximity;

    let throttle = if inputs.forward {
        1.0 - proximity * 0.5
    } else {
        0.0
    };

    let mut brake = if inputs.backward { BRAKE_FACTOR } else { 0.0 };
    if proximity > ASSIST_BRAKE_PROXIMITY && ai_brakes(outputs) {
        brake += BRAKE_FACTOR;
    }

    Command {
        steer,
        throttle,
        brake,
    }
}
