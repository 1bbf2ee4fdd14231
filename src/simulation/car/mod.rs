//! Car module containing car state, control policies and sensors.

mod car;
mod control;
mod sensor;

pub use car::*;

pub use control::{
    Command, ControlInputs, ControlMode, ai_command, assist_command, manual_command,
};
pub use sensor::{
    RAY_ANGLES, Ray, SensorArray, SensorReading, closenesses, collision_proximity, safe_direction,
};
