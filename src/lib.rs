//! # Neurodrive - Evolving Neural Drivers
//!
//! A population of cars drives down an endless multi-lane road, each steered
//! by a small neural network. When every car has crashed, the best drivers
//! are selected and mutated into the next generation.
//!
//! ## Features
//!
//! - Feed-forward brains (8 inputs, 8 hidden, 3 outputs, sigmoid activation)
//! - Seven-ray distance sensors against road borders and traffic
//! - Exact segment-intersection collision detection
//! - Elitist mutation-only genetic search, reproducible from a seed
//! - AI, manual and AI-assisted control modes
//! - Brain and model snapshot serialization
//!
//! ## Core Modules
//!
//! - [`simulation::stepper`] - Tick loop and generation lifecycle
//! - [`simulation::car`] - Car state, sensors and control policies
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::evolution`] - Selection, elitism and mutation
//! - [`simulation::population`] - Car slots and statistics

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for car brains.
    pub mod brain;
    /// Cars, their sensors and control policies.
    pub mod car;
    /// Genetic search over brains.
    pub mod evolution;
    /// Segment intersection and car-body geometry.
    pub mod geometric_utils;
    /// Simulation parameters and configuration errors.
    pub mod params;
    /// Car slots of one generation.
    pub mod population;
    /// Static road geometry.
    pub mod road;
    /// Named brain snapshots.
    pub mod snapshot;
    /// Per-tick simulation driver.
    pub mod stepper;
    /// Scripted traffic.
    pub mod traffic;
}
