//! Ray sensors.
//!
//! Each driving car carries seven rays fanned around its heading. A ray
//! reports the nearest border or obstacle edge it crosses as a closeness in
//! [0, 1], where 1 means contact and "no reading" means nothing within range.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use geo::{Coord, Line};

use super::super::geometric_utils::{CarPolygon, distance, polygon_edges, project, segment_intersection};

/// Ray angles relative to the heading: front, front diagonals, sides, rear diagonals.
pub const RAY_ANGLES: [f32; 7] = [
    0.0,
    FRAC_PI_4,
    -FRAC_PI_4,
    FRAC_PI_2,
    -FRAC_PI_2,
    3.0 * PI / 4.0,
    -3.0 * PI / 4.0,
];

/// A single sensor ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Angle relative to the car heading.
    pub angle: f32,
    /// Reach of the ray.
    pub length: f32,
}

/// The nearest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Where the ray hit.
    pub point: Coord<f32>,
    /// `1 - distance / length`.
    pub closeness: f32,
}

/// Fixed, ordered set of rays attached to a car.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorArray {
    /// Rays in [`RAY_ANGLES`] order.
    pub rays: Vec<Ray>,
}

impl SensorArray {
    /// Creates the standard seven-ray array with the given reach.
    pub fn new(length: f32) -> Self {
        Self {
            rays: RAY_ANGLES
                .iter()
                .map(|&angle| Ray { angle, length })
                .collect(),
        }
    }

    /// An array with no rays, carried by traffic.
    pub fn none() -> Self {
        Self { rays: Vec::new() }
    }

    /// Casts every ray from `origin` at `heading`.
    ///
    /// Returns one entry per ray, in ray order.
    pub fn cast(
        &self,
        origin: Coord<f32>,
        heading: f32,
        borders: &[Line<f32>],
        obstacles: &[CarPolygon],
    ) -> Vec<Option<SensorReading>> {
        self.rays
            .iter()
            .map(|ray| cast_ray(*ray, origin, heading, borders, obstacles))
            .collect()
    }
}

fn cast_ray(
    ray: Ray,
    origin: Coord<f32>,
    heading: f32,
    borders: &[Line<f32>],
    obstacles: &[CarPolygon],
) -> Option<SensorReading> {
    let segment = Line::new(origin, project(origin, heading + ray.angle, ray.length));

    let edges = borders
        .iter()
        .copied()
        .chain(obstacles.iter().flat_map(polygon_edges));

    let mut min_distance = ray.length;
    let mut hit = None;
    for edge in edges {
        if let Some(point) = segment_intersection(segment, edge) {
            let d = distance(origin, point);
            if d < min_distance {
                min_distance = d;
                hit = Some(point);
            }
        }
    }

    hit.map(|point| SensorReading {
        point,
        closeness: (1.0 - min_distance / ray.length).clamp(0.0, 1.0),
    })
}

/// Closeness per reading, 0 where nothing was detected.
pub fn closenesses(readings: &[Option<SensorReading>]) -> impl Iterator<Item = f32> + '_ {
    readings
        .iter()
        .map(|reading| reading.map_or(0.0, |r| r.closeness))
}

/// Collision proximity: the largest closeness raised to 1.5.
///
/// Stays low until something is quite near, then ramps quickly to 1.
pub fn collision_proximity(readings: &[Option<SensorReading>]) -> f32 {
    closenesses(readings).fold(0.0, f32::max).powf(1.5)
}

/// Suggested escape heading relative to the car, in radians.
///
/// Every ray pulls towards clearance and pushes away from blockage, with a
/// forward bias that fades as the front ray gets blocked. Missing readings
/// count as fully clear.
pub fn safe_direction(rays: &[Ray], readings: &[Option<SensorReading>]) -> f32 {
    let clearance_at = |i: usize| 1.0 - readings.get(i).copied().flatten().map_or(0.0, |r| r.closeness);

    let forward_bias = 0.5 * clearance_at(0);
    let mut vx = 0.0_f32.sin() * forward_bias;
    let mut vy = 0.0_f32.cos() * forward_bias;

    for (i, ray) in rays.iter().enumerate() {
        let clearance = clearance_at(i);
        let blockage = 1.0 - clearance;

        let attraction = clearance.powi(2);
        let repulsion = blockage.powi(2) * 2.0;

        vx += ray.angle.sin() * (attraction - repulsion);
        vy += ray.angle.cos() * (attraction - repulsion);
    }

    vx.atan2(vy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(closeness: f32) -> Option<SensorReading> {
        Some(SensorReading {
            point: Coord { x: 0.0, y: 0.0 },
            closeness,
        })
    }

    #[test]
    fn proximity_is_convex() {
        assert_eq!(collision_proximity(&[None, None]), 0.0);
        assert!((collision_proximity(&[reading(0.25), reading(1.0)]) - 1.0).abs() < 1e-6);
        assert!((collision_proximity(&[reading(0.25)]) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn open_road_points_straight_ahead() {
        let sensors = SensorArray::new(150.0);
        let readings = vec![None; 7];
        assert!(safe_direction(&sensors.rays, &readings).abs() < 1e-5);
    }

    #[test]
    fn blocked_left_side_points_right() {
        let sensors = SensorArray::new(150.0);
        // rays 1 (+45°) and 3 (+90°) are on the left
        let mut readings = vec![None; 7];
        readings[1] = reading(0.9);
        readings[3] = reading(0.9);
        assert!(safe_direction(&sensors.rays, &readings) < 0.0);
    }
}
