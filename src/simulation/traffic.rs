//! Scripted traffic: placement, obstacle snapshots and respawning.

use geo::Coord;
use rand::Rng;
use tracing::debug;

use super::car::{Car, TRAFFIC_COLORS};
use super::geometric_utils::CarPolygon;
use super::params::Params;
use super::road::Road;

/// Spawns the traffic for a fresh run, staggered ahead of the start line.
pub fn spawn_traffic<R: Rng + ?Sized>(road: &Road, params: &Params, rng: &mut R) -> Vec<Car> {
    (0..params.traffic_count())
        .map(|i| {
            let lane = rng.random_range(0..road.lane_count);
            let y = params.start_y - params.traffic_first_offset - i as f32 * params.traffic_spacing;
            let color = TRAFFIC_COLORS[rng.random_range(0..TRAFFIC_COLORS.len())];
            Car::traffic(
                Coord {
                    x: road.lane_center(lane),
                    y,
                },
                params,
                color,
            )
        })
        .collect()
}

/// Bodies of all undamaged traffic cars, frozen for one tick.
pub fn obstacle_snapshot(traffic: &[Car]) -> Vec<CarPolygon> {
    traffic
        .iter()
        .filter(|car| car.is_alive())
        .map(Car::polygon)
        .collect()
}

/// Moves a traffic car that fell too far behind `reference_y` into a random
/// lane ahead of it.
///
/// # Returns
///
/// `true` if the car was respawned.
pub fn respawn_if_passed<R: Rng + ?Sized>(
    car: &mut Car,
    road: &Road,
    reference_y: f32,
    params: &Params,
    rng: &mut R,
) -> bool {
    if car.pos.y <= reference_y + params.traffic_respawn_behind {
        return false;
    }

    let lane = rng.random_range(0..road.lane_count);
    car.pos = Coord {
        x: road.lane_center(lane),
        y: reference_y - params.traffic_respawn_ahead,
    };
    debug!(lane, y = car.pos.y, "respawned traffic car");
    true
}
