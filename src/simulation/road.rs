//! Static road geometry.

use geo::{Coord, Line};

use super::params::{ConfigError, Params};

/// A straight multi-lane road bounded by two long border segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Horizontal center.
    pub center_x: f32,
    /// Total width.
    pub width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Left and right borders.
    pub borders: Vec<Line<f32>>,
}

impl Road {
    /// Builds the road described by `params`.
    pub fn new(params: &Params) -> Result<Self, ConfigError> {
        if params.lane_count == 0 || !(params.road_width > 0.0) {
            return Err(ConfigError::Invalid("road needs a positive width and lane count"));
        }

        let left = params.road_center_x - params.road_width / 2.0;
        let right = params.road_center_x + params.road_width / 2.0;
        let border = |x: f32| {
            Line::new(
                Coord {
                    x,
                    y: params.road_top,
                },
                Coord {
                    x,
                    y: params.road_bottom,
                },
            )
        };

        Ok(Self {
            center_x: params.road_center_x,
            width: params.road_width,
            lane_count: params.lane_count,
            borders: vec![border(left), border(right)],
        })
    }

    /// X coordinate of the left border.
    pub fn left(&self) -> f32 {
        self.center_x - self.width / 2.0
    }

    /// X coordinate of the right border.
    pub fn right(&self) -> f32 {
        self.center_x + self.width / 2.0
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// X coordinate of the center of `lane`, clamped to the last lane.
    pub fn lane_center(&self, lane: usize) -> f32 {
        let lane = lane.min(self.lane_count - 1);
        self.left() + self.lane_width() / 2.0 + lane as f32 * self.lane_width()
    }
}
