//! Segment intersection and car-body geometry.
//!
//! All collision and sensing math goes through [`segment_intersection`], a
//! plain parametric line-segment test. Parallel or degenerate segments never
//! intersect.

use geo::{Coord, Line};

/// Corner points of an oriented car body, in drawing order.
pub type CarPolygon = [Coord<f32>; 4];

/// Intersects the segments `a` and `b`.
///
/// # Returns
///
/// The intersection point, or `None` if the segments are parallel
/// (including zero-length segments) or do not overlap within both extents.
pub fn segment_intersection(a: Line<f32>, b: Line<f32>) -> Option<Coord<f32>> {
    let (p1, p2, p3, p4) = (a.start, a.end, b.start, b.end);

    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return None;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(p1 + (p2 - p1) * ua)
    } else {
        None
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Coord<f32>, b: Coord<f32>) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Point reached by travelling `length` from `origin` along heading `angle`.
///
/// Heading 0 points towards negative y; positive angles turn left
/// (towards negative x).
pub fn project(origin: Coord<f32>, angle: f32, length: f32) -> Coord<f32> {
    Coord {
        x: origin.x - angle.sin() * length,
        y: origin.y - angle.cos() * length,
    }
}

/// Corners of a `width` × `height` rectangle centered on `center` and
/// rotated to `angle`.
pub fn car_polygon(center: Coord<f32>, angle: f32, width: f32, height: f32) -> CarPolygon {
    let rad = width.hypot(height) / 2.0;
    let alpha = width.atan2(height);
    let pi = std::f32::consts::PI;

    [
        project(center, angle - alpha, rad),
        project(center, angle + alpha, rad),
        project(center, pi + angle - alpha, rad),
        project(center, pi + angle + alpha, rad),
    ]
}

/// Closed edge loop of a polygon.
pub fn polygon_edges(polygon: &CarPolygon) -> impl Iterator<Item = Line<f32>> + '_ {
    (0..polygon.len()).map(|i| Line::new(polygon[i], polygon[(i + 1) % polygon.len()]))
}

/// Returns `true` if any polygon edge crosses `line`.
pub fn polygon_intersects_line(polygon: &CarPolygon, line: Line<f32>) -> bool {
    polygon_edges(polygon).any(|edge| segment_intersection(edge, line).is_some())
}

/// Returns `true` if any edge of `a` crosses any edge of `b`.
///
/// One polygon lying entirely inside the other does not count.
pub fn polygons_intersect(a: &CarPolygon, b: &CarPolygon) -> bool {
    polygon_edges(a).any(|edge| polygon_intersects_line(b, edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Line<f32> {
        Line::new(Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 })
    }

    #[test]
    fn crossing_segments_meet_in_the_middle() {
        let hit = segment_intersection(line(0.0, 0.0, 10.0, 10.0), line(0.0, 10.0, 10.0, 0.0));
        let hit = hit.expect("segments cross");
        assert!((hit.x - 5.0).abs() < 1e-5);
        assert!((hit.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn parallel_and_degenerate_segments_never_hit() {
        assert!(segment_intersection(line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.0, 10.0, 1.0)).is_none());
        // collinear overlap is still parallel
        assert!(segment_intersection(line(0.0, 0.0, 10.0, 0.0), line(5.0, 0.0, 15.0, 0.0)).is_none());
        assert!(segment_intersection(line(3.0, 3.0, 3.0, 3.0), line(0.0, 0.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn segments_that_would_cross_when_extended_do_not_hit() {
        assert!(segment_intersection(line(0.0, 0.0, 1.0, 1.0), line(0.0, 10.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn touching_endpoint_counts() {
        let hit = segment_intersection(line(0.0, 0.0, 5.0, 0.0), line(5.0, -5.0, 5.0, 5.0));
        assert!(hit.is_some());
    }

    #[test]
    fn upright_polygon_is_axis_aligned() {
        let polygon = car_polygon(Coord { x: 0.0, y: 0.0 }, 0.0, 30.0, 50.0);
        let xs: Vec<f32> = polygon.iter().map(|c| c.x.abs()).collect();
        let ys: Vec<f32> = polygon.iter().map(|c| c.y.abs()).collect();
        assert!(xs.iter().all(|x| (x - 15.0).abs() < 1e-4));
        assert!(ys.iter().all(|y| (y - 25.0).abs() < 1e-4));
    }

    #[test]
    fn overlapping_polygons_intersect() {
        let a = car_polygon(Coord { x: 0.0, y: 0.0 }, 0.0, 30.0, 50.0);
        let b = car_polygon(Coord { x: 20.0, y: 10.0 }, 0.0, 30.0, 50.0);
        let c = car_polygon(Coord { x: 100.0, y: 0.0 }, 0.0, 30.0, 50.0);
        assert!(polygons_intersect(&a, &b));
        assert!(!polygons_intersect(&a, &c));
    }
}
