//! Spatial index for fast containment tests against a prepared boundary.

use geo::algorithm::kernels::{Kernel, Orientation, RobustKernel};
use geo::{BoundingRect, Coord, Line, MultiPolygon, Rect};
use rayon::prelude::*;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::models::ContainmentStatus;

/// Wrapper for R-tree indexing of one ring segment of the union
#[derive(Clone)]
struct IndexedEdge {
    start: Coord<f64>,
    end: Coord<f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedEdge {
    fn new(line: Line<f64>) -> Self {
        Self {
            start: line.start,
            end: line.end,
            envelope: AABB::from_corners([line.start.x, line.start.y], [line.end.x, line.end.y]),
        }
    }

    /// Point lies on the closed segment
    fn touches(&self, p: Coord<f64>) -> bool {
        let [min_x, min_y] = self.envelope.lower();
        let [max_x, max_y] = self.envelope.upper();
        p.x >= min_x
            && p.x <= max_x
            && p.y >= min_y
            && p.y <= max_y
            && RobustKernel::orient2d(self.start, self.end, p) == Orientation::Collinear
    }

    /// Segment crosses the horizontal ray from `p` towards +x.
    ///
    /// Half-open in y so a ray through a vertex is counted once.
    fn crosses_ray(&self, p: Coord<f64>) -> bool {
        let (a, b) = (self.start, self.end);
        if a.y <= p.y && b.y > p.y {
            RobustKernel::orient2d(a, b, p) == Orientation::CounterClockwise
        } else if a.y > p.y && b.y <= p.y {
            RobustKernel::orient2d(a, b, p) == Orientation::Clockwise
        } else {
            false
        }
    }
}

/// The unioned reference boundary with an R-tree over its ring segments.
///
/// A point is tested by counting the segments crossed by a ray cast to the
/// east, so only segments in the point's horizontal band are visited no
/// matter how many vertices the boundary has. Immutable once built, so it can
/// be shared across threads for concurrent tests. Polygons are closed: a point
/// on an edge or vertex (including the edge of a hole) is Inside.
pub struct PreparedBoundary {
    union: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
    edges: RTree<IndexedEdge>,
}

impl PreparedBoundary {
    pub(crate) fn build(union: MultiPolygon<f64>) -> Self {
        let edges: Vec<IndexedEdge> = union
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .flat_map(|ring| ring.lines())
            .filter(|line| line.start != line.end)
            .map(IndexedEdge::new)
            .collect();
        let edges = RTree::bulk_load(edges);
        debug!("Boundary index built with {} segments", edges.size());
        let bounds = union.bounding_rect();
        Self {
            union,
            bounds,
            edges,
        }
    }

    /// Test one lon/lat point
    pub fn test(&self, x: f64, y: f64) -> ContainmentStatus {
        let bounds = match self.bounds {
            Some(rect) => rect,
            None => return ContainmentStatus::Outside,
        };
        let (min, max) = (bounds.min(), bounds.max());
        if !(x >= min.x && x <= max.x && y >= min.y && y <= max.y) {
            return ContainmentStatus::Outside;
        }

        let p = Coord { x, y };
        let band = AABB::from_corners([x, y], [max.x, y]);

        let mut crossings = 0usize;
        for edge in self.edges.locate_in_envelope_intersecting(&band) {
            if edge.touches(p) {
                return ContainmentStatus::Inside;
            }
            if edge.crosses_ray(p) {
                crossings += 1;
            }
        }

        ContainmentStatus::from_contained(crossings % 2 == 1)
    }

    /// Test many points in parallel, preserving input order
    pub fn test_many(&self, points: &[(f64, f64)]) -> Vec<ContainmentStatus> {
        points.par_iter().map(|&(x, y)| self.test(x, y)).collect()
    }

    /// The unioned boundary geometry
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.union
    }

    /// Number of disjoint parts in the union
    pub fn part_count(&self) -> usize {
        self.union.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::{prepare, BoundaryGeometry};
    use geo::{polygon, Centroid, Intersects, LineString, Point, Polygon};
    use std::f64::consts::TAU;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        polygon![(x: min, y: min), (x: max, y: min), (x: max, y: max), (x: min, y: max), (x: min, y: min)]
    }

    fn prepared(parts: Vec<Polygon<f64>>) -> PreparedBoundary {
        prepare(&BoundaryGeometry::wgs84(parts)).unwrap()
    }

    #[test]
    fn test_centroid_inside_far_point_outside() {
        let poly = polygon![(x: 10.0, y: 20.0), (x: 11.0, y: 20.0), (x: 11.0, y: 21.0), (x: 10.0, y: 21.0), (x: 10.0, y: 20.0)];
        let centroid = poly.centroid().unwrap();
        let boundary = prepared(vec![poly]);

        assert_eq!(boundary.test(centroid.x(), centroid.y()), ContainmentStatus::Inside);
        assert_eq!(boundary.test(21.0, 31.0), ContainmentStatus::Outside);
    }

    #[test]
    fn test_boundary_points_are_inside() {
        let boundary = prepared(vec![square(0.0, 2.0)]);

        // On an edge
        assert_eq!(boundary.test(1.0, 0.0), ContainmentStatus::Inside);
        assert_eq!(boundary.test(2.0, 1.0), ContainmentStatus::Inside);
        // On a vertex
        assert_eq!(boundary.test(0.0, 0.0), ContainmentStatus::Inside);
        // Just outside
        assert_eq!(boundary.test(-1e-9, 1.0), ContainmentStatus::Outside);
    }

    #[test]
    fn test_hole_is_outside() {
        let exterior = square(0.0, 10.0).exterior().clone();
        let hole = square(4.0, 6.0).exterior().clone();
        let boundary = prepared(vec![Polygon::new(exterior, vec![hole])]);

        assert_eq!(boundary.test(5.0, 5.0), ContainmentStatus::Outside);
        // The hole's edge belongs to the polygon
        assert_eq!(boundary.test(4.0, 5.0), ContainmentStatus::Inside);
        assert_eq!(boundary.test(2.0, 2.0), ContainmentStatus::Inside);
    }

    #[test]
    fn test_multi_part_lookup() {
        let boundary = prepared(vec![square(0.0, 1.0), square(10.0, 11.0)]);
        assert_eq!(boundary.test(0.5, 0.5), ContainmentStatus::Inside);
        assert_eq!(boundary.test(10.5, 10.5), ContainmentStatus::Inside);
        assert_eq!(boundary.test(5.0, 5.0), ContainmentStatus::Outside);
    }

    #[test]
    fn test_adjacent_parts_shared_edge_is_inside() {
        // After union the shared edge is interior
        let boundary = prepared(vec![square(0.0, 1.0), polygon![
            (x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)
        ]]);
        assert_eq!(boundary.part_count(), 1);
        assert_eq!(boundary.test(1.0, 0.5), ContainmentStatus::Inside);
    }

    #[test]
    fn test_many_matches_single_tests() {
        let boundary = prepared(vec![square(0.0, 1.0)]);
        let points: Vec<(f64, f64)> = (0..100).map(|i| (i as f64 * 0.02, 0.5)).collect();
        let bulk = boundary.test_many(&points);
        let single: Vec<ContainmentStatus> = points.iter().map(|&(x, y)| boundary.test(x, y)).collect();
        assert_eq!(bulk, single);
    }

    #[test]
    fn test_ray_through_vertices_counts_once() {
        // Diamond: the ray from the center passes exactly through the east vertex
        let diamond = polygon![(x: 0.0, y: 1.0), (x: 1.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 2.0), (x: 0.0, y: 1.0)];
        let boundary = prepared(vec![diamond]);
        assert_eq!(boundary.test(1.0, 1.0), ContainmentStatus::Inside);
        assert_eq!(boundary.test(-0.5, 1.0), ContainmentStatus::Outside);
        assert_eq!(boundary.test(1.0, 0.0), ContainmentStatus::Inside);
        assert_eq!(boundary.test(0.4, 0.4), ContainmentStatus::Outside);
    }

    #[test]
    fn test_many_vertex_polygon_matches_exact_predicate() {
        let n = 10_000;
        let ring: LineString<f64> = (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                // Wobbly radius so the ring is not convex
                let r = 10.0 + (t * 7.0).sin();
                (r * t.cos(), r * t.sin())
            })
            .collect::<Vec<_>>()
            .into();
        let boundary = prepared(vec![Polygon::new(ring, vec![])]);
        let geometry = boundary.geometry();

        assert_eq!(boundary.test(0.0, 0.0), ContainmentStatus::Inside);
        assert_eq!(boundary.test(50.0, 50.0), ContainmentStatus::Outside);
        assert_eq!(boundary.test(10.5, 0.5), ContainmentStatus::Outside);

        // Vertices and edge midpoints of the prepared union are on the boundary
        let exterior = geometry.0[0].exterior();
        for line in exterior.lines().step_by(997) {
            assert_eq!(boundary.test(line.start.x, line.start.y), ContainmentStatus::Inside);
        }

        for i in 0..60 {
            for j in 0..60 {
                let x = -12.0 + i as f64 * 0.4 + 0.013;
                let y = -12.0 + j as f64 * 0.4 + 0.007;
                let expected = ContainmentStatus::from_contained(geometry.intersects(&Point::new(x, y)));
                assert_eq!(boundary.test(x, y), expected, "point ({}, {})", x, y);
            }
        }
    }
}
