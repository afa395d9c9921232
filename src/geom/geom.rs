use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree};

use crate::geom::BoundingBox;

/// Geometries holds the district shapes in canonical order, with an R-tree over their bounds.
///
/// The R-tree only prunes candidates; every answer is the one a linear scan
/// over `shapes` in order would give.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes have no bounds and are never matched.
    pub(crate) fn new(polygons: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                polygons.iter().enumerate()
                    .filter_map(|(i, polygon)| polygon.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
            shapes: polygons,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Bounding boxes intersecting the envelope, in no particular order.
    fn query(&self, envelope: &AABB<[f64; 2]>) -> impl Iterator<Item = &BoundingBox> {
        self.rtree.locate_in_envelope_intersecting(envelope)
    }

    /// Indices of shapes whose bounding box covers the point, in canonical order.
    fn candidates(&self, point: Point<f64>) -> Vec<usize> {
        let mut indices: Vec<usize> = self.query(&AABB::from_point([point.x(), point.y()]))
            .map(BoundingBox::idx)
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Index of the first shape (in canonical order) containing the point.
    /// Points on an edge or vertex count as contained; points inside a hole do not.
    pub(crate) fn first_containing(&self, point: Point<f64>) -> Option<usize> {
        if !point.x().is_finite() || !point.y().is_finite() {
            return None;
        }
        self.candidates(point).into_iter()
            .find(|&i| self.shapes[i].intersects(&point))
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    #[inline]
    pub(crate) fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|polygon| polygon.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }
}
