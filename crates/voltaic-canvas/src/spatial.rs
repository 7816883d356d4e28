use rstar::{RTree, RTreeObject, AABB};

use voltaic_core::geometry::{BBox, Point};

/// An entry in the R-tree, referencing a selectable by its index in the
/// canvas arrays. The index is only valid until the next rebuild, which also
/// rebuilds this tree.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub selectable_index: usize,
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Spatial index over selectable bounding boxes, for hit-test and
/// drag-selection candidate culling.
#[derive(Debug, Default)]
pub struct SelectableIndex {
    tree: RTree<SpatialEntry>,
}

impl SelectableIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Candidates whose bounds come within `radius` of the point.
    pub fn query_point(&self, point: &Point, radius: f64) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners(
            [point.x - radius, point.y - radius],
            [point.x + radius, point.y + radius],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    /// Candidates whose bounds intersect the given region.
    pub fn query_region(&self, region: &BBox) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners(
            [region.min.x, region.min.y],
            [region.max.x, region.max.y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
