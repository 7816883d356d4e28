use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use voltaic_core::geometry::{ObBox, Point};
use voltaic_core::layer::LayerId;
use voltaic_core::object::{ObjectId, ObjectType};
use voltaic_core::Document;

use crate::spatial::{SelectableIndex, SpatialEntry};

// Pick-target half extents (document units) for entities that have no
// intrinsic area of their own.
const JUNCTION_HALF: f64 = 0.1;
const WIRE_HALF: f64 = 0.05;
const VERTEX_HALF: f64 = 0.15;
const EDGE_HALF: f64 = 0.05;
const ARC_CENTER_EPS: f64 = 1e-6;

/// Flag bitset carried by every selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectableFlags(u8);

impl SelectableFlags {
    pub const SELECTED: u8 = 1 << 0;
    pub const PRELIGHT: u8 = 1 << 1;
    pub const HIGHLIGHT: u8 = 1 << 2;
    pub const ARC_CENTER_IS_MIDPOINT: u8 = 1 << 3;

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn toggle(&mut self, flag: u8) {
        self.0 ^= flag;
    }

    pub fn assign(&mut self, flag: u8, value: bool) {
        if value {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

/// Structural key identifying which document entity a selectable proxies.
/// `sub_index` distinguishes a vertex/edge/arc-center within one polygon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SelectableRef {
    pub object_type: ObjectType,
    pub object: ObjectId,
    pub layer: LayerId,
    pub sub_index: u32,
}

impl SelectableRef {
    pub fn whole(object_type: ObjectType, object: ObjectId, layer: LayerId) -> Self {
        Self {
            object_type,
            object,
            layer,
            sub_index: 0,
        }
    }
}

/// A hit-testable, flaggable proxy for one pickable document entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selectable {
    /// Reference point, used by the INCLUDE_ORIGIN drag qualifier.
    pub origin: Point,
    /// Oriented bounding box; doubles as the hit shape for non-arc entities.
    pub bbox: ObBox,
    /// Arc-center selectables hit-test as a circle of this radius about
    /// `origin` instead of the box.
    pub arc_radius: Option<f64>,
    pub flags: SelectableFlags,
}

impl Selectable {
    fn boxed(origin: Point, bbox: ObBox) -> Self {
        Self {
            origin,
            bbox,
            arc_radius: None,
            flags: SelectableFlags::default(),
        }
    }

    pub fn area(&self) -> f64 {
        self.bbox.area()
    }

    /// Point hit test, with the shape grown by `expand`.
    pub fn hit(&self, point: &Point, expand: f64) -> bool {
        match self.arc_radius {
            Some(r) => self.origin.distance_to(point) <= r + expand,
            None => self.bbox.contains_point(point, expand),
        }
    }
}

/// The full selectable array plus its parallel ref array and spatial index.
///
/// Rebuilt wholesale whenever the document changes; never partially patched,
/// so raw indices held by a tool or a drag gesture stay valid for one frame
/// and are re-derived after every rebuild. SELECTED and HIGHLIGHT survive a
/// rebuild for refs that still exist; PRELIGHT never does.
#[derive(Debug, Default)]
pub struct CanvasState {
    refs: Vec<SelectableRef>,
    selectables: Vec<Selectable>,
    index: SelectableIndex,
    generation: u64,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refs(&self) -> &[SelectableRef] {
        &self.refs
    }

    pub fn selectables(&self) -> &[Selectable] {
        &self.selectables
    }

    pub fn selectables_mut(&mut self) -> &mut [Selectable] {
        &mut self.selectables
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Monotonically incrementing "needs redraw" signal.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> &SelectableIndex {
        &self.index
    }

    pub fn get(&self, reference: &SelectableRef) -> Option<&Selectable> {
        self.position_of(reference).map(|i| &self.selectables[i])
    }

    pub fn position_of(&self, reference: &SelectableRef) -> Option<usize> {
        self.refs.binary_search(reference).ok()
    }

    /// The current set of SELECTED refs.
    pub fn selection(&self) -> BTreeSet<SelectableRef> {
        self.refs
            .iter()
            .zip(&self.selectables)
            .filter(|(_, s)| s.flags.contains(SelectableFlags::SELECTED))
            .map(|(r, _)| *r)
            .collect()
    }

    pub fn set_selection(&mut self, selection: &BTreeSet<SelectableRef>) {
        for (r, s) in self.refs.iter().zip(&mut self.selectables) {
            s.flags
                .assign(SelectableFlags::SELECTED, selection.contains(r));
        }
        self.generation += 1;
    }

    /// Record a flag mutation done through `selectables_mut`, so renderers
    /// comparing generations pick up the new flags. The dedicated setters
    /// advance the counter on their own.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    pub fn clear_flag(&mut self, flag: u8) {
        for s in &mut self.selectables {
            s.flags.clear(flag);
        }
        self.generation += 1;
    }

    pub fn set_flag(&mut self, reference: &SelectableRef, flag: u8, value: bool) {
        if let Some(i) = self.position_of(reference) {
            self.selectables[i].flags.assign(flag, value);
            self.generation += 1;
        }
    }

    /// Set HIGHLIGHT on exactly the selectables proxying the given objects
    /// (cross-probe from a remote editor).
    pub fn highlight_objects(&mut self, objects: &BTreeSet<ObjectId>) {
        for (r, s) in self.refs.iter().zip(&mut self.selectables) {
            s.flags
                .assign(SelectableFlags::HIGHLIGHT, objects.contains(&r.object));
        }
        self.generation += 1;
    }

    /// Full regeneration of the selectable array from the document.
    ///
    /// Walks the document's pickable objects: a polygon contributes one pair
    /// per vertex, per edge, and per arc center; every other object one
    /// pair. Output is sorted by ref so consecutive rebuilds of the same
    /// document are identical.
    pub fn rebuild(&mut self, doc: &Document) {
        let sticky = SelectableFlags::SELECTED | SelectableFlags::HIGHLIGHT;
        let carried: BTreeMap<SelectableRef, u8> = self
            .refs
            .iter()
            .zip(&self.selectables)
            .map(|(r, s)| (*r, s.flags.0 & sticky))
            .collect();

        let mut pairs: Vec<(SelectableRef, Selectable)> = Vec::new();

        for junction in doc.junctions.values() {
            if !doc.layers.is_pickable(junction.layer) {
                continue;
            }
            pairs.push((
                SelectableRef::whole(ObjectType::Junction, junction.id, junction.layer),
                Selectable::boxed(
                    junction.position,
                    ObBox::new(junction.position, JUNCTION_HALF, JUNCTION_HALF, 0.0),
                ),
            ));
        }

        for wire in doc.wires.values() {
            let (Ok(from), Ok(to)) = (doc.junction(&wire.from), doc.junction(&wire.to)) else {
                // Dangling segments are reported by net propagation.
                continue;
            };
            if !doc.layers.is_pickable(wire.layer) {
                continue;
            }
            let bbox = ObBox::from_segment(from.position, to.position, WIRE_HALF);
            pairs.push((
                SelectableRef::whole(ObjectType::Wire, wire.id, wire.layer),
                Selectable::boxed(bbox.center, bbox),
            ));
        }

        for track in doc.tracks.values() {
            let (Ok(from), Ok(to)) = (doc.junction(&track.from), doc.junction(&track.to)) else {
                continue;
            };
            if !doc.layers.is_pickable(track.layer) {
                continue;
            }
            let bbox = ObBox::from_segment(from.position, to.position, track.width / 2.0);
            pairs.push((
                SelectableRef::whole(ObjectType::Track, track.id, track.layer),
                Selectable::boxed(bbox.center, bbox),
            ));
        }

        for pad in doc.pads.values() {
            if !doc.layers.is_pickable(pad.layer) {
                continue;
            }
            pairs.push((
                SelectableRef::whole(ObjectType::Pad, pad.id, pad.layer),
                Selectable::boxed(
                    pad.position,
                    ObBox::new(pad.position, pad.half_w, pad.half_h, pad.angle),
                ),
            ));
        }

        for text in doc.texts.values() {
            if !doc.layers.is_pickable(text.layer) {
                continue;
            }
            let half_w = (text.contents.chars().count().max(1) as f64) * text.size * 0.3;
            pairs.push((
                SelectableRef::whole(ObjectType::Text, text.id, text.layer),
                Selectable::boxed(
                    text.position,
                    ObBox::new(text.position, half_w, text.size / 2.0, text.angle),
                ),
            ));
        }

        for polygon in doc.polygons.values() {
            if !doc.layers.is_pickable(polygon.layer) {
                continue;
            }
            let n = polygon.vertices.len();
            for (i, vertex) in polygon.vertices.iter().enumerate() {
                pairs.push((
                    SelectableRef {
                        object_type: ObjectType::PolygonVertex,
                        object: polygon.id,
                        layer: polygon.layer,
                        sub_index: i as u32,
                    },
                    Selectable::boxed(
                        vertex.position,
                        ObBox::new(vertex.position, VERTEX_HALF, VERTEX_HALF, 0.0),
                    ),
                ));
                if n < 2 {
                    continue;
                }
                let next = &polygon.vertices[(i + 1) % n];
                let edge_box =
                    ObBox::from_segment(vertex.position, next.position, EDGE_HALF);
                pairs.push((
                    SelectableRef {
                        object_type: ObjectType::PolygonEdge,
                        object: polygon.id,
                        layer: polygon.layer,
                        sub_index: i as u32,
                    },
                    Selectable::boxed(edge_box.center, edge_box),
                ));
                if let Some(center) = vertex.arc_center {
                    let radius = center.distance_to(&vertex.position);
                    let mut selectable = Selectable {
                        origin: center,
                        bbox: ObBox::new(center, radius, radius, 0.0),
                        arc_radius: Some(radius),
                        flags: SelectableFlags::default(),
                    };
                    let midpoint = vertex.position.midpoint(&next.position);
                    if center.distance_to(&midpoint) < ARC_CENTER_EPS {
                        selectable
                            .flags
                            .set(SelectableFlags::ARC_CENTER_IS_MIDPOINT);
                    }
                    pairs.push((
                        SelectableRef {
                            object_type: ObjectType::PolygonArcCenter,
                            object: polygon.id,
                            layer: polygon.layer,
                            sub_index: i as u32,
                        },
                        selectable,
                    ));
                }
            }
        }

        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        self.refs = pairs.iter().map(|(r, _)| *r).collect();
        self.selectables = pairs.into_iter().map(|(_, s)| s).collect();
        for (r, s) in self.refs.iter().zip(&mut self.selectables) {
            if let Some(saved) = carried.get(r) {
                s.flags.0 |= saved;
            }
        }

        self.index = SelectableIndex::build(
            self.selectables
                .iter()
                .enumerate()
                .map(|(i, s)| SpatialEntry {
                    selectable_index: i,
                    bbox: s.bbox.aabb(),
                })
                .collect(),
        );
        self.generation += 1;
        log::debug!("selectables rebuilt: {} entries", self.refs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_core::object::{Junction, PolyVertex, Polygon, Wire};

    fn sample_doc() -> Document {
        let mut doc = Document::new("test");
        let a = doc.add_junction(Junction::new(Point::new(0.0, 0.0)));
        let b = doc.add_junction(Junction::new(Point::new(10.0, 0.0)));
        doc.add_wire(Wire::new(a, b, 0));
        let mut poly = Polygon::new(0);
        poly.vertices = vec![
            PolyVertex::new(Point::new(0.0, 5.0)),
            PolyVertex::new(Point::new(5.0, 5.0)),
            PolyVertex::new(Point::new(5.0, 10.0)),
        ];
        doc.add_polygon(poly);
        doc
    }

    #[test]
    fn test_rebuild_counts() {
        let doc = sample_doc();
        let mut canvas = CanvasState::new();
        canvas.rebuild(&doc);
        // 2 junctions + 1 wire + 3 vertices + 3 edges.
        assert_eq!(canvas.len(), 9);
    }

    #[test]
    fn test_rebuild_deterministic() {
        let doc = sample_doc();
        let mut canvas = CanvasState::new();
        canvas.rebuild(&doc);
        let refs = canvas.refs().to_vec();
        let selectables = canvas.selectables().to_vec();
        canvas.rebuild(&doc);
        assert_eq!(canvas.refs(), refs.as_slice());
        assert_eq!(canvas.selectables(), selectables.as_slice());
    }

    #[test]
    fn test_rebuild_preserves_selected_clears_prelight() {
        let doc = sample_doc();
        let mut canvas = CanvasState::new();
        canvas.rebuild(&doc);
        let target = canvas.refs()[0];
        canvas.set_flag(&target, SelectableFlags::SELECTED, true);
        canvas.set_flag(&target, SelectableFlags::PRELIGHT, true);
        canvas.rebuild(&doc);
        let s = canvas.get(&target).unwrap();
        assert!(s.flags.contains(SelectableFlags::SELECTED));
        assert!(!s.flags.contains(SelectableFlags::PRELIGHT));
    }

    #[test]
    fn test_arc_center_selectable() {
        let mut doc = Document::new("arc");
        let mut poly = Polygon::new(0);
        let mut v0 = PolyVertex::new(Point::new(0.0, 0.0));
        // Center exactly at the edge midpoint: a semicircle.
        v0.arc_center = Some(Point::new(5.0, 0.0));
        poly.vertices = vec![
            v0,
            PolyVertex::new(Point::new(10.0, 0.0)),
            PolyVertex::new(Point::new(5.0, 8.0)),
        ];
        let id = doc.add_polygon(poly);
        let mut canvas = CanvasState::new();
        canvas.rebuild(&doc);
        let arc_ref = SelectableRef {
            object_type: ObjectType::PolygonArcCenter,
            object: id,
            layer: 0,
            sub_index: 0,
        };
        let s = canvas.get(&arc_ref).unwrap();
        assert_eq!(s.arc_radius, Some(5.0));
        assert!(s.flags.contains(SelectableFlags::ARC_CENTER_IS_MIDPOINT));
        // Arc selectables hit on the circle, not the center.
        assert!(s.hit(&Point::new(5.0, 4.9), 0.2));
    }

    #[test]
    fn test_invisible_layer_skipped() {
        let mut doc = sample_doc();
        doc.layers.add_layer(voltaic_core::Layer::new(0, "sheet"));
        let mut canvas = CanvasState::new();
        canvas.rebuild(&doc);
        assert_eq!(canvas.len(), 9);
        doc.layers.toggle_visibility(0);
        canvas.rebuild(&doc);
        assert_eq!(canvas.len(), 0);
    }
}
