use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;
use crate::layer::LayerStack;
use crate::object::{
    Junction, Net, ObjectId, ObjectType, Pad, Polygon, Text, Track, Wire,
};

/// The canonical document: geometry plus electrical connectivity.
///
/// Object maps are `BTreeMap` so iteration order (and therefore everything
/// derived from it: selectable order, net propagation, JSON output) is
/// deterministic. Derived state (warnings, selectables) lives outside the
/// document; net assignments on wires/junctions/tracks are recomputed in
/// place by `net::propagate` and are deterministic functions of the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub layers: LayerStack,
    pub junctions: BTreeMap<ObjectId, Junction>,
    pub wires: BTreeMap<ObjectId, Wire>,
    pub tracks: BTreeMap<ObjectId, Track>,
    pub pads: BTreeMap<ObjectId, Pad>,
    pub texts: BTreeMap<ObjectId, Text>,
    pub polygons: BTreeMap<ObjectId, Polygon>,
    pub nets: BTreeMap<Uuid, Net>,
}

impl Document {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            layers: LayerStack::new(),
            junctions: BTreeMap::new(),
            wires: BTreeMap::new(),
            tracks: BTreeMap::new(),
            pads: BTreeMap::new(),
            texts: BTreeMap::new(),
            polygons: BTreeMap::new(),
            nets: BTreeMap::new(),
        }
    }

    // ── Insertion ────────────────────────────────────────────────────

    pub fn add_junction(&mut self, junction: Junction) -> ObjectId {
        let id = junction.id;
        self.junctions.insert(id, junction);
        id
    }

    pub fn add_wire(&mut self, wire: Wire) -> ObjectId {
        let id = wire.id;
        self.wires.insert(id, wire);
        id
    }

    pub fn add_track(&mut self, track: Track) -> ObjectId {
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    pub fn add_pad(&mut self, pad: Pad) -> ObjectId {
        let id = pad.id;
        self.pads.insert(id, pad);
        id
    }

    pub fn add_text(&mut self, text: Text) -> ObjectId {
        let id = text.id;
        self.texts.insert(id, text);
        id
    }

    pub fn add_polygon(&mut self, polygon: Polygon) -> ObjectId {
        let id = polygon.id;
        self.polygons.insert(id, polygon);
        id
    }

    pub fn add_net(&mut self, net: Net) -> Uuid {
        let id = net.id;
        self.nets.insert(id, net);
        id
    }

    // ── Typed accessors ──────────────────────────────────────────────
    //
    // These return `DocumentError::DanglingUuid` instead of panicking so a
    // tool referencing a stale uuid aborts cleanly.

    pub fn junction(&self, id: &ObjectId) -> Result<&Junction, DocumentError> {
        self.junctions.get(id).ok_or(DocumentError::DanglingUuid {
            kind: ObjectType::Junction,
            uuid: *id,
        })
    }

    pub fn junction_mut(&mut self, id: &ObjectId) -> Result<&mut Junction, DocumentError> {
        self.junctions
            .get_mut(id)
            .ok_or(DocumentError::DanglingUuid {
                kind: ObjectType::Junction,
                uuid: *id,
            })
    }

    pub fn wire(&self, id: &ObjectId) -> Result<&Wire, DocumentError> {
        self.wires.get(id).ok_or(DocumentError::DanglingUuid {
            kind: ObjectType::Wire,
            uuid: *id,
        })
    }

    pub fn track(&self, id: &ObjectId) -> Result<&Track, DocumentError> {
        self.tracks.get(id).ok_or(DocumentError::DanglingUuid {
            kind: ObjectType::Track,
            uuid: *id,
        })
    }

    pub fn pad_mut(&mut self, id: &ObjectId) -> Result<&mut Pad, DocumentError> {
        self.pads.get_mut(id).ok_or(DocumentError::DanglingUuid {
            kind: ObjectType::Pad,
            uuid: *id,
        })
    }

    pub fn text_mut(&mut self, id: &ObjectId) -> Result<&mut Text, DocumentError> {
        self.texts.get_mut(id).ok_or(DocumentError::DanglingUuid {
            kind: ObjectType::Text,
            uuid: *id,
        })
    }

    pub fn polygon(&self, id: &ObjectId) -> Result<&Polygon, DocumentError> {
        self.polygons
            .get(id)
            .ok_or(DocumentError::DanglingPolygon(*id))
    }

    pub fn polygon_mut(&mut self, id: &ObjectId) -> Result<&mut Polygon, DocumentError> {
        self.polygons
            .get_mut(id)
            .ok_or(DocumentError::DanglingPolygon(*id))
    }

    // ── Removal ──────────────────────────────────────────────────────

    /// Remove a junction together with any wires or tracks attached to it.
    pub fn remove_junction(&mut self, id: &ObjectId) -> Option<Junction> {
        let junction = self.junctions.remove(id)?;
        self.wires.retain(|_, w| w.from != *id && w.to != *id);
        self.tracks.retain(|_, t| t.from != *id && t.to != *id);
        Some(junction)
    }

    pub fn remove_wire(&mut self, id: &ObjectId) -> Option<Wire> {
        self.wires.remove(id)
    }

    pub fn remove_track(&mut self, id: &ObjectId) -> Option<Track> {
        self.tracks.remove(id)
    }

    pub fn remove_pad(&mut self, id: &ObjectId) -> Option<Pad> {
        self.pads.remove(id)
    }

    pub fn remove_text(&mut self, id: &ObjectId) -> Option<Text> {
        self.texts.remove(id)
    }

    pub fn remove_polygon(&mut self, id: &ObjectId) -> Option<Polygon> {
        self.polygons.remove(id)
    }

    pub fn object_count(&self) -> usize {
        self.junctions.len()
            + self.wires.len()
            + self.tracks.len()
            + self.pads.len()
            + self.texts.len()
            + self.polygons.len()
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_document_create() {
        let doc = Document::new("amplifier");
        assert_eq!(doc.name, "amplifier");
        assert_eq!(doc.object_count(), 0);
    }

    #[test]
    fn test_accessor_dangling_uuid() {
        let doc = Document::new("test");
        let err = doc.junction(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DocumentError::DanglingUuid { .. }));
    }

    #[test]
    fn test_polygon_accessor_dangling() {
        let mut doc = Document::new("test");
        let id = Uuid::new_v4();
        let err = doc.polygon_mut(&id).unwrap_err();
        assert!(matches!(err, DocumentError::DanglingPolygon(uuid) if uuid == id));
    }

    #[test]
    fn test_remove_junction_cascades() {
        let mut doc = Document::new("test");
        let a = doc.add_junction(Junction::new(Point::new(0.0, 0.0)));
        let b = doc.add_junction(Junction::new(Point::new(10.0, 0.0)));
        doc.add_wire(Wire::new(a, b, 0));
        assert_eq!(doc.wires.len(), 1);
        doc.remove_junction(&a);
        assert!(doc.wires.is_empty());
        assert_eq!(doc.junctions.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = Document::new("round_trip");
        let a = doc.add_junction(Junction::new(Point::new(1.0, 2.0)));
        let b = doc.add_junction(Junction::new(Point::new(3.0, 4.0)));
        doc.add_wire(Wire::new(a, b, 0));
        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(doc, restored);
    }
}
