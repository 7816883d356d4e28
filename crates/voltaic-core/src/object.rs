use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;
use crate::layer::LayerId;

/// Unique object identifier.
pub type ObjectId = Uuid;

/// The kind of pickable entity a selectable reference points at. Polygons
/// expose three sub-entities (vertex, edge, arc center); everything else is
/// picked as a whole.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ObjectType {
    Junction,
    Wire,
    Track,
    Pad,
    Text,
    PolygonVertex,
    PolygonEdge,
    PolygonArcCenter,
}

impl ObjectType {
    pub const ALL: [ObjectType; 8] = [
        ObjectType::Junction,
        ObjectType::Wire,
        ObjectType::Track,
        ObjectType::Pad,
        ObjectType::Text,
        ObjectType::PolygonVertex,
        ObjectType::PolygonEdge,
        ObjectType::PolygonArcCenter,
    ];
}

/// A connection point. Wires and tracks reference junctions by id, so moving
/// a junction drags its attached segments along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: ObjectId,
    pub position: Point,
    pub layer: LayerId,
    /// Net pinned by the user or a connected pin; `None` means the net is
    /// derived purely from connectivity.
    pub net: Option<Uuid>,
}

impl Junction {
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            layer: 0,
            net: None,
        }
    }
}

/// A schematic wire segment between two junctions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: ObjectId,
    pub from: ObjectId,
    pub to: ObjectId,
    pub layer: LayerId,
    /// Derived by net propagation.
    pub net: Option<Uuid>,
}

impl Wire {
    pub fn new(from: ObjectId, to: ObjectId, layer: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            layer,
            net: None,
        }
    }
}

/// A copper track between two junctions, with a width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: ObjectId,
    pub from: ObjectId,
    pub to: ObjectId,
    pub width: f64,
    pub layer: LayerId,
    pub net: Option<Uuid>,
}

impl Track {
    pub fn new(from: ObjectId, to: ObjectId, width: f64, layer: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            width,
            layer,
            net: None,
        }
    }
}

/// A pad: a rotated rectangle with a fixed net assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub id: ObjectId,
    pub name: String,
    pub position: Point,
    pub half_w: f64,
    pub half_h: f64,
    /// Rotation in radians.
    pub angle: f64,
    pub layer: LayerId,
    pub net: Option<Uuid>,
}

impl Pad {
    pub fn new(name: &str, position: Point, half_w: f64, half_h: f64, layer: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            position,
            half_w,
            half_h,
            angle: 0.0,
            layer,
            net: None,
        }
    }
}

/// A free text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: ObjectId,
    pub position: Point,
    pub angle: f64,
    pub size: f64,
    pub layer: LayerId,
    pub contents: String,
}

impl Text {
    pub fn new(position: Point, contents: &str, layer: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            angle: 0.0,
            size: 1.5,
            layer,
            contents: contents.to_string(),
        }
    }
}

/// One polygon vertex. If `arc_center` is set, the edge from this vertex to
/// the next is an arc through that center instead of a straight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyVertex {
    pub position: Point,
    pub arc_center: Option<Point>,
}

impl PolyVertex {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            arc_center: None,
        }
    }
}

/// A closed polygon (plane outline, keepout, graphic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: ObjectId,
    pub layer: LayerId,
    pub vertices: Vec<PolyVertex>,
}

impl Polygon {
    pub fn new(layer: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            vertices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn points(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| v.position).collect()
    }
}

/// An electrical net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub id: Uuid,
    pub name: String,
}

impl Net {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }
}
