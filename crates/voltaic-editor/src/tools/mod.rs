//! Concrete tool implementations. Each tool is a small state machine owning
//! only the transient data of one gesture; reverting is always "restore the
//! pre-begin snapshot", so tools mutate the document freely.

mod delete;
mod draw_polygon;
mod draw_wire;
mod move_tool;
mod place_junction;

pub use delete::DeleteTool;
pub use draw_polygon::DrawPolygonTool;
pub use draw_wire::DrawWireTool;
pub use move_tool::MoveTool;
pub use place_junction::PlaceJunctionTool;

use std::collections::BTreeSet;

use voltaic_canvas::SelectableRef;
use voltaic_core::geometry::Point;
use voltaic_core::object::{ObjectId, ObjectType};
use voltaic_core::{Document, DocumentError};

use crate::tool::{Tool, ToolId};

/// Factory: the single place mapping tool ids to instances.
pub fn make_tool(id: ToolId) -> Box<dyn Tool> {
    match id {
        ToolId::DrawWire => Box::new(DrawWireTool::default()),
        ToolId::DrawPolygon => Box::new(DrawPolygonTool::default()),
        ToolId::Move => Box::new(MoveTool::default()),
        ToolId::Delete => Box::new(DeleteTool::default()),
        ToolId::PlaceJunction => Box::new(PlaceJunctionTool::default()),
    }
}

/// Translate everything the selection refers to by `delta`, each underlying
/// entity exactly once (a wire and both its junctions may be selected
/// together; selecting a wire moves its endpoints).
pub(crate) fn shift_selection(
    doc: &mut Document,
    selection: &BTreeSet<SelectableRef>,
    delta: Point,
) -> Result<(), DocumentError> {
    let mut junctions: BTreeSet<ObjectId> = BTreeSet::new();
    let mut pads: BTreeSet<ObjectId> = BTreeSet::new();
    let mut texts: BTreeSet<ObjectId> = BTreeSet::new();
    let mut vertices: BTreeSet<(ObjectId, usize)> = BTreeSet::new();
    let mut arc_centers: BTreeSet<(ObjectId, usize)> = BTreeSet::new();

    for r in selection {
        match r.object_type {
            ObjectType::Junction => {
                junctions.insert(r.object);
            }
            ObjectType::Wire => {
                let wire = doc.wire(&r.object)?;
                junctions.insert(wire.from);
                junctions.insert(wire.to);
            }
            ObjectType::Track => {
                let track = doc.track(&r.object)?;
                junctions.insert(track.from);
                junctions.insert(track.to);
            }
            ObjectType::Pad => {
                pads.insert(r.object);
            }
            ObjectType::Text => {
                texts.insert(r.object);
            }
            ObjectType::PolygonVertex => {
                vertices.insert((r.object, r.sub_index as usize));
            }
            ObjectType::PolygonEdge => {
                let n = doc.polygon(&r.object)?.vertex_count();
                let i = r.sub_index as usize;
                vertices.insert((r.object, i));
                vertices.insert((r.object, (i + 1) % n));
                // An arc on the moved edge travels with it.
                arc_centers.insert((r.object, i));
            }
            ObjectType::PolygonArcCenter => {
                arc_centers.insert((r.object, r.sub_index as usize));
            }
        }
    }

    for id in &junctions {
        let j = doc.junction_mut(id)?;
        j.position = j.position.translate(delta.x, delta.y);
    }
    for id in &pads {
        let p = doc.pad_mut(id)?;
        p.position = p.position.translate(delta.x, delta.y);
    }
    for id in &texts {
        let t = doc.text_mut(id)?;
        t.position = t.position.translate(delta.x, delta.y);
    }
    for (id, index) in &vertices {
        let poly = doc.polygon_mut(id)?;
        let vertex = poly
            .vertices
            .get_mut(*index)
            .ok_or(DocumentError::VertexOutOfRange {
                uuid: *id,
                index: *index,
            })?;
        vertex.position = vertex.position.translate(delta.x, delta.y);
    }
    for (id, index) in &arc_centers {
        let poly = doc.polygon_mut(id)?;
        let vertex = poly
            .vertices
            .get_mut(*index)
            .ok_or(DocumentError::VertexOutOfRange {
                uuid: *id,
                index: *index,
            })?;
        if let Some(center) = &mut vertex.arc_center {
            *center = center.translate(delta.x, delta.y);
        }
    }
    Ok(())
}
