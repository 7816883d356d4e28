use std::collections::BTreeSet;

use voltaic_canvas::SelectableRef;
use voltaic_core::object::{ObjectId, ObjectType};
use voltaic_core::Document;

use crate::tool::{
    ActionId, DispatchError, Tool, ToolArgs, ToolContext, ToolEvent, ToolResponse,
};

/// One-shot deletion of the current selection. The whole gesture happens in
/// `begin`; there is nothing to track afterwards, so `update` only answers a
/// stray cancel.
///
/// Sub-entity rules: a selected polygon vertex removes just that vertex, and
/// the polygon itself once fewer than three remain. A selected edge or arc
/// center takes the whole polygon with it.
#[derive(Debug, Default)]
pub struct DeleteTool;

impl Tool for DeleteTool {
    fn name(&self) -> &'static str {
        "Delete"
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, _doc: &Document, selection: &BTreeSet<SelectableRef>) -> bool {
        !selection.is_empty()
    }

    fn actions(&self) -> &'static [ActionId] {
        &[]
    }

    fn begin(
        &mut self,
        doc: &mut Document,
        _args: &ToolArgs,
        ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        if ctx.selection.is_empty() {
            return Ok(ToolResponse::end());
        }

        let mut junctions: BTreeSet<ObjectId> = BTreeSet::new();
        let mut wires: BTreeSet<ObjectId> = BTreeSet::new();
        let mut tracks: BTreeSet<ObjectId> = BTreeSet::new();
        let mut pads: BTreeSet<ObjectId> = BTreeSet::new();
        let mut texts: BTreeSet<ObjectId> = BTreeSet::new();
        let mut polygons: BTreeSet<ObjectId> = BTreeSet::new();
        // Vertex indices to strip, highest first so removal keeps the
        // remaining indices stable.
        let mut vertices: BTreeSet<(ObjectId, usize)> = BTreeSet::new();

        for r in &ctx.selection {
            match r.object_type {
                ObjectType::Junction => {
                    junctions.insert(r.object);
                }
                ObjectType::Wire => {
                    wires.insert(r.object);
                }
                ObjectType::Track => {
                    tracks.insert(r.object);
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
                ObjectType::PolygonEdge | ObjectType::PolygonArcCenter => {
                    polygons.insert(r.object);
                }
            }
        }

        for id in &wires {
            doc.remove_wire(id);
        }
        for id in &tracks {
            doc.remove_track(id);
        }
        for id in &pads {
            doc.remove_pad(id);
        }
        for id in &texts {
            doc.remove_text(id);
        }
        // Junctions cascade onto any wires and tracks still attached.
        for id in &junctions {
            doc.remove_junction(id);
        }
        for (id, index) in vertices.iter().rev() {
            if polygons.contains(id) {
                continue;
            }
            // The polygon may already be gone (its junctions were not
            // involved, but a previous vertex removal may have dropped it).
            let Ok(poly) = doc.polygon_mut(id) else {
                continue;
            };
            if *index < poly.vertices.len() {
                poly.vertices.remove(*index);
            }
            if poly.vertex_count() < 3 {
                polygons.insert(*id);
            }
        }
        for id in &polygons {
            doc.remove_polygon(id);
        }

        ctx.selection.clear();
        log::debug!("delete: removed selection");
        Ok(ToolResponse::commit())
    }

    fn update(
        &mut self,
        _doc: &mut Document,
        args: &ToolArgs,
        _ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        match &args.event {
            ToolEvent::Action(ActionId::Cancel) => Ok(ToolResponse::revert()),
            _ => Ok(ToolResponse::nop()),
        }
    }
}
