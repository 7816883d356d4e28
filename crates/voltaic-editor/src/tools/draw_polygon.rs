use voltaic_core::object::{ObjectId, PolyVertex, Polygon};
use voltaic_core::Document;

use crate::tool::{
    ActionId, DispatchError, Tool, ToolArgs, ToolContext, ToolEvent, ToolResponse,
};

/// Polygon drawing on the work layer: left clicks append vertices, the last
/// vertex tracks the cursor, right click closes the outline. A polygon needs
/// at least three fixed vertices to commit.
#[derive(Debug, Default)]
pub struct DrawPolygonTool {
    polygon: Option<ObjectId>,
}

impl Tool for DrawPolygonTool {
    fn name(&self) -> &'static str {
        "Draw polygon"
    }

    fn actions(&self) -> &'static [ActionId] {
        &[ActionId::Lmb, ActionId::Rmb, ActionId::Cancel]
    }

    fn begin(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        _ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        let mut polygon = Polygon::new(args.work_layer);
        // First fixed vertex plus the live vertex under the cursor.
        polygon.vertices.push(PolyVertex::new(args.cursor));
        polygon.vertices.push(PolyVertex::new(args.cursor));
        self.polygon = Some(doc.add_polygon(polygon));
        Ok(ToolResponse::nop())
    }

    fn update(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        let Some(id) = self.polygon else {
            return Ok(ToolResponse::revert());
        };
        match &args.event {
            ToolEvent::Move => {
                let poly = doc.polygon_mut(&id)?;
                if let Some(last) = poly.vertices.last_mut() {
                    last.position = args.cursor;
                }
                Ok(ToolResponse::nop())
            }
            ToolEvent::Action(ActionId::Lmb) => {
                let poly = doc.polygon_mut(&id)?;
                if let Some(last) = poly.vertices.last_mut() {
                    last.position = args.cursor;
                }
                poly.vertices.push(PolyVertex::new(args.cursor));
                Ok(ToolResponse::nop())
            }
            ToolEvent::Action(ActionId::Rmb) => {
                let poly = doc.polygon_mut(&id)?;
                // Drop the live vertex.
                poly.vertices.pop();
                if poly.vertex_count() >= 3 {
                    Ok(ToolResponse::commit())
                } else {
                    ctx.flash("polygon needs at least three vertices");
                    Ok(ToolResponse::revert())
                }
            }
            ToolEvent::Action(ActionId::Cancel) => Ok(ToolResponse::revert()),
            ToolEvent::LayerChange(layer) => {
                doc.polygon_mut(&id)?.layer = *layer;
                Ok(ToolResponse::nop())
            }
            _ => Ok(ToolResponse::nop()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use voltaic_core::geometry::Point;
    use crate::tool::ToolResult;

    #[test]
    fn test_polygon_commit_after_three_vertices() {
        let mut doc = Document::new("poly");
        let mut tool = DrawPolygonTool::default();
        let mut ctx = ToolContext::new(BTreeSet::new());

        tool.begin(&mut doc, &ToolArgs::moved(Point::new(0.0, 0.0), 2), &mut ctx)
            .unwrap();
        for p in [Point::new(10.0, 0.0), Point::new(10.0, 10.0)] {
            tool.update(&mut doc, &ToolArgs::action(ActionId::Lmb, p, 2), &mut ctx)
                .unwrap();
        }
        let resp = tool
            .update(
                &mut doc,
                &ToolArgs::action(ActionId::Rmb, Point::new(10.0, 10.0), 2),
                &mut ctx,
            )
            .unwrap();
        assert_eq!(resp.result, ToolResult::Commit);
        let poly = doc.polygons.values().next().unwrap();
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.layer, 2);
    }

    #[test]
    fn test_degenerate_polygon_flashes_and_reverts() {
        let mut doc = Document::new("poly");
        let mut tool = DrawPolygonTool::default();
        let mut ctx = ToolContext::new(BTreeSet::new());
        tool.begin(&mut doc, &ToolArgs::moved(Point::new(0.0, 0.0), 0), &mut ctx)
            .unwrap();
        let resp = tool
            .update(
                &mut doc,
                &ToolArgs::action(ActionId::Rmb, Point::new(5.0, 0.0), 0),
                &mut ctx,
            )
            .unwrap();
        assert_eq!(resp.result, ToolResult::Revert);
        assert!(ctx.take_flash().is_some());
    }
}
