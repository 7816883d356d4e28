use voltaic_core::object::{Junction, ObjectId, Wire};
use voltaic_core::Document;

use crate::tool::{
    ActionId, DispatchError, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse,
};

/// Interactive wire drawing: every left click fixes the floating junction
/// and starts a new segment from it; right click finishes, committing if at
/// least one segment was drawn and chaining a fresh DrawWire.
#[derive(Debug, Default)]
pub struct DrawWireTool {
    /// Junction following the cursor.
    pending: Option<ObjectId>,
    /// Segment from the last fixed junction to the pending one.
    pending_wire: Option<ObjectId>,
    fixed_segments: usize,
}

impl Tool for DrawWireTool {
    fn name(&self) -> &'static str {
        "Draw wire"
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
        let mut junction = Junction::new(args.cursor);
        junction.layer = args.work_layer;
        self.pending = Some(doc.add_junction(junction));
        Ok(ToolResponse::nop())
    }

    fn update(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        _ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        let Some(pending) = self.pending else {
            return Ok(ToolResponse::revert());
        };
        match &args.event {
            ToolEvent::Move => {
                doc.junction_mut(&pending)?.position = args.cursor;
                Ok(ToolResponse::nop())
            }
            ToolEvent::Action(ActionId::Lmb) => {
                // Fix the floating junction; the preview segment (if any)
                // becomes permanent.
                if self.pending_wire.take().is_some() {
                    self.fixed_segments += 1;
                }
                let mut junction = Junction::new(args.cursor);
                junction.layer = args.work_layer;
                let next = doc.add_junction(junction);
                self.pending = Some(next);
                self.pending_wire = Some(doc.add_wire(Wire::new(pending, next, args.work_layer)));
                Ok(ToolResponse::nop())
            }
            ToolEvent::Action(ActionId::Rmb) => {
                if let Some(wire) = self.pending_wire.take() {
                    doc.remove_wire(&wire);
                }
                doc.remove_junction(&pending);
                self.pending = None;
                if self.fixed_segments > 0 {
                    Ok(ToolResponse::commit_then(ToolId::DrawWire))
                } else {
                    Ok(ToolResponse::revert())
                }
            }
            ToolEvent::Action(ActionId::Cancel) => Ok(ToolResponse::revert()),
            _ => Ok(ToolResponse::nop()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use voltaic_core::geometry::Point;

    fn dispatch(
        tool: &mut DrawWireTool,
        doc: &mut Document,
        args: ToolArgs,
    ) -> ToolResponse {
        let mut ctx = ToolContext::new(BTreeSet::new());
        tool.update(doc, &args, &mut ctx).unwrap()
    }

    #[test]
    fn test_wire_drawing_sequence() {
        let mut doc = Document::new("wires");
        let mut tool = DrawWireTool::default();
        let mut ctx = ToolContext::new(BTreeSet::new());

        tool.begin(&mut doc, &ToolArgs::moved(Point::new(0.0, 0.0), 0), &mut ctx)
            .unwrap();
        assert_eq!(doc.junctions.len(), 1);

        dispatch(
            &mut tool,
            &mut doc,
            ToolArgs::action(ActionId::Lmb, Point::new(10.0, 0.0), 0),
        );
        dispatch(
            &mut tool,
            &mut doc,
            ToolArgs::moved(Point::new(10.0, 10.0), 0),
        );
        dispatch(
            &mut tool,
            &mut doc,
            ToolArgs::action(ActionId::Lmb, Point::new(10.0, 10.0), 0),
        );
        // Finish: the floating junction and its preview segment are culled.
        let resp = dispatch(
            &mut tool,
            &mut doc,
            ToolArgs::action(ActionId::Rmb, Point::new(10.0, 10.0), 0),
        );
        assert_eq!(resp.result, crate::tool::ToolResult::Commit);
        assert_eq!(resp.next_tool, Some(ToolId::DrawWire));
        assert_eq!(doc.junctions.len(), 2);
        assert_eq!(doc.wires.len(), 1);
    }

    #[test]
    fn test_immediate_finish_reverts() {
        let mut doc = Document::new("wires");
        let mut tool = DrawWireTool::default();
        let mut ctx = ToolContext::new(BTreeSet::new());
        tool.begin(&mut doc, &ToolArgs::moved(Point::new(0.0, 0.0), 0), &mut ctx)
            .unwrap();
        let resp = dispatch(
            &mut tool,
            &mut doc,
            ToolArgs::action(ActionId::Rmb, Point::new(0.0, 0.0), 0),
        );
        assert_eq!(resp.result, crate::tool::ToolResult::Revert);
    }
}
