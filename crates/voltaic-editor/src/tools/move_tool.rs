use std::collections::BTreeSet;

use voltaic_canvas::SelectableRef;
use voltaic_core::geometry::Point;
use voltaic_core::Document;

use crate::tool::{
    ActionId, DatumKind, DatumValue, DispatchError, Tool, ToolArgs, ToolContext, ToolEvent,
    ToolResponse,
};
use crate::tools::shift_selection;

/// Drag the selected entities with the cursor. Left click commits, Escape
/// reverts. Pressing 'x' asks for an exact delta through a datum dialog;
/// the returned coordinate is applied and committed.
#[derive(Debug, Default)]
pub struct MoveTool {
    last: Option<Point>,
}

impl Tool for MoveTool {
    fn name(&self) -> &'static str {
        "Move"
    }

    fn is_specific(&self) -> bool {
        true
    }

    fn can_begin(&self, _doc: &Document, selection: &BTreeSet<SelectableRef>) -> bool {
        !selection.is_empty()
    }

    fn actions(&self) -> &'static [ActionId] {
        &[ActionId::Lmb, ActionId::Rmb, ActionId::Cancel]
    }

    fn begin(
        &mut self,
        _doc: &mut Document,
        args: &ToolArgs,
        _ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        self.last = Some(args.cursor);
        Ok(ToolResponse::nop())
    }

    fn update(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError> {
        match &args.event {
            ToolEvent::Move => {
                let last = self.last.unwrap_or(args.cursor);
                let delta = Point::new(args.cursor.x - last.x, args.cursor.y - last.y);
                shift_selection(doc, &ctx.selection, delta)?;
                self.last = Some(args.cursor);
                Ok(ToolResponse::nop())
            }
            ToolEvent::Action(ActionId::Lmb) => Ok(ToolResponse::commit()),
            ToolEvent::Action(ActionId::Rmb) | ToolEvent::Action(ActionId::Cancel) => {
                Ok(ToolResponse::revert())
            }
            ToolEvent::Key('x') => {
                ctx.ask_datum(DatumKind::Coordinate, "Move by exact delta", None);
                Ok(ToolResponse::nop())
            }
            ToolEvent::Data(DatumValue::Coordinate(delta)) => {
                shift_selection(doc, &ctx.selection, *delta)?;
                Ok(ToolResponse::commit())
            }
            ToolEvent::Data(_) => {
                ctx.flash("expected a coordinate");
                Ok(ToolResponse::nop())
            }
            _ => Ok(ToolResponse::nop()),
        }
    }
}
