use voltaic_core::object::{Junction, ObjectId};
use voltaic_core::Document;

use crate::tool::{
    ActionId, DispatchError, Tool, ToolArgs, ToolContext, ToolEvent, ToolId, ToolResponse,
};

/// Place a single junction under the cursor. Left click commits and chains a
/// fresh instance so placements can be repeated; right click or Escape
/// reverts the floating junction.
#[derive(Debug, Default)]
pub struct PlaceJunctionTool {
    pending: Option<ObjectId>,
}

impl Tool for PlaceJunctionTool {
    fn name(&self) -> &'static str {
        "Place junction"
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
                doc.junction_mut(&pending)?.position = args.cursor;
                Ok(ToolResponse::commit_then(ToolId::PlaceJunction))
            }
            ToolEvent::Action(ActionId::Rmb) | ToolEvent::Action(ActionId::Cancel) => {
                Ok(ToolResponse::revert())
            }
            ToolEvent::LayerChange(layer) => {
                doc.junction_mut(&pending)?.layer = *layer;
                Ok(ToolResponse::nop())
            }
            _ => Ok(ToolResponse::nop()),
        }
    }
}
