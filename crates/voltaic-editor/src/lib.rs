//! Interactive editing core: modal tools driven through a single dispatcher
//! with snapshot-based undo.
//!
//! Every gesture runs as a tool between `begin` and a terminal response.
//! The dispatcher snapshots the document before `begin`; a commit pushes
//! that snapshot onto the undo stack, a revert restores it. Tools therefore
//! mutate the document freely and never implement their own rollback.

pub mod dispatcher;
pub mod tool;
pub mod tools;

pub use dispatcher::{EditorCore, EditorEvent};
pub use tool::{
    ActionId, DatumKind, DatumRequest, DatumValue, DispatchError, Tool, ToolArgs, ToolContext,
    ToolEvent, ToolId, ToolResponse, ToolResult,
};
pub use tools::make_tool;
