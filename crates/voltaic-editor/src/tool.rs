use std::collections::BTreeSet;

use thiserror::Error;

use voltaic_canvas::SelectableRef;
use voltaic_core::geometry::Point;
use voltaic_core::layer::LayerId;
use voltaic_core::{Document, DocumentError};

/// Errors surfaced by tool dispatch. Document errors unwind from a tool to
/// the dispatcher, which restores the pre-begin snapshot before
/// propagating.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("tool '{0}' is already active")]
    ToolConflict(&'static str),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Discrete input actions a tool may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionId {
    Lmb,
    Rmb,
    Cancel,
}

/// A value returned from a modal datum dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DatumValue {
    Coordinate(Point),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatumKind {
    Coordinate,
    Number,
}

/// A tool's request for a modal dialog. The dispatcher forwards it to the
/// host; the dialog's result comes back later as a `ToolEvent::Data`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumRequest {
    pub kind: DatumKind,
    pub prompt: String,
    pub default: Option<DatumValue>,
}

/// The events routed to the active tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    Move,
    Action(ActionId),
    LayerChange(LayerId),
    Key(char),
    /// Result of a previously requested datum dialog.
    Data(DatumValue),
}

/// Per-dispatch arguments. Constructed fresh for every event and never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct ToolArgs {
    pub event: ToolEvent,
    pub cursor: Point,
    pub work_layer: LayerId,
}

impl ToolArgs {
    pub fn moved(cursor: Point, work_layer: LayerId) -> Self {
        Self {
            event: ToolEvent::Move,
            cursor,
            work_layer,
        }
    }

    pub fn action(action: ActionId, cursor: Point, work_layer: LayerId) -> Self {
        Self {
            event: ToolEvent::Action(action),
            cursor,
            work_layer,
        }
    }

    pub fn key(key: char, cursor: Point, work_layer: LayerId) -> Self {
        Self {
            event: ToolEvent::Key(key),
            cursor,
            work_layer,
        }
    }

    pub fn data(value: DatumValue, cursor: Point, work_layer: LayerId) -> Self {
        Self {
            event: ToolEvent::Data(value),
            cursor,
            work_layer,
        }
    }

    pub fn layer_change(layer: LayerId, cursor: Point) -> Self {
        Self {
            event: ToolEvent::LayerChange(layer),
            cursor,
            work_layer: layer,
        }
    }
}

/// Terminal state of one dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResult {
    /// Stay active, wait for the next event.
    Nop,
    /// Nothing to do; no mutation happened. Treated like Revert by the
    /// dispatcher so the atomicity guarantee holds regardless.
    End,
    Commit,
    Revert,
}

/// One-shot response returned once per dispatch call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub result: ToolResult,
    /// Tool to begin immediately after a commit, with selection kept.
    pub next_tool: Option<ToolId>,
}

impl ToolResponse {
    pub fn nop() -> Self {
        Self {
            result: ToolResult::Nop,
            next_tool: None,
        }
    }

    pub fn end() -> Self {
        Self {
            result: ToolResult::End,
            next_tool: None,
        }
    }

    pub fn commit() -> Self {
        Self {
            result: ToolResult::Commit,
            next_tool: None,
        }
    }

    pub fn revert() -> Self {
        Self {
            result: ToolResult::Revert,
            next_tool: None,
        }
    }

    pub fn commit_then(next: ToolId) -> Self {
        Self {
            result: ToolResult::Commit,
            next_tool: Some(next),
        }
    }
}

/// Identifies a concrete tool; the factory in `tools` maps this to an
/// instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolId {
    DrawWire,
    DrawPolygon,
    Move,
    Delete,
    PlaceJunction,
}

impl ToolId {
    pub const ALL: [ToolId; 5] = [
        ToolId::DrawWire,
        ToolId::DrawPolygon,
        ToolId::Move,
        ToolId::Delete,
        ToolId::PlaceJunction,
    ];
}

/// Mutable context handed to the tool alongside the document: the current
/// selection plus the flash-message and dialog side channels the dispatcher
/// drains after every call.
#[derive(Debug)]
pub struct ToolContext {
    pub selection: BTreeSet<SelectableRef>,
    flash: Option<String>,
    datum_request: Option<DatumRequest>,
}

impl ToolContext {
    pub fn new(selection: BTreeSet<SelectableRef>) -> Self {
        Self {
            selection,
            flash: None,
            datum_request: None,
        }
    }

    /// Report a short user-facing status message. This is the recoverable
    /// failure channel; it never replaces returning `revert`/`end`.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    /// Request a modal datum dialog. At most one may be pending per active
    /// tool; a second request replaces the first.
    pub fn ask_datum(&mut self, kind: DatumKind, prompt: &str, default: Option<DatumValue>) {
        self.datum_request = Some(DatumRequest {
            kind,
            prompt: prompt.to_string(),
            default,
        });
    }

    pub(crate) fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    pub(crate) fn take_datum_request(&mut self) -> Option<DatumRequest> {
        self.datum_request.take()
    }
}

/// The contract every editing tool implements. A tool instance lives for
/// exactly one user gesture: constructed by the dispatcher, driven through
/// `begin` and `update`, destroyed on its terminal response.
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Pure predicate: could this tool start given the current selection?
    /// Used to grey out UI and filter the command palette; no side effects.
    fn can_begin(&self, doc: &Document, selection: &BTreeSet<SelectableRef>) -> bool {
        let _ = (doc, selection);
        true
    }

    /// Whether the tool requires a non-empty, type-constrained selection.
    fn is_specific(&self) -> bool {
        false
    }

    /// The discrete actions this tool consumes, for contextual hints.
    fn actions(&self) -> &'static [ActionId];

    /// Called exactly once on activation. May perform the first mutation.
    fn begin(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError>;

    /// Called for every subsequent event until a terminal response.
    fn update(
        &mut self,
        doc: &mut Document,
        args: &ToolArgs,
        ctx: &mut ToolContext,
    ) -> Result<ToolResponse, DispatchError>;
}
