use std::collections::{BTreeSet, VecDeque};

use voltaic_canvas::{
    hit_test, CanvasState, ClickResult, DragSelection, SelectableRef, SelectionFilter,
    SelectionMode, Viewport,
};
use voltaic_core::geometry::Point;
use voltaic_core::layer::LayerId;
use voltaic_core::net::{self, Warning};
use voltaic_core::{Document, History};

use crate::tool::{
    DatumRequest, DispatchError, Tool, ToolArgs, ToolContext, ToolId, ToolResponse, ToolResult,
};
use crate::tools::make_tool;

/// Notifications drained by the host after each call into the core.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Derived state (nets, selectables) was recomputed.
    Rebuilt { reason: &'static str },
    SelectionChanged,
    ToolChanged,
    /// Short status message for the user.
    Flash(String),
    /// The active tool wants a modal value dialog.
    DatumRequested(DatumRequest),
}

struct ActiveTool {
    tool: Box<dyn Tool>,
    id: ToolId,
    /// Snapshot taken before `begin` touched the document. Commit pushes it
    /// onto the undo stack; revert restores it.
    pre_begin: Document,
}

/// The editor core: owns the document, the undo history, the canvas state
/// and the one optional active tool, and funnels every input event through
/// a single dispatch path so commit/revert stay atomic.
pub struct EditorCore {
    pub document: Document,
    pub history: History,
    pub canvas: CanvasState,
    pub filter: SelectionFilter,
    pub drag: DragSelection,
    pub viewport: Viewport,
    pub selection_mode: SelectionMode,
    active: Option<ActiveTool>,
    events: VecDeque<EditorEvent>,
    warnings: Vec<Warning>,
}

impl EditorCore {
    pub fn new(document: Document) -> Self {
        let mut core = Self {
            document,
            history: History::new(),
            canvas: CanvasState::new(),
            filter: SelectionFilter::new(),
            drag: DragSelection::default(),
            viewport: Viewport::new(800.0, 600.0),
            selection_mode: SelectionMode::default(),
            active: None,
            events: VecDeque::new(),
            warnings: Vec::new(),
        };
        core.rebuild("open");
        core
    }

    pub fn work_layer(&self) -> LayerId {
        self.document.layers.work_layer
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn selection(&self) -> BTreeSet<SelectableRef> {
        self.canvas.selection()
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    // ── tool dispatch ──────────────────────────────────────────────────

    pub fn tool_is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn tool_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.tool.name())
    }

    pub fn tool_id(&self) -> Option<ToolId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn tool_actions(&self) -> &'static [crate::tool::ActionId] {
        self.active.as_ref().map_or(&[], |a| a.tool.actions())
    }

    /// Whether `id` could start right now, for greying out menu entries.
    pub fn can_begin_tool(&self, id: ToolId) -> bool {
        self.active.is_none()
            && make_tool(id).can_begin(&self.document, &self.canvas.selection())
    }

    /// Activate a tool. Fails if another tool is active; returns Ok(false)
    /// without side effects when the tool declines to start (for instance a
    /// selection-specific tool with nothing selected).
    pub fn tool_begin(&mut self, id: ToolId, cursor: Point) -> Result<bool, DispatchError> {
        if let Some(active) = &self.active {
            return Err(DispatchError::ToolConflict(active.tool.name()));
        }
        let mut tool = make_tool(id);
        let selection = self.canvas.selection();
        if !tool.can_begin(&self.document, &selection) {
            log::debug!("tool '{}' declined to begin", tool.name());
            return Ok(false);
        }
        let pre_begin = self.document.clone();
        let args = ToolArgs::moved(cursor, self.work_layer());
        let mut ctx = ToolContext::new(selection);
        let outcome = tool.begin(&mut self.document, &args, &mut ctx);
        log::info!("tool '{}' began", tool.name());
        self.events.push_back(EditorEvent::ToolChanged);
        let active = ActiveTool { tool, id, pre_begin };
        self.finish_dispatch(active, cursor, ctx, outcome)?;
        Ok(true)
    }

    /// Route an event to the active tool. A no-op when no tool is active.
    pub fn tool_update(&mut self, args: ToolArgs) -> Result<(), DispatchError> {
        let Some(mut active) = self.active.take() else {
            return Ok(());
        };
        let mut ctx = ToolContext::new(self.canvas.selection());
        let outcome = active.tool.update(&mut self.document, &args, &mut ctx);
        self.finish_dispatch(active, args.cursor, ctx, outcome)
    }

    /// Common tail of `tool_begin`/`tool_update`: drain the side channels,
    /// write the selection back, then act on the terminal result. On error
    /// the pre-begin snapshot is restored before propagating, so a failed
    /// dispatch never leaves a half-applied gesture behind.
    fn finish_dispatch(
        &mut self,
        active: ActiveTool,
        cursor: Point,
        mut ctx: ToolContext,
        outcome: Result<ToolResponse, DispatchError>,
    ) -> Result<(), DispatchError> {
        if let Some(message) = ctx.take_flash() {
            self.events.push_back(EditorEvent::Flash(message));
        }
        if let Some(request) = ctx.take_datum_request() {
            self.events.push_back(EditorEvent::DatumRequested(request));
        }
        self.canvas.set_selection(&ctx.selection);

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                log::warn!("tool '{}' failed: {err}", active.tool.name());
                self.document = active.pre_begin;
                self.rebuild("tool error");
                self.events.push_back(EditorEvent::ToolChanged);
                return Err(err);
            }
        };

        match response.result {
            ToolResult::Nop => {
                self.active = Some(active);
            }
            ToolResult::Commit => {
                self.history.push(active.pre_begin, active.tool.name());
                log::info!("tool '{}' committed", active.tool.name());
                self.rebuild("commit");
                self.events.push_back(EditorEvent::ToolChanged);
                if let Some(next) = response.next_tool {
                    self.tool_begin(next, cursor)?;
                }
            }
            ToolResult::Revert | ToolResult::End => {
                self.document = active.pre_begin;
                log::info!("tool '{}' reverted", active.tool.name());
                self.rebuild("revert");
                self.events.push_back(EditorEvent::ToolChanged);
            }
        }
        Ok(())
    }

    // ── history ────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.active.is_none() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.active.is_none() && self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<Option<String>, DispatchError> {
        if let Some(active) = &self.active {
            return Err(DispatchError::ToolConflict(active.tool.name()));
        }
        let comment = self.history.undo(&mut self.document);
        if comment.is_some() {
            self.rebuild("undo");
        }
        Ok(comment)
    }

    pub fn redo(&mut self) -> Result<Option<String>, DispatchError> {
        if let Some(active) = &self.active {
            return Err(DispatchError::ToolConflict(active.tool.name()));
        }
        let comment = self.history.redo(&mut self.document);
        if comment.is_some() {
            self.rebuild("redo");
        }
        Ok(comment)
    }

    /// Recompute everything derived from the document: net assignments with
    /// their warnings, then the selectable array and its spatial index.
    fn rebuild(&mut self, reason: &'static str) {
        self.warnings = net::propagate(&mut self.document);
        self.canvas.rebuild(&self.document);
        log::debug!(
            "rebuilt ({reason}): {} selectables, {} warnings",
            self.canvas.len(),
            self.warnings.len()
        );
        self.events.push_back(EditorEvent::Rebuilt { reason });
    }

    // ── selection ──────────────────────────────────────────────────────

    /// Pointer hover: refresh the prelight. Returns true when it changed.
    pub fn hover_move(&mut self, point: Point, radius: f64) -> bool {
        let work_layer = self.work_layer();
        hit_test::update_prelight(
            &mut self.canvas,
            &self.filter,
            work_layer,
            &point,
            radius,
            self.viewport.zoom,
        )
    }

    /// Pointer click. In hover mode the prelit entity is promoted; in normal
    /// mode a fresh hit test decides, possibly reporting ambiguity the host
    /// must resolve through `select`.
    pub fn click(&mut self, point: Point, radius: f64, multi: bool) -> ClickResult {
        let result = match self.selection_mode {
            SelectionMode::Hover => {
                hit_test::promote_prelight(&mut self.canvas, multi);
                ClickResult::Nothing
            }
            SelectionMode::Normal => {
                let work_layer = self.work_layer();
                hit_test::click_select(
                    &mut self.canvas,
                    &self.filter,
                    work_layer,
                    &point,
                    radius,
                    self.viewport.zoom,
                    multi,
                )
            }
        };
        if !matches!(result, ClickResult::Ambiguous(_)) {
            self.events.push_back(EditorEvent::SelectionChanged);
        }
        result
    }

    /// Select one entity directly, typically from a disambiguation menu.
    pub fn select(&mut self, reference: &SelectableRef, multi: bool) {
        hit_test::select_ref(&mut self.canvas, reference, multi);
        self.events.push_back(EditorEvent::SelectionChanged);
    }

    // ── drag selection ─────────────────────────────────────────────────

    pub fn drag_press(&mut self, screen: Point, doc_pos: Point) {
        self.drag.press(screen, doc_pos);
    }

    pub fn drag_motion(&mut self, screen: Point, doc_pos: Point) {
        let work_layer = self.document.layers.work_layer;
        self.drag
            .motion(screen, doc_pos, &mut self.canvas, &self.filter, work_layer);
    }

    pub fn drag_release(&mut self, multi: bool) -> bool {
        let committed = self.drag.release(&mut self.canvas, multi);
        if committed {
            self.events.push_back(EditorEvent::SelectionChanged);
        }
        committed
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel(&mut self.canvas);
    }
}
