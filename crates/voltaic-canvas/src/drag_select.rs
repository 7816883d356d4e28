use voltaic_core::geometry::{
    point_in_polygon, polygon_contains_polygon, polygons_intersect,
    polyline_intersects_polygon, BBox, Point,
};
use voltaic_core::layer::LayerId;

use crate::filter::SelectionFilter;
use crate::selectable::{CanvasState, SelectableFlags};

/// Movement threshold (screen pixels) before a press arms into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 10.0;

/// The interactive area-selection tool in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragTool {
    /// Axis-aligned rectangle from drag origin to the current point.
    #[default]
    Box,
    /// Closed polygon traced by the pointer, auto-closed at commit.
    Lasso,
    /// Open polyline traced by the pointer; always tests intersection.
    Paint,
}

/// How a selectable's box must relate to the drag shape to be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qualifier {
    /// Left-to-right drags require full enclosure (INCLUDE_BOX), right-to-left
    /// mere touch (TOUCH_BOX). Perfectly vertical drags count as
    /// left-to-right.
    #[default]
    Auto,
    IncludeOrigin,
    IncludeBox,
    TouchBox,
}

#[derive(Debug, Clone)]
enum DragState {
    Idle,
    Armed {
        origin_screen: Point,
        origin_doc: Point,
    },
    Dragging {
        origin_screen: Point,
        /// Pointer path in document coordinates. For the box tool only the
        /// first and last points matter.
        path: Vec<Point>,
    },
}

/// Interactive drag selection: IDLE → ARMED (below movement threshold) →
/// DRAGGING → IDLE. Prelight is re-evaluated on every pointer move while
/// dragging; SELECTED flags are only written at commit.
#[derive(Debug)]
pub struct DragSelection {
    pub tool: DragTool,
    pub qualifier: Qualifier,
    state: DragState,
}

impl Default for DragSelection {
    fn default() -> Self {
        Self {
            tool: DragTool::Box,
            qualifier: Qualifier::Auto,
            state: DragState::Idle,
        }
    }
}

impl DragSelection {
    pub fn new(tool: DragTool, qualifier: Qualifier) -> Self {
        Self {
            tool,
            qualifier,
            state: DragState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Button press: arm the gesture. Does not touch any flags yet.
    pub fn press(&mut self, screen: Point, doc_pos: Point) {
        self.state = DragState::Armed {
            origin_screen: screen,
            origin_doc: doc_pos,
        };
    }

    /// Pointer motion. Arms into DRAGGING once the movement threshold is
    /// exceeded (both axes for box, either axis for lasso/paint), then
    /// re-evaluates prelight against the current shape.
    pub fn motion(
        &mut self,
        screen: Point,
        doc_pos: Point,
        canvas: &mut CanvasState,
        filter: &SelectionFilter,
        work_layer: LayerId,
    ) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Armed {
                origin_screen,
                origin_doc,
            } => {
                let dx = (screen.x - origin_screen.x).abs();
                let dy = (screen.y - origin_screen.y).abs();
                let armed = match self.tool {
                    DragTool::Box => dx >= DRAG_THRESHOLD_PX && dy >= DRAG_THRESHOLD_PX,
                    DragTool::Lasso | DragTool::Paint => {
                        dx >= DRAG_THRESHOLD_PX || dy >= DRAG_THRESHOLD_PX
                    }
                };
                if armed {
                    self.state = DragState::Dragging {
                        origin_screen: *origin_screen,
                        path: vec![*origin_doc, doc_pos],
                    };
                    self.evaluate(screen, canvas, filter, work_layer);
                }
            }
            DragState::Dragging { path, .. } => {
                match self.tool {
                    DragTool::Box => {
                        path[1] = doc_pos;
                    }
                    DragTool::Lasso | DragTool::Paint => {
                        path.push(doc_pos);
                    }
                }
                self.evaluate(screen, canvas, filter, work_layer);
            }
        }
    }

    /// Button release. If a drag was in progress, commit the prelit set into
    /// SELECTED and return true; the caller fires exactly one
    /// selection-changed notification. A press that never exceeded the
    /// threshold returns false; the caller treats it as a click.
    pub fn release(&mut self, canvas: &mut CanvasState, multi: bool) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        if !was_dragging {
            return false;
        }
        for s in canvas.selectables_mut() {
            let prelit = s.flags.contains(SelectableFlags::PRELIGHT);
            if prelit {
                if multi {
                    s.flags.toggle(SelectableFlags::SELECTED);
                } else {
                    s.flags.set(SelectableFlags::SELECTED);
                }
            } else if !multi {
                s.flags.clear(SelectableFlags::SELECTED);
            }
            s.flags.clear(SelectableFlags::PRELIGHT);
        }
        canvas.bump_generation();
        true
    }

    pub fn cancel(&mut self, canvas: &mut CanvasState) {
        if self.is_dragging() {
            canvas.clear_flag(SelectableFlags::PRELIGHT);
        }
        self.state = DragState::Idle;
    }

    fn resolved_qualifier(&self, current_screen: Point, origin_screen: Point) -> Qualifier {
        match self.qualifier {
            Qualifier::Auto => {
                if current_screen.x >= origin_screen.x {
                    Qualifier::IncludeBox
                } else {
                    Qualifier::TouchBox
                }
            }
            q => q,
        }
    }

    fn evaluate(
        &self,
        current_screen: Point,
        canvas: &mut CanvasState,
        filter: &SelectionFilter,
        work_layer: LayerId,
    ) {
        let DragState::Dragging {
            origin_screen,
            path,
        } = &self.state
        else {
            return;
        };
        let qualifier = self.resolved_qualifier(current_screen, *origin_screen);

        let Some(shape_bounds) = BBox::from_points(path) else {
            return;
        };
        // Cull through the spatial index; everything outside the shape's
        // bounds cannot match any qualifier.
        let mut matched = vec![false; canvas.len()];
        for entry in canvas.index().query_region(&shape_bounds) {
            let i = entry.selectable_index;
            if !filter.eligible(&canvas.refs()[i], work_layer) {
                continue;
            }
            matched[i] = self.matches(&canvas.selectables()[i], path, &shape_bounds, qualifier);
        }
        let mut changed = false;
        for (i, s) in canvas.selectables_mut().iter_mut().enumerate() {
            if s.flags.contains(SelectableFlags::PRELIGHT) != matched[i] {
                s.flags.assign(SelectableFlags::PRELIGHT, matched[i]);
                changed = true;
            }
        }
        if changed {
            canvas.bump_generation();
        }
    }

    fn matches(
        &self,
        selectable: &crate::selectable::Selectable,
        path: &[Point],
        rect: &BBox,
        qualifier: Qualifier,
    ) -> bool {
        let corners = selectable.bbox.corners();
        match self.tool {
            DragTool::Box => match qualifier {
                Qualifier::IncludeOrigin => rect.contains_point(&selectable.origin),
                Qualifier::IncludeBox => corners.iter().all(|c| rect.contains_point(c)),
                Qualifier::TouchBox => polygons_intersect(&rect.corners(), &corners),
                Qualifier::Auto => unreachable!("auto is resolved before evaluation"),
            },
            DragTool::Lasso => match qualifier {
                Qualifier::IncludeOrigin => point_in_polygon(&selectable.origin, path),
                Qualifier::IncludeBox => polygon_contains_polygon(path, &corners),
                Qualifier::TouchBox => polygons_intersect(path, &corners),
                Qualifier::Auto => unreachable!("auto is resolved before evaluation"),
            },
            // Paint ignores the qualifier: intersection only.
            DragTool::Paint => polyline_intersects_polygon(path, &corners),
        }
    }
}
