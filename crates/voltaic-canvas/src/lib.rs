//! # Voltaic Canvas
//!
//! Selection machinery for the interactive editor: the flat Selectable
//! array rebuilt from the document, the selection filter, point hit testing
//! with zoom-aware pick radii, interactive drag selection (box / lasso /
//! paint), viewport math, and the read-only render view.

pub mod drag_select;
pub mod filter;
pub mod hit_test;
pub mod render_data;
pub mod selectable;
pub mod spatial;
pub mod viewport;

pub use drag_select::{DragSelection, DragTool, Qualifier, DRAG_THRESHOLD_PX};
pub use filter::SelectionFilter;
pub use hit_test::{ClickResult, HitCandidate, SelectionMode};
pub use render_data::{CanvasData, DrawPrimitive};
pub use selectable::{CanvasState, Selectable, SelectableFlags, SelectableRef};
pub use spatial::{SelectableIndex, SpatialEntry};
pub use viewport::Viewport;
