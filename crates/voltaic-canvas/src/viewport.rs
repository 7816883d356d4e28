use serde::{Deserialize, Serialize};

use voltaic_core::geometry::{BBox, Point};

/// Current viewport state of the editor canvas. `zoom` (pixels per document
/// unit) is the scale the hit tester divides pick radii by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    /// Center X in document coordinates.
    pub center_x: f64,
    /// Center Y in document coordinates.
    pub center_y: f64,
    /// Zoom level (pixels per document unit).
    pub zoom: f64,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: 1.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Pan the viewport by a delta in screen pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_x -= dx / self.zoom;
        self.center_y -= dy / self.zoom;
    }

    /// Zoom in/out centered on a screen position.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        let doc_x = self.screen_to_doc_x(screen_x);
        let doc_y = self.screen_to_doc_y(screen_y);

        self.zoom *= factor;
        self.zoom = self.zoom.clamp(0.001, 1_000_000.0);

        // Keep the point under the cursor fixed.
        let new_doc_x = self.screen_to_doc_x(screen_x);
        let new_doc_y = self.screen_to_doc_y(screen_y);
        self.center_x -= new_doc_x - doc_x;
        self.center_y -= new_doc_y - doc_y;
    }

    /// Zoom to fit a bounding box with a 10% margin.
    pub fn fit_bbox(&mut self, bbox: &BBox) {
        let width = bbox.width();
        let height = bbox.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let center = bbox.center();
        self.center_x = center.x;
        self.center_y = center.y;
        let zoom_x = self.canvas_width / width * 0.9;
        let zoom_y = self.canvas_height / height * 0.9;
        self.zoom = zoom_x.min(zoom_y);
    }

    pub fn screen_to_doc_x(&self, screen_x: f64) -> f64 {
        (screen_x - self.canvas_width / 2.0) / self.zoom + self.center_x
    }

    pub fn screen_to_doc_y(&self, screen_y: f64) -> f64 {
        (screen_y - self.canvas_height / 2.0) / self.zoom + self.center_y
    }

    pub fn screen_to_doc(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(self.screen_to_doc_x(screen_x), self.screen_to_doc_y(screen_y))
    }

    pub fn doc_to_screen_x(&self, doc_x: f64) -> f64 {
        (doc_x - self.center_x) * self.zoom + self.canvas_width / 2.0
    }

    pub fn doc_to_screen_y(&self, doc_y: f64) -> f64 {
        (doc_y - self.center_y) * self.zoom + self.canvas_height / 2.0
    }

    /// The visible bounding box in document coordinates.
    pub fn visible_bounds(&self) -> BBox {
        let half_w = self.canvas_width / (2.0 * self.zoom);
        let half_h = self.canvas_height / (2.0 * self.zoom);
        BBox::new(
            Point::new(self.center_x - half_w, self.center_y - half_h),
            Point::new(self.center_x + half_w, self.center_y + half_h),
        )
    }
}
