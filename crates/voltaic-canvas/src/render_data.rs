use serde::{Deserialize, Serialize};

use voltaic_core::layer::LayerId;
use voltaic_core::Document;

use crate::selectable::{CanvasState, Selectable, SelectableFlags, SelectableRef};

/// One drawable primitive for the render layer. The renderer consumes these
/// plus the selection-flag array; it never mutates editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawPrimitive {
    Line {
        layer: LayerId,
        /// [x0, y0, x1, y1]
        endpoints: [f64; 4],
        width: f64,
    },
    Polygon {
        layer: LayerId,
        /// Flat vertex array: [x0, y0, x1, y1, ...]
        vertices: Vec<f64>,
    },
    Pad {
        layer: LayerId,
        center: [f64; 2],
        half_extents: [f64; 2],
        angle: f64,
    },
    Text {
        layer: LayerId,
        position: [f64; 2],
        angle: f64,
        size: f64,
        contents: String,
    },
}

/// Read-only view handed to the renderer: selectable flags (parallel to
/// refs) plus drawable primitives, stamped with the canvas generation so
/// the renderer can skip redundant uploads.
#[derive(Debug, Clone)]
pub struct CanvasData<'a> {
    pub refs: &'a [SelectableRef],
    pub selectables: &'a [Selectable],
    pub primitives: Vec<DrawPrimitive>,
    pub generation: u64,
}

impl<'a> CanvasData<'a> {
    pub fn build(doc: &Document, canvas: &'a CanvasState) -> Self {
        let mut primitives = Vec::new();

        for wire in doc.wires.values() {
            let (Ok(from), Ok(to)) = (doc.junction(&wire.from), doc.junction(&wire.to)) else {
                continue;
            };
            primitives.push(DrawPrimitive::Line {
                layer: wire.layer,
                endpoints: [from.position.x, from.position.y, to.position.x, to.position.y],
                width: 0.0,
            });
        }
        for track in doc.tracks.values() {
            let (Ok(from), Ok(to)) = (doc.junction(&track.from), doc.junction(&track.to)) else {
                continue;
            };
            primitives.push(DrawPrimitive::Line {
                layer: track.layer,
                endpoints: [from.position.x, from.position.y, to.position.x, to.position.y],
                width: track.width,
            });
        }
        for polygon in doc.polygons.values() {
            let mut vertices = Vec::with_capacity(polygon.vertices.len() * 2);
            for v in &polygon.vertices {
                vertices.push(v.position.x);
                vertices.push(v.position.y);
            }
            primitives.push(DrawPrimitive::Polygon {
                layer: polygon.layer,
                vertices,
            });
        }
        for pad in doc.pads.values() {
            primitives.push(DrawPrimitive::Pad {
                layer: pad.layer,
                center: [pad.position.x, pad.position.y],
                half_extents: [pad.half_w, pad.half_h],
                angle: pad.angle,
            });
        }
        for text in doc.texts.values() {
            primitives.push(DrawPrimitive::Text {
                layer: text.layer,
                position: [text.position.x, text.position.y],
                angle: text.angle,
                size: text.size,
                contents: text.contents.clone(),
            });
        }

        Self {
            refs: canvas.refs(),
            selectables: canvas.selectables(),
            primitives,
            generation: canvas.generation(),
        }
    }

    /// Per-selectable SELECTED bits in ref order, as the renderer's flag
    /// upload expects.
    pub fn selection_flags(&self) -> Vec<bool> {
        self.selectables
            .iter()
            .map(|s| s.flags.contains(SelectableFlags::SELECTED))
            .collect()
    }
}
