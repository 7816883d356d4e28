//! # Voltaic Core
//!
//! Document model for electronic-design documents (schematics, boards,
//! footprints): geometry primitives, layers, nets, snapshot-based undo
//! history, and the derived-state rebuild (net propagation, warnings).
//!
//! This crate is the canonical state the interactive editor mutates.

pub mod document;
pub mod error;
pub mod geometry;
pub mod history;
pub mod layer;
pub mod net;
pub mod object;

pub use document::Document;
pub use error::DocumentError;
pub use geometry::{BBox, ObBox, Point};
pub use history::History;
pub use layer::{Layer, LayerId, LayerStack};
pub use net::{Severity, Warning, WarningKind};
pub use object::{Junction, Net, ObjectId, ObjectType, Pad, Polygon, Text, Track, Wire};
