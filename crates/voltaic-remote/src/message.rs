use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use voltaic_canvas::CanvasState;
use voltaic_core::geometry::Point;
use voltaic_core::object::ObjectId;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("message has no 'op' field")]
    MissingOp,

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// One message exchanged between cooperating editor instances. The wire
/// format is a JSON object whose `op` field names the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum RemoteMessage {
    /// Raise the peer's window.
    Present,
    /// Ask the peer to save its document.
    Save,
    /// Cross-probe: highlight these objects on the peer's canvas.
    Highlight { objects: Vec<Uuid> },
    /// Begin placing a part picked in the peer.
    PlacePart { part: String, position: Point },
}

const KNOWN_OPS: [&str; 4] = ["present", "save", "highlight", "place-part"];

/// Decode one message. Unknown operations are skipped (`Ok(None)`) so a
/// newer peer never wedges an older one; malformed JSON is an error.
pub fn decode(json: &str) -> Result<Option<RemoteMessage>, RemoteError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let Some(op) = value.get("op").and_then(|v| v.as_str()) else {
        return Err(RemoteError::MissingOp);
    };
    if !KNOWN_OPS.contains(&op) {
        log::warn!("skipping unknown remote op '{op}'");
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

pub fn encode(message: &RemoteMessage) -> Result<String, RemoteError> {
    Ok(serde_json::to_string(message)?)
}

/// Apply a cross-probe highlight to the canvas. Objects the canvas does not
/// know are ignored; a message with an empty list clears the highlight.
pub fn apply_highlight(canvas: &mut CanvasState, objects: &[Uuid]) {
    let set: BTreeSet<ObjectId> = objects.iter().copied().collect();
    canvas.highlight_objects(&set);
}
