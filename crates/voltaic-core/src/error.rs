use thiserror::Error;
use uuid::Uuid;

use crate::object::ObjectType;

/// Errors raised by document accessors. A dangling uuid is a data error:
/// it aborts the running tool, it is never silently ignored.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("no {kind:?} with uuid {uuid} in document")]
    DanglingUuid { kind: ObjectType, uuid: Uuid },

    /// Whole-polygon lookups get their own variant; `ObjectType` only names
    /// the polygon's pickable sub-entities.
    #[error("no polygon with uuid {0} in document")]
    DanglingPolygon(Uuid),

    #[error("polygon {uuid} has no vertex {index}")]
    VertexOutOfRange { uuid: Uuid, index: usize },

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
