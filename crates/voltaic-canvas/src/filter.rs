use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use voltaic_core::layer::LayerId;
use voltaic_core::object::ObjectType;

use crate::selectable::SelectableRef;

/// Per-editor selection filter: which object types are pickable, optionally
/// restricted to a layer allow-list per type, plus a work-layer-only mode.
///
/// A pure predicate over refs; applying it twice to the same set yields the
/// same subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionFilter {
    /// Types removed from the default-everything-enabled state.
    disabled: BTreeSet<ObjectType>,
    /// Optional per-type layer allow-list. Absent means any layer.
    layer_allow: BTreeMap<ObjectType, BTreeSet<LayerId>>,
    pub work_layer_only: bool,
}

impl SelectionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type_enabled(&mut self, object_type: ObjectType, enabled: bool) {
        if enabled {
            self.disabled.remove(&object_type);
        } else {
            self.disabled.insert(object_type);
        }
    }

    pub fn type_enabled(&self, object_type: ObjectType) -> bool {
        !self.disabled.contains(&object_type)
    }

    /// Restrict a type to the given layers. An empty iterator clears the
    /// restriction.
    pub fn allow_layers<I: IntoIterator<Item = LayerId>>(
        &mut self,
        object_type: ObjectType,
        layers: I,
    ) {
        let set: BTreeSet<LayerId> = layers.into_iter().collect();
        if set.is_empty() {
            self.layer_allow.remove(&object_type);
        } else {
            self.layer_allow.insert(object_type, set);
        }
    }

    /// Whether a selectable passes the filter: its type is enabled, its
    /// layer is in the type's allow-list (if one is set), and in
    /// work-layer-only mode it sits on the work layer.
    pub fn eligible(&self, reference: &SelectableRef, work_layer: LayerId) -> bool {
        if self.disabled.contains(&reference.object_type) {
            return false;
        }
        if let Some(allowed) = self.layer_allow.get(&reference.object_type) {
            if !allowed.contains(&reference.layer) {
                return false;
            }
        }
        !self.work_layer_only || reference.layer == work_layer
    }
}
