use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::Document;
use crate::geometry::Point;
use crate::object::ObjectId;

/// Severity of a rebuild warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Two differently named nets are electrically connected.
    NetShort,
    /// A wire or track references a junction that no longer exists.
    DanglingSegment,
}

/// A single warning produced by derived-state rebuild, positioned so the UI
/// can zoom to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    pub position: Point,
}

/// Propagate nets across the junction/wire/track graph and regenerate the
/// warning list.
///
/// Each connected component takes the net pinned on any of its junctions.
/// More than one distinct pinned net in a component is a short (warning;
/// the smallest net uuid wins so the result stays deterministic). Segment
/// net assignments are overwritten wholesale; they are derived state.
pub fn propagate(doc: &mut Document) -> Vec<Warning> {
    let mut warnings = Vec::new();

    // Adjacency over junction ids. Segments with a missing endpoint are
    // reported and skipped.
    let mut adjacency: BTreeMap<ObjectId, Vec<ObjectId>> = BTreeMap::new();
    for id in doc.junctions.keys() {
        adjacency.entry(*id).or_default();
    }
    let mut segment_endpoints: Vec<(ObjectId, ObjectId, ObjectId)> = Vec::new();
    for wire in doc.wires.values() {
        segment_endpoints.push((wire.id, wire.from, wire.to));
    }
    for track in doc.tracks.values() {
        segment_endpoints.push((track.id, track.from, track.to));
    }
    for (seg, from, to) in &segment_endpoints {
        if !doc.junctions.contains_key(from) || !doc.junctions.contains_key(to) {
            warnings.push(Warning {
                kind: WarningKind::DanglingSegment,
                severity: Severity::Error,
                message: format!("segment {} references a missing junction", seg),
                position: doc
                    .junctions
                    .get(from)
                    .or_else(|| doc.junctions.get(to))
                    .map(|j| j.position)
                    .unwrap_or(Point::new(0.0, 0.0)),
            });
            continue;
        }
        adjacency.entry(*from).or_default().push(*to);
        adjacency.entry(*to).or_default().push(*from);
    }

    // Connected components via BFS, in junction id order for determinism.
    let mut component_of: BTreeMap<ObjectId, usize> = BTreeMap::new();
    let mut component_nets: Vec<Option<Uuid>> = Vec::new();
    for start in doc.junctions.keys() {
        if component_of.contains_key(start) {
            continue;
        }
        let component = component_nets.len();
        let mut pinned: BTreeSet<Uuid> = BTreeSet::new();
        let mut queue = VecDeque::from([*start]);
        component_of.insert(*start, component);
        while let Some(id) = queue.pop_front() {
            if let Some(net) = doc.junctions[&id].net {
                pinned.insert(net);
            }
            for next in adjacency.get(&id).into_iter().flatten() {
                if !component_of.contains_key(next) {
                    component_of.insert(*next, component);
                    queue.push_back(*next);
                }
            }
        }
        if pinned.len() > 1 {
            let names: Vec<&str> = pinned
                .iter()
                .filter_map(|n| doc.nets.get(n).map(|net| net.name.as_str()))
                .collect();
            warnings.push(Warning {
                kind: WarningKind::NetShort,
                severity: Severity::Error,
                message: format!("nets shorted together: {}", names.join(", ")),
                position: doc.junctions[start].position,
            });
        }
        component_nets.push(pinned.into_iter().next());
    }

    for wire in doc.wires.values_mut() {
        wire.net = component_of
            .get(&wire.from)
            .and_then(|c| component_nets[*c]);
    }
    for track in doc.tracks.values_mut() {
        track.net = component_of
            .get(&track.from)
            .and_then(|c| component_nets[*c]);
    }

    log::debug!(
        "net propagation: {} components, {} warnings",
        component_nets.len(),
        warnings.len()
    );
    warnings
}
