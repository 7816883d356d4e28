use voltaic_core::geometry::Point;
use voltaic_core::layer::LayerId;

use crate::filter::SelectionFilter;
use crate::selectable::{CanvasState, SelectableFlags, SelectableRef};

/// How single clicks translate into selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Clicking promotes the currently pre-lit set.
    Hover,
    /// Clicking runs a fresh hit test at the click point.
    #[default]
    Normal,
}

/// One hit-test match.
#[derive(Debug, Clone, PartialEq)]
pub struct HitCandidate {
    pub index: usize,
    pub reference: SelectableRef,
    pub area: f64,
}

/// Outcome of a single-point click in NORMAL mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickResult {
    Nothing,
    Selected(SelectableRef),
    /// More than one candidate; the host shows a disambiguation menu and
    /// resolves it with `select_ref`. Ordered by ascending bounding area.
    Ambiguous(Vec<SelectableRef>),
}

/// All eligible selectables containing `point`, ordered by ascending
/// bounding-box area (ties by ref). The shapes are grown by
/// `radius / scale`, so small targets stay hittable when zoomed out.
///
/// The smallest-first order is the hover policy: when several candidates
/// overlap, the visually smallest wins the prelight.
pub fn hit_test(
    canvas: &CanvasState,
    filter: &SelectionFilter,
    work_layer: LayerId,
    point: &Point,
    radius: f64,
    scale: f64,
) -> Vec<HitCandidate> {
    let expand = radius / scale;
    let mut candidates: Vec<HitCandidate> = canvas
        .index()
        .query_point(point, expand)
        .into_iter()
        .filter_map(|entry| {
            let i = entry.selectable_index;
            let reference = canvas.refs()[i];
            let selectable = &canvas.selectables()[i];
            if !filter.eligible(&reference, work_layer) {
                return None;
            }
            if !selectable.hit(point, expand) {
                return None;
            }
            Some(HitCandidate {
                index: i,
                reference,
                area: selectable.area(),
            })
        })
        .collect();
    candidates.sort_by(|a, b| {
        a.area
            .partial_cmp(&b.area)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.reference.cmp(&b.reference))
    });
    candidates
}

/// Re-run the hover hit test and move PRELIGHT to the single best (smallest
/// area) candidate. Clears all other PRELIGHT flags first. Returns whether
/// any flag changed.
pub fn update_prelight(
    canvas: &mut CanvasState,
    filter: &SelectionFilter,
    work_layer: LayerId,
    point: &Point,
    radius: f64,
    scale: f64,
) -> bool {
    let winner = hit_test(canvas, filter, work_layer, point, radius, scale)
        .first()
        .map(|c| c.index);
    let mut changed = false;
    for (i, s) in canvas.selectables_mut().iter_mut().enumerate() {
        let want = Some(i) == winner;
        if s.flags.contains(SelectableFlags::PRELIGHT) != want {
            s.flags.assign(SelectableFlags::PRELIGHT, want);
            changed = true;
        }
    }
    if changed {
        canvas.bump_generation();
    }
    changed
}

/// Apply a resolved click (or a disambiguation-menu choice) to the flags:
/// toggle when multi-select is requested, otherwise make this the only
/// selection.
pub fn select_ref(canvas: &mut CanvasState, reference: &SelectableRef, multi: bool) {
    if multi {
        if let Some(i) = canvas.position_of(reference) {
            canvas.selectables_mut()[i]
                .flags
                .toggle(SelectableFlags::SELECTED);
            canvas.bump_generation();
        }
    } else {
        canvas.clear_flag(SelectableFlags::SELECTED);
        canvas.set_flag(reference, SelectableFlags::SELECTED, true);
    }
}

/// Single-point click in NORMAL mode. Zero candidates clears the selection
/// (unless multi); one selects it; several are surfaced for disambiguation
/// without touching any SELECTED flag.
pub fn click_select(
    canvas: &mut CanvasState,
    filter: &SelectionFilter,
    work_layer: LayerId,
    point: &Point,
    radius: f64,
    scale: f64,
    multi: bool,
) -> ClickResult {
    let candidates = hit_test(canvas, filter, work_layer, point, radius, scale);
    match candidates.len() {
        0 => {
            if !multi {
                canvas.clear_flag(SelectableFlags::SELECTED);
            }
            ClickResult::Nothing
        }
        1 => {
            let reference = candidates[0].reference;
            select_ref(canvas, &reference, multi);
            ClickResult::Selected(reference)
        }
        _ => ClickResult::Ambiguous(candidates.into_iter().map(|c| c.reference).collect()),
    }
}

/// Single click in HOVER mode: promote whatever is pre-lit.
pub fn promote_prelight(canvas: &mut CanvasState, multi: bool) {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_core::geometry::Point;
    use voltaic_core::object::{Pad, Junction};
    use voltaic_core::Document;

    /// Two overlapping pads, areas 100 and 400, both containing the origin.
    fn overlapping_doc() -> Document {
        let mut doc = Document::new("overlap");
        doc.add_pad(Pad::new("small", Point::new(0.0, 0.0), 5.0, 5.0, 0));
        doc.add_pad(Pad::new("large", Point::new(0.0, 0.0), 10.0, 10.0, 0));
        doc
    }

    fn canvas_for(doc: &Document) -> CanvasState {
        let mut canvas = CanvasState::new();
        canvas.rebuild(doc);
        canvas
    }

    #[test]
    fn test_tie_break_smallest_area_wins() {
        let doc = overlapping_doc();
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        let p = Point::new(0.0, 0.0);

        let candidates = hit_test(&canvas, &filter, 0, &p, 1.0, 1.0);
        assert_eq!(candidates.len(), 2);
        assert!((candidates[0].area - 100.0).abs() < 1e-9);
        assert!((candidates[1].area - 400.0).abs() < 1e-9);

        update_prelight(&mut canvas, &filter, 0, &p, 1.0, 1.0);
        let prelit: Vec<_> = canvas
            .selectables()
            .iter()
            .filter(|s| s.flags.contains(SelectableFlags::PRELIGHT))
            .collect();
        assert_eq!(prelit.len(), 1);
        assert!((prelit[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_disambiguation_completeness() {
        let doc = overlapping_doc();
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        let result = click_select(
            &mut canvas,
            &filter,
            0,
            &Point::new(0.0, 0.0),
            1.0,
            1.0,
            false,
        );
        let ClickResult::Ambiguous(refs) = result else {
            panic!("expected ambiguous result");
        };
        assert_eq!(refs.len(), 2);
        // No flag was mutated while the choice is pending.
        assert!(canvas.selection().is_empty());
        // Resolving the menu selects the chosen ref.
        select_ref(&mut canvas, &refs[0], false);
        assert_eq!(canvas.selection().len(), 1);
    }

    #[test]
    fn test_click_single_and_empty() {
        let mut doc = Document::new("single");
        doc.add_pad(Pad::new("p", Point::new(0.0, 0.0), 5.0, 5.0, 0));
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();

        let result = click_select(
            &mut canvas,
            &filter,
            0,
            &Point::new(0.0, 0.0),
            1.0,
            1.0,
            false,
        );
        assert!(matches!(result, ClickResult::Selected(_)));
        assert_eq!(canvas.selection().len(), 1);

        // Clicking empty space without multi clears.
        let result = click_select(
            &mut canvas,
            &filter,
            0,
            &Point::new(100.0, 100.0),
            1.0,
            1.0,
            false,
        );
        assert_eq!(result, ClickResult::Nothing);
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_multi_click_toggles() {
        let mut doc = Document::new("toggle");
        doc.add_pad(Pad::new("p", Point::new(0.0, 0.0), 5.0, 5.0, 0));
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        let p = Point::new(0.0, 0.0);

        click_select(&mut canvas, &filter, 0, &p, 1.0, 1.0, true);
        assert_eq!(canvas.selection().len(), 1);
        click_select(&mut canvas, &filter, 0, &p, 1.0, 1.0, true);
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_zoom_expands_pick_radius() {
        let mut doc = Document::new("zoom");
        doc.add_junction(Junction::new(Point::new(0.0, 0.0)));
        let canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        // 1.0 away from a 0.1 half-extent junction: misses at scale 10,
        // hits at scale 2 (5 px radius → 2.5 document units).
        let p = Point::new(1.0, 0.0);
        assert!(hit_test(&canvas, &filter, 0, &p, 5.0, 10.0).is_empty());
        assert_eq!(hit_test(&canvas, &filter, 0, &p, 5.0, 2.0).len(), 1);
    }

    #[test]
    fn test_flag_changes_advance_generation() {
        let doc = overlapping_doc();
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        let p = Point::new(0.0, 0.0);

        let before = canvas.generation();
        assert!(update_prelight(&mut canvas, &filter, 0, &p, 1.0, 1.0));
        let prelit = canvas.generation();
        assert!(prelit > before);
        // Hovering in place changes nothing; the counter stays put.
        assert!(!update_prelight(&mut canvas, &filter, 0, &p, 1.0, 1.0));
        assert_eq!(canvas.generation(), prelit);

        // Toggling via a disambiguation choice also counts as a redraw.
        let target = canvas.refs()[0];
        select_ref(&mut canvas, &target, true);
        assert!(canvas.generation() > prelit);
    }

    #[test]
    fn test_hover_promotion() {
        let doc = overlapping_doc();
        let mut canvas = canvas_for(&doc);
        let filter = SelectionFilter::new();
        update_prelight(&mut canvas, &filter, 0, &Point::new(0.0, 0.0), 1.0, 1.0);
        promote_prelight(&mut canvas, false);
        let selection = canvas.selection();
        assert_eq!(selection.len(), 1);
        assert!(!canvas.selectables()[0]
            .flags
            .contains(SelectableFlags::PRELIGHT));
    }
}
