use crate::domains::coverage::aggregate::{spans_overlap, Interval, Obstacle};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// An obstacle crossing a scan row, with its unclipped x-extent.
#[derive(Debug, Clone, Copy)]
pub struct RowBlocker<'a> {
    /// Position of the obstacle in the planner's input list.
    pub ordinal: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub obstacle: &'a Obstacle,
}

/// Obstacles whose vertical extent contains `y` (inclusive), in input order.
pub fn resolve_row_obstacles(obstacles: &[Obstacle], y: f64) -> Vec<RowBlocker<'_>> {
    obstacles
        .iter()
        .enumerate()
        .filter_map(|(ordinal, obstacle)| {
            let bbox = obstacle.bounding_box();
            (bbox.min_y <= y && y <= bbox.max_y).then_some(RowBlocker {
                ordinal,
                min_x: bbox.min_x,
                max_x: bbox.max_x,
                obstacle,
            })
        })
        .collect()
}

/// Lookup of a row's blockers keyed by x-interval start, built once per row.
///
/// `first_overlapping` answers with the overlapping blocker that came first in
/// resolver order, independent of how the index is laid out.
#[derive(Debug, Clone, Default)]
pub struct RowBlockers<'a> {
    entries: Vec<RowBlocker<'a>>,
    by_start: BTreeMap<OrderedFloat<f64>, Vec<usize>>,
}

impl<'a> RowBlockers<'a> {
    pub fn new(entries: Vec<RowBlocker<'a>>) -> Self {
        let mut by_start: BTreeMap<OrderedFloat<f64>, Vec<usize>> = BTreeMap::new();
        for (slot, entry) in entries.iter().enumerate() {
            by_start.entry(OrderedFloat(entry.min_x)).or_default().push(slot);
        }
        Self { entries, by_start }
    }

    pub fn resolve(obstacles: &'a [Obstacle], y: f64) -> Self {
        Self::new(resolve_row_obstacles(obstacles, y))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RowBlocker<'a>] {
        &self.entries
    }

    pub fn x_intervals(&self) -> Vec<Interval> {
        self.entries
            .iter()
            .map(|b| Interval::new(b.min_x, b.max_x))
            .collect()
    }

    /// First blocker, in resolver order, whose open x-extent meets the closed span
    /// between `a` and `b`.
    pub fn first_overlapping(&self, a: f64, b: f64) -> Option<&RowBlocker<'a>> {
        let (lo, hi) = (a.min(b), a.max(b));
        self.by_start
            .range(..OrderedFloat(hi))
            .flat_map(|(_, slots)| slots.iter().copied())
            .filter(|&slot| {
                let entry = &self.entries[slot];
                spans_overlap(lo, hi, entry.min_x, entry.max_x)
            })
            .min()
            .map(|slot| &self.entries[slot])
    }
}
