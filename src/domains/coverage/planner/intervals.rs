use crate::domains::coverage::aggregate::Interval;

/// Subtract `blocked` from `full`, returning the free gaps sorted left to right.
///
/// Blocked ranges are clipped to `full` first; overlapping or touching ranges
/// merge, so no zero-width gap is produced.
pub fn free_intervals(full: Interval, blocked: &[Interval]) -> Vec<Interval> {
    let mut clipped: Vec<Interval> = blocked
        .iter()
        .filter(|b| b.end > full.start && b.start < full.end)
        .map(|b| Interval::new(b.start.max(full.start), b.end.min(full.end)))
        .filter(|b| b.end > b.start)
        .collect();
    clipped.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut free = Vec::with_capacity(clipped.len() + 1);
    let mut cursor = full.start;
    for block in clipped {
        if block.start > cursor {
            free.push(Interval::new(cursor, block.start));
        }
        cursor = cursor.max(block.end);
    }
    if cursor < full.end {
        free.push(Interval::new(cursor, full.end));
    }
    free
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(a: f64, b: f64) -> Interval {
        Interval::new(a, b)
    }

    #[test]
    fn no_blocks_leaves_the_full_row() {
        assert_eq!(free_intervals(iv(0.0, 2.0), &[]), vec![iv(0.0, 2.0)]);
    }

    #[test]
    fn unsorted_overlapping_blocks_merge() {
        let free = free_intervals(iv(0.0, 5.0), &[iv(3.0, 4.0), iv(1.0, 2.0), iv(1.5, 2.5)]);
        assert_eq!(free, vec![iv(0.0, 1.0), iv(2.5, 3.0), iv(4.0, 5.0)]);
    }

    #[test]
    fn touching_blocks_leave_no_empty_gap() {
        let free = free_intervals(iv(0.0, 3.0), &[iv(1.0, 1.5), iv(1.5, 2.0)]);
        assert_eq!(free, vec![iv(0.0, 1.0), iv(2.0, 3.0)]);
    }

    #[test]
    fn blocks_are_clipped_to_the_row() {
        let free = free_intervals(iv(0.0, 2.0), &[iv(-1.0, 0.5), iv(1.8, 3.0), iv(4.0, 5.0)]);
        assert_eq!(free, vec![iv(0.5, 1.8)]);
    }

    #[test]
    fn full_width_block_frees_nothing() {
        assert!(free_intervals(iv(0.0, 2.0), &[iv(-0.1, 2.1)]).is_empty());
    }
}
