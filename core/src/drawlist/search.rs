//! Branch-free binary search over sorted slices

/// Index of the last element whose projected value is `<= target`, or `None`
/// if every element is greater.
///
/// `items` must be sorted ascending by `project`. The loop body has no
/// data-dependent branch: each step halves the window and conditionally
/// advances the base, which compiles to a conditional move.
pub fn last_at_most<T, K: Ord>(items: &[T], target: &K, project: impl Fn(&T) -> K) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let mut base = 0usize;
    let mut len = items.len();
    while len > 1 {
        let half = len / 2;
        let mid = base + half;
        base = if project(&items[mid]) <= *target { mid } else { base };
        len -= half;
    }

    if project(&items[base]) <= *target {
        Some(base)
    } else {
        None
    }
}
