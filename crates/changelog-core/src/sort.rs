use std::cmp::Ordering;

/// Stable in-place insertion sort.
///
/// Release ordering and issue-link ordering are not total orders, and
/// `slice::sort_by` is allowed to panic on such comparators. An element only
/// moves ahead of its predecessor when it compares strictly less, so ties and
/// inconsistent pairs keep their insertion order.
pub(crate) fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for start in 1..items.len() {
        let mut index = start;
        while index > 0 && compare(&items[index], &items[index - 1]) == Ordering::Less {
            items.swap(index, index - 1);
            index -= 1;
        }
    }
}
