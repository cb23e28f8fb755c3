/// Ordering of courses by registration tier
use super::types::{Course, PriorityEntry};
use std::cmp::Ordering;

/// The best (lowest) tier in a priority list, or `None` if the list is empty.
pub fn highest_priority(entries: &[PriorityEntry]) -> Option<u32> {
    entries.iter().map(|p| p.priority).min()
}

/// Orders courses by their best tier. Courses without any tier sort after
/// every ranked course and compare equal to each other.
pub fn compare_by_priority(a: &Course, b: &Course) -> Ordering {
    match (highest_priority(&a.priorities), highest_priority(&b.priorities)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts courses by best tier. Ties keep their current order.
pub fn sort_by_priority(courses: &mut [Course]) {
    courses.sort_by(compare_by_priority);
}
