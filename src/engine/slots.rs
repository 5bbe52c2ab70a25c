// src/engine/slots.rs

//! Ordering helpers for slot ids such as `Q2` or `DD10`.

use std::cmp::Ordering;

/// Numeric suffix of `id` when it is `prefix` followed by digits only.
pub fn slot_number(id: &str, prefix: &str) -> Option<u32> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Sorts by trailing number (`Q2` before `Q10`); ids without one go last,
/// in plain string order.
pub fn compare_slot_ids(a: &str, b: &str) -> Ordering {
    match (trailing_number(a), trailing_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Returns the ids sorted with [`compare_slot_ids`].
pub fn sorted_slot_ids<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut ids: Vec<&str> = ids.into_iter().map(String::as_str).collect();
    ids.sort_by(|a, b| compare_slot_ids(a, b));
    ids
}

fn trailing_number(id: &str) -> Option<u64> {
    let start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    id[start..].parse().ok()
}
