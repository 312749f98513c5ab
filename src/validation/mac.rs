//! MAC address normalization.
//!
//! Stored form is lowercase hex pairs joined by `:`. Input may use `:`, `-`
//! or `.` as separators, or none at all, in any case.

/// Normalize a MAC address, or `None` if it is not 12 hex digits.
#[must_use]
pub fn normalize(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.') && !c.is_whitespace())
        .collect();

    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let lower = digits.to_ascii_lowercase();
    let pairs: Vec<&str> = (0..12).step_by(2).map(|i| &lower[i..i + 2]).collect();
    Some(pairs.join(":"))
}
