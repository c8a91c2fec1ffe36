//! Filters registered on the template environment.
//!
//! ```html
//! {{ page_obj.count }} {{ page_obj.count|pluralize("monster") }}
//! {{ monster.name|truncate(20) }}
//! ```

/// Shorten `s` to at most `max_chars` characters, ending in `...` when cut.
///
/// ```rust
/// use htmx_patterns::templates::truncate;
///
/// assert_eq!(truncate("Bartholomew", 8), "Barth...");
/// assert_eq!(truncate("Boris", 8), "Boris");
/// ```
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}...", &s[..end])
        }
    }
}

/// `singular` for exactly one, `plural` otherwise.
///
/// ```rust
/// use htmx_patterns::templates::pluralize;
///
/// assert_eq!(pluralize(1, "monster", "monsters"), "monster");
/// assert_eq!(pluralize(3, "monster", "monsters"), "monsters");
/// ```
#[must_use]
pub fn pluralize(count: i64, singular: &str, plural: &str) -> String {
    let word = if count == 1 { singular } else { plural };
    word.to_string()
}

pub(super) fn pluralize_filter(count: i64, singular: Option<&str>, plural: Option<&str>) -> String {
    let singular = singular.unwrap_or("");
    match plural {
        Some(plural) => pluralize(count, singular, plural),
        None => pluralize(count, singular, &format!("{singular}s")),
    }
}

pub(super) fn truncate_filter(value: &str, max_chars: Option<usize>) -> String {
    truncate(value, max_chars.unwrap_or(30))
}
