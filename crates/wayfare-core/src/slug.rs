//! URL slug generation.

/// Turn a display name into a URL slug.
///
/// Lowercases, keeps alphanumeric characters, and collapses every other run
/// of characters into a single `-`. Leading and trailing separators are
/// dropped.
///
/// ```
/// assert_eq!(wayfare_core::slugify("Rio de Janeiro"), "rio-de-janeiro");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
