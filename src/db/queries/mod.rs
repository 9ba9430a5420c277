pub mod categories;
pub mod questions;

// SQLite caps bound parameters per statement, keep bulk inserts well below it
const IMPORT_CHUNK: usize = 500;

/// Substring match with Unicode case folding. SQLite's `LIKE` and `lower()`
/// only fold ASCII, so text filters are applied here instead.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
