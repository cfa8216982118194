use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

/// Reduces a client-supplied filename to a single safe path component.
///
/// Path separators become whitespace, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// stripped. Returns `None` when nothing usable is left.
#[must_use]
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let spaced = raw.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True when `filename` ends in `.csv`, ignoring case.
#[must_use]
pub fn has_csv_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".csv")
}
