use std::sync::LazyLock;

use regex::Regex;

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;
/// Characters per minute, tuned for Japanese prose.
pub const DEFAULT_READING_SPEED: usize = 200;

static HEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+\s+").expect("valid regex"));
static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));
static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
static NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));

/// Plain-text preview of a markdown body, at most `max_length` characters
/// plus [`ELLIPSIS`] when it had to be cut.
pub fn derive_excerpt(raw_body: &str, max_length: usize) -> String {
    let text = HEADING_MARKER_RE.replace_all(raw_body, "");
    let text = CODE_FENCE_RE.replace_all(&text, "");
    let text = CODE_SPAN_RE.replace_all(&text, "");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = NEWLINES_RE.replace_all(&text, " ");
    let text = text.trim();

    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Minutes needed to read `raw_body`, never less than one.
pub fn estimate_reading_minutes(raw_body: &str, chars_per_minute: usize) -> u32 {
    let chars = raw_body.chars().filter(|c| !c.is_whitespace()).count();
    let minutes = chars.div_ceil(chars_per_minute.max(1));
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}
