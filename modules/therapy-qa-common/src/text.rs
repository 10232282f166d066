use std::sync::LazyLock;
use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid regex"));
static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").expect("valid regex"));
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?-]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip links, markup and stray symbols from forum text and collapse whitespace.
///
/// URLs go first, so an inline `[label](https://...)` loses its target and
/// keeps its label. Only word characters, single spaces and `. , ! ? -`
/// survive. Character stripping runs before whitespace collapsing so that
/// removing a symbol never leaves a double space behind.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = URL_RE.replace_all(text, "");
    let text = MARKDOWN_LINK_RE.replace_all(&text, "");
    let text = DISALLOWED_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
