use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Turn a title into a `[a-z0-9-]` filename stem of at most `max_len` chars.
///
/// `"Back-end Web Framework: Flask (Part-2: Routing & URL Binding)"`
/// becomes `"back-end-web-framework-flask-part-2-routing-url-binding"`.
/// Falls back to `fallback` (also capped) when nothing survives.
pub fn slugify(title: &str, max_len: usize, fallback: &str) -> String {
    let max_len = max_len.max(1);
    let kept = DISALLOWED_RE.replace_all(title, "").to_lowercase();
    let joined = SEPARATOR_RE.replace_all(kept.trim(), "-");

    let slug: String = joined.trim_matches('-').chars().take(max_len).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        fallback.chars().take(max_len).collect()
    } else {
        slug.to_string()
    }
}
