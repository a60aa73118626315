use std::sync::LazyLock;

use regex::Regex;

static ATX_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());

/// Where the document title comes from.
pub trait TitleStrategy {
    /// `None` when the source yields nothing usable.
    fn extract(&self, markdown: &str) -> Option<String>;
}

/// First non-blank line of the rendered Markdown, ATX markers and escapes removed.
///
/// No check that the line really is a heading: a leading paragraph becomes the title.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLine;

impl TitleStrategy for FirstLine {
    fn extract(&self, markdown: &str) -> Option<String> {
        let first = markdown.trim_start().lines().next()?;
        let title = ATX_MARKER_RE
            .replace(first, "")
            .trim()
            .replace('\\', "");
        let title = title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}
