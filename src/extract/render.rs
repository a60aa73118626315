//! Content region → Markdown.

use serde::Deserialize;

use crate::dom::{ContentRegion, Element, Node};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "aside", "nav", "figure",
    "figcaption", "address", "details", "summary", "dl", "dt", "dd", "thead", "tbody", "tfoot",
    "tr", "center",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `=` / `-` for h1 and h2; deeper levels stay ATX.
    Setext,
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    heading_style: HeadingStyle,
}

impl MarkdownRenderer {
    pub fn new(heading_style: HeadingStyle) -> Self {
        MarkdownRenderer { heading_style }
    }

    pub fn render(&self, region: &ContentRegion) -> String {
        let mut out = String::new();
        self.element(&region.root, &mut out);
        tidy(&out)
    }

    fn children(&self, el: &Element, out: &mut String) {
        for child in &el.children {
            match child {
                Node::Text(text) => push_text(out, text),
                Node::Element(inner) => self.element(inner, out),
            }
        }
    }

    /// Render children into a fresh buffer.
    fn inner(&self, el: &Element) -> String {
        let mut buf = String::new();
        self.children(el, &mut buf);
        buf
    }

    fn element(&self, el: &Element, out: &mut String) {
        match el.name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let text = single_line(&self.inner(el));
                if text.is_empty() {
                    return;
                }
                let level = el.name[1..].parse::<usize>().unwrap_or(1);
                block_break(out);
                out.push_str(&self.heading(&text, level));
                block_break(out);
            }
            "br" => {
                trim_trailing_spaces(out);
                out.push('\n');
            }
            "hr" => {
                block_break(out);
                out.push_str("---");
                block_break(out);
            }
            "a" => {
                let text = single_line(&self.inner(el));
                if text.is_empty() {
                    return;
                }
                let raw = raw_text(el);
                lead_space(out, &raw);
                match el.attr("href") {
                    Some(href) => out.push_str(&format!("[{}]({}{})", text, href, title_part(el))),
                    None => out.push_str(&text),
                }
                trail_space(out, &raw);
            }
            "img" => {
                if let Some(src) = el.attr("src") {
                    let alt = el.attr("alt").unwrap_or("");
                    out.push_str(&format!("![{}]({}{})", alt, src, title_part(el)));
                }
            }
            "strong" | "b" => wrap_inline(out, &raw_text(el), &self.inner(el), "**"),
            "em" | "i" => wrap_inline(out, &raw_text(el), &self.inner(el), "*"),
            "code" => {
                let code = raw_text(el);
                if !code.is_empty() {
                    out.push_str(&code_span(&code));
                }
            }
            "pre" => {
                let code = raw_text(el);
                let fence = "`".repeat((longest_backtick_run(&code) + 1).max(3));
                block_break(out);
                out.push_str(&fence);
                out.push('\n');
                out.push_str(code.trim_end_matches('\n'));
                out.push('\n');
                out.push_str(&fence);
                block_break(out);
            }
            "table" => {
                block_break(out);
                self.table(el, out);
                block_break(out);
            }
            "td" | "th" => {
                // Stray cell outside a table.
                lead_space(out, " ");
                self.children(el, out);
                trail_space(out, " ");
            }
            "blockquote" => {
                let quoted = tidy(&self.inner(el));
                if quoted.is_empty() {
                    return;
                }
                block_break(out);
                let lines: Vec<String> = quoted
                    .lines()
                    .map(|l| if l.is_empty() { ">".to_string() } else { format!("> {}", l) })
                    .collect();
                out.push_str(&lines.join("\n"));
                block_break(out);
            }
            "ul" | "ol" => {
                block_break(out);
                self.list(el, out);
                block_break(out);
            }
            "li" => {
                // Stray item outside a list.
                block_break(out);
                out.push_str("- ");
                self.children(el, out);
                block_break(out);
            }
            tag if BLOCK_TAGS.contains(&tag) => {
                block_break(out);
                self.children(el, out);
                block_break(out);
            }
            _ => self.children(el, out),
        }
    }

    fn heading(&self, text: &str, level: usize) -> String {
        match (self.heading_style, level) {
            (HeadingStyle::Setext, 1) => format!("{}\n{}", text, "=".repeat(text.chars().count())),
            (HeadingStyle::Setext, 2) => format!("{}\n{}", text, "-".repeat(text.chars().count())),
            _ => format!("{} {}", "#".repeat(level.clamp(1, 6)), text),
        }
    }

    fn list(&self, el: &Element, out: &mut String) {
        let ordered = el.name == "ol";
        let mut n = el
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);

        for child in &el.children {
            let Node::Element(item) = child else {
                continue;
            };
            if item.name != "li" {
                continue;
            }

            let marker = if ordered { format!("{}. ", n) } else { "- ".to_string() };
            let indent = " ".repeat(marker.len());
            let body = tidy(&self.inner(item));

            let mut first = true;
            let mut fence = None;
            for line in body.lines() {
                if step_fence(&mut fence, line) {
                } else if line.trim().is_empty() {
                    // Items stay tight; blank lines only survive inside code.
                    if fence.is_some() {
                        out.push('\n');
                    }
                    continue;
                }
                if first {
                    out.push_str(&marker);
                    first = false;
                } else {
                    out.push_str(&indent);
                }
                out.push_str(line);
                out.push('\n');
            }
            if first {
                out.push_str(marker.trim_end());
                out.push('\n');
            }
            n += 1;
        }
    }
}

impl MarkdownRenderer {
    /// Pipe table; the first row becomes the header.
    fn table(&self, el: &Element, out: &mut String) {
        let mut rows = Vec::new();
        collect_rows(el, &mut rows);

        let rendered: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                row.children
                    .iter()
                    .filter_map(|c| match c {
                        Node::Element(cell) if cell.name == "td" || cell.name == "th" => {
                            Some(single_line(&self.inner(cell)).replace('|', "\\|"))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        let width = rendered.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return;
        }

        for (i, cells) in rendered.iter().enumerate() {
            let mut padded = cells.clone();
            padded.resize(width, String::new());
            out.push_str(&format!("| {} |\n", padded.join(" | ")));
            if i == 0 {
                out.push_str(&format!("|{}\n", " --- |".repeat(width)));
            }
        }
    }
}

/// Rows in document order, looking through `thead`/`tbody`/`tfoot` but not nested tables.
fn collect_rows<'a>(el: &'a Element, rows: &mut Vec<&'a Element>) {
    for child in &el.children {
        if let Node::Element(inner) = child {
            match inner.name.as_str() {
                "tr" => rows.push(inner),
                "thead" | "tbody" | "tfoot" => collect_rows(inner, rows),
                _ => {}
            }
        }
    }
}

fn longest_backtick_run(code: &str) -> usize {
    code.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Inline code delimited by one more backtick than the longest run inside it.
fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(code) + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{} {} {}", fence, code, fence)
    } else {
        format!("{}{}{}", fence, code, fence)
    }
}

/// Backtick count of a fence line, also when it follows a list marker or quote prefix.
fn fence_len(line: &str) -> Option<usize> {
    let t = line.trim_start();
    let t = t
        .strip_prefix("> ")
        .or_else(|| t.strip_prefix("- "))
        .or_else(|| {
            let digits = t.len() - t.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits > 0 {
                t[digits..].strip_prefix(". ")
            } else {
                None
            }
        })
        .unwrap_or(t);
    let n = t.len() - t.trim_start_matches('`').len();
    (n >= 3).then_some(n)
}

/// Track fenced code: a fence opens a block, and only a fence at least as long closes it.
fn step_fence(open: &mut Option<usize>, line: &str) -> bool {
    match (fence_len(line), *open) {
        (Some(n), None) => *open = Some(n),
        (Some(n), Some(o)) if n >= o => *open = None,
        _ => return false,
    }
    true
}

fn title_part(el: &Element) -> String {
    match el.attr("title") {
        Some(t) if !t.trim().is_empty() => format!(" \"{}\"", t.trim().replace('"', "\\\"")),
        _ => String::new(),
    }
}

/// Emphasis markers must hug the text, so edge whitespace moves outside them.
fn wrap_inline(out: &mut String, raw: &str, rendered: &str, marker: &str) {
    let text = rendered.trim();
    if text.is_empty() {
        return;
    }
    lead_space(out, raw);
    out.push_str(marker);
    out.push_str(text);
    out.push_str(marker);
    trail_space(out, raw);
}

fn lead_space(out: &mut String, raw: &str) {
    if raw.starts_with(char::is_whitespace) && !ends_with_space(out) {
        out.push(' ');
    }
}

fn trail_space(out: &mut String, raw: &str) {
    if raw.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Append a text node: collapse whitespace and escape emphasis characters.
fn push_text(out: &mut String, text: &str) {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = ends_with_space(out);

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if c == '*' || c == '_' {
            collapsed.push('\\');
        }
        collapsed.push(c);
    }

    out.push_str(&collapsed);
}

fn ends_with_space(out: &str) -> bool {
    out.is_empty() || out.ends_with(' ') || out.ends_with('\n')
}

fn raw_text(el: &Element) -> String {
    let mut buf = String::new();
    collect_text(el, &mut buf);
    buf
}

fn collect_text(el: &Element, buf: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => buf.push_str(t),
            Node::Element(inner) if inner.name == "br" => buf.push('\n'),
            Node::Element(inner) => collect_text(inner, buf),
        }
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
}

/// Ensure the buffer ends in a blank line (no-op on an empty buffer).
fn block_break(out: &mut String) {
    trim_trailing_spaces(out);
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}

/// Strip trailing spaces and squeeze blank-line runs, leaving fenced code alone.
fn tidy(s: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut fence = None;

    for line in s.lines() {
        if step_fence(&mut fence, line) {
            lines.push(line.trim_end());
            continue;
        }
        if fence.is_some() {
            lines.push(line);
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
