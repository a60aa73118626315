use tracing::debug;
use url::Url;

use crate::dom::ContentRegion;

/// Reference attribute rewritten for each element kind.
fn reference_attr(tag: &str) -> Option<&'static str> {
    match tag {
        "img" => Some("src"),
        "a" => Some("href"),
        _ => None,
    }
}

/// Rewrite relative `img[src]` and `a[href]` values to absolute URLs against `base`.
///
/// Values that cannot be joined are left as they are. Returns how many were changed.
pub fn normalize(region: &mut ContentRegion, base: &Url) -> usize {
    let mut rewritten = 0;

    region.root.walk_mut(&mut |el| {
        let Some(attr) = reference_attr(&el.name) else {
            return;
        };
        let Some(value) = el.attr(attr) else {
            return;
        };
        if let Ok(joined) = base.join(value.trim()) {
            let joined = String::from(joined);
            if joined != value {
                el.set_attr(attr, joined);
                rewritten += 1;
            }
        }
    });

    debug!(rewritten, %base, "Normalized references");
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Node};
    use crate::extract::locate::locate;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    fn refs(el: &Element, out: &mut Vec<String>) {
        for attr in ["href", "src"] {
            if let Some(v) = el.attr(attr) {
                out.push(v.to_string());
            }
        }
        for child in &el.children {
            if let Node::Element(c) = child {
                refs(c, out);
            }
        }
    }

    fn normalized(html: &str) -> Vec<String> {
        let mut region = locate(html, "article").unwrap();
        normalize(&mut region, &base());
        let mut out = Vec::new();
        refs(&region.root, &mut out);
        out
    }

    #[test]
    fn resolves_path_relative_and_root_relative() {
        let got = normalized(r#"<article><a href="/x">a</a><a href="next">b</a><img src="../i.png"></article>"#);
        assert_eq!(
            got,
            vec![
                "https://example.com/x",
                "https://example.com/blog/next",
                "https://example.com/i.png",
            ]
        );
    }

    #[test]
    fn scheme_relative_takes_base_scheme() {
        let got = normalized(r#"<article><img src="//cdn.example.org/a.jpg"></article>"#);
        assert_eq!(got, vec!["https://cdn.example.org/a.jpg"]);
    }

    #[test]
    fn absolute_urls_pass_through() {
        let got = normalized(r#"<article><a href="https://other.com/p?q=1">x</a></article>"#);
        assert_eq!(got, vec!["https://other.com/p?q=1"]);
    }

    #[test]
    fn elements_without_references_are_skipped() {
        let mut region = locate("<article><a name=\"top\">x</a><img alt=\"none\"></article>", "article").unwrap();
        assert_eq!(normalize(&mut region, &base()), 0);
        let mut out = Vec::new();
        refs(&region.root, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn other_elements_are_untouched() {
        let got = normalized(r#"<article><link href="style.css"><script src="a.js"></script></article>"#);
        assert_eq!(got, vec!["style.css"]);
    }
}
