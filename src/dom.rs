//! Owned copy of the article subtree.
//!
//! The parsed document is borrowed and immutable, so the located element is
//! lifted into this tree where link rewriting can happen in place.

use scraper::{ElementRef, Node as HtmlNode};

/// Subtrees that never carry readable content.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Depth-first, document-order visit of this element and all descendants.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.walk_mut(f);
            }
        }
    }
}

/// Primary article body, exclusively owned by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRegion {
    pub root: Element,
}

impl ContentRegion {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        ContentRegion {
            root: lift_element(el),
        }
    }
}

fn lift_element(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let mut children = Vec::new();

    for child in el.children() {
        match child.value() {
            HtmlNode::Text(text) => children.push(Node::Text((**text).to_string())),
            HtmlNode::Element(inner) if SKIPPED_TAGS.contains(&inner.name()) => {}
            HtmlNode::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    children.push(Node::Element(lift_element(child_el)));
                }
            }
            _ => {}
        }
    }

    Element {
        name: value.name().to_ascii_lowercase(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn region(html: &str) -> ContentRegion {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("article").unwrap();
        ContentRegion::from_element(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn lifts_text_and_attributes() {
        let r = region(r#"<article><a href="/x" class="c">hi</a></article>"#);
        let Node::Element(a) = &r.root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(a.name, "a");
        assert_eq!(a.attr("href"), Some("/x"));
        assert_eq!(a.children, vec![Node::Text("hi".into())]);
    }

    #[test]
    fn drops_scripts_and_comments() {
        let r = region("<article><script>x()</script><!-- note --><p>kept</p></article>");
        assert_eq!(r.root.children.len(), 1);
    }

    #[test]
    fn set_attr_replaces_or_appends() {
        let mut r = region(r#"<article><img src="a.png"></article>"#);
        r.root.walk_mut(&mut |el| {
            if el.name == "img" {
                el.set_attr("src", "b.png".into());
                el.set_attr("alt", "pic".into());
            }
        });
        let Node::Element(img) = &r.root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(img.attr("src"), Some("b.png"));
        assert_eq!(img.attr("alt"), Some("pic"));
    }
}
