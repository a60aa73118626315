pub mod clean;
pub mod links;
pub mod locate;
pub mod render;
pub mod slug;
pub mod title;

use std::path::{Path, PathBuf};

use tracing::info;
use url::Url;

use crate::error::Result;
use crate::fetch::{Fetch, SourceDocument};
use crate::output::{expand_home, write_markdown};
use crate::rules::RuleSet;
use crate::settings::Settings;
use render::MarkdownRenderer;
use title::{FirstLine, TitleStrategy};

/// Extracted title plus cleaned Markdown body (one trailing newline).
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub markdown: String,
}

/// Linear pipeline: fetch → locate → normalize links → render → title → clean.
pub struct Converter<F> {
    fetcher: F,
    settings: Settings,
    rules: RuleSet,
    renderer: MarkdownRenderer,
    title: Box<dyn TitleStrategy>,
}

impl<F: Fetch> Converter<F> {
    pub fn new(fetcher: F, settings: Settings, rules: RuleSet) -> Self {
        Converter {
            renderer: MarkdownRenderer::new(settings.heading_style),
            title: Box::new(FirstLine),
            fetcher,
            settings,
            rules,
        }
    }

    #[cfg(test)]
    pub fn with_title_strategy(mut self, strategy: impl TitleStrategy + 'static) -> Self {
        self.title = Box::new(strategy);
        self
    }

    pub fn convert_from_url(&self, url: &Url) -> Result<Article> {
        let doc = self.fetcher.fetch(url)?;
        self.convert_document(&doc)
    }

    pub fn convert_document(&self, doc: &SourceDocument) -> Result<Article> {
        let mut region = locate::locate(&doc.html, &self.settings.content_tag)?;
        let rewritten = links::normalize(&mut region, &doc.url);
        let rendered = self.renderer.render(&region);

        let title = self
            .title
            .extract(&rendered)
            .unwrap_or_else(|| self.settings.fallback_title.clone());
        let markdown = clean::clean(&rendered, &self.rules);

        info!(title = %title, rewritten, chars = markdown.len(), "Converted article");
        Ok(Article { title, markdown })
    }

    /// Write the article as `<slug>.md` under `out_dir`.
    pub fn save(&self, article: &Article, out_dir: &Path) -> Result<PathBuf> {
        let slug = slug::slugify(
            &article.title,
            self.settings.max_slug_len,
            &self.settings.fallback_slug,
        );
        write_markdown(&expand_home(out_dir), &format!("{}.md", slug), &article.markdown)
    }

    /// Convert and save; nothing is written unless every earlier step succeeds.
    pub fn run(&self, url: &Url, out_dir: &Path) -> Result<(Article, PathBuf)> {
        let article = self.convert_from_url(url)?;
        let path = self.save(&article, out_dir)?;
        Ok((article, path))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use reqwest::StatusCode;

    use super::*;
    use crate::error::Error;
    use crate::fetch::parse_url;

    /// Serves canned pages; unknown URLs answer 404.
    struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        fn with(url: &str, html: &str) -> Self {
            FakeFetcher {
                pages: HashMap::from([(url.to_string(), html.to_string())]),
            }
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &Url) -> Result<SourceDocument> {
            match self.pages.get(url.as_str()) {
                Some(html) => Ok(SourceDocument {
                    url: url.clone(),
                    html: html.clone(),
                }),
                None => Err(Error::HttpStatus {
                    status: StatusCode::NOT_FOUND,
                    url: url.to_string(),
                }),
            }
        }
    }

    fn converter(url: &str, html: &str) -> Converter<FakeFetcher> {
        Converter::new(
            FakeFetcher::with(url, html),
            Settings::default(),
            RuleSet::builtin().unwrap(),
        )
    }

    const POST_URL: &str = "https://example.com/post";

    #[test]
    fn hello_world_round_trip() {
        let html = r#"<article><h1>Hello World</h1><p>Some <a href="/x">link</a></p></article>"#;
        let conv = converter(POST_URL, html);
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("md_files");

        let (article, path) = conv.run(&parse_url(POST_URL).unwrap(), &out_dir).unwrap();

        assert_eq!(article.title, "Hello World");
        assert!(article.markdown.contains("https://example.com/x"));
        assert_eq!(path, out_dir.join("hello-world.md"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Hello World\n\nSome [link](https://example.com/x)\n"
        );
    }

    #[test]
    fn missing_article_writes_nothing() {
        let conv = converter(POST_URL, "<html><body><main><h1>No article</h1></main></body></html>");
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("md_files");

        let err = conv.run(&parse_url(POST_URL).unwrap(), &out_dir).unwrap_err();

        assert!(matches!(err, Error::ContentNotFound { .. }));
        assert_eq!(err.to_string(), "Unable to locate <article> section on the page.");
        assert!(!out_dir.exists());
    }

    #[test]
    fn http_errors_propagate() {
        let conv = converter(POST_URL, "<article>x</article>");
        let err = conv
            .convert_from_url(&parse_url("https://example.com/other").unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[test]
    fn empty_article_falls_back() {
        let conv = converter(POST_URL, "<article><img alt=\"no source\"></article>");
        let tmp = tempfile::tempdir().unwrap();

        let (article, path) = conv.run(&parse_url(POST_URL).unwrap(), tmp.path()).unwrap();

        assert_eq!(article.title, "Untitled");
        assert_eq!(article.markdown, "\n");
        assert_eq!(path, tmp.path().join("untitled.md"));
    }

    #[test]
    fn medium_fixture() {
        let url = "https://medium.com/@writer/rust-ownership-explained-1a2b3c";
        let html = fs::read_to_string("tests/fixtures/medium_post.html").unwrap();
        let conv = converter(url, &html);

        let article = conv.convert_from_url(&parse_url(url).unwrap()).unwrap();
        let md = &article.markdown;

        assert_eq!(article.title, "Rust Ownership, Explained: Part_1");
        assert!(md.starts_with("# Rust Ownership, Explained: Part\\_1\n"));
        assert!(md.ends_with('\n') && !md.ends_with("\n\n"));

        // chrome is gone
        for chrome in ["Published in", "miro.medium.com", "medium.com/m/signin"] {
            assert!(!md.contains(chrome), "{} leaked", chrome);
        }
        assert!(md.lines().all(|l| !matches!(l.trim(), "Listen" | "Share" | "Sign in" | "Follow")));

        // content survives, links are absolute
        assert!(md.contains("## Borrowing"));
        assert!(md.contains("[the book](https://doc.rust-lang.org/book/)"));
        assert!(md.contains("[next part](https://medium.com/@writer/part-2-9z8y7x)"));
        assert!(md.contains("![diagram](https://cdn.example.org/diagram.png)"));
        assert!(md.contains("```\nlet s = String::from(\"hi\");\n```"));
        assert!(md.contains("- Each value has an owner."));
        assert!(md.contains("Share your thoughts in the comments."));
    }

    #[test]
    fn custom_title_strategy() {
        struct Fixed;
        impl TitleStrategy for Fixed {
            fn extract(&self, _: &str) -> Option<String> {
                Some("From Metadata".into())
            }
        }

        let conv = converter(POST_URL, "<article><h1>Heading</h1></article>").with_title_strategy(Fixed);
        let article = conv.convert_from_url(&parse_url(POST_URL).unwrap()).unwrap();
        assert_eq!(article.title, "From Metadata");
    }
}
