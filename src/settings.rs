use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::extract::render::HeadingStyle;

const ENV_PREFIX: &str = "ARTICLE2MD";
const DEFAULT_CONFIG_FILE: &str = "article2md.toml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/118.0 Safari/537.36";

/// Runtime settings, layered: defaults → TOML file → `ARTICLE2MD_*` env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Browser-like UA; some hosts reject default client strings.
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Tag name of the element holding the article body.
    pub content_tag: String,
    pub heading_style: HeadingStyle,
    pub max_slug_len: usize,
    pub fallback_title: String,
    pub fallback_slug: String,
    pub output_dir: PathBuf,
    /// JSON rule table replacing the built-in boilerplate rules.
    pub rules_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 20,
            content_tag: "article".to_string(),
            heading_style: HeadingStyle::Atx,
            max_slug_len: 60,
            fallback_title: "Untitled".to_string(),
            fallback_slug: "article".to_string(),
            output_dir: PathBuf::from("md_files"),
            rules_path: None,
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
