use scraper::{Html, Selector};
use tracing::debug;

use crate::dom::ContentRegion;
use crate::error::{Error, Result};

/// Find the first `tag` element in document order and lift it out of the page.
pub fn locate(html: &str, tag: &str) -> Result<ContentRegion> {
    let selector = Selector::parse(tag).map_err(|_| Error::InvalidSelector(tag.to_string()))?;
    let document = Html::parse_document(html);

    let found = document
        .select(&selector)
        .next()
        .ok_or_else(|| Error::ContentNotFound {
            tag: tag.to_string(),
        })?;

    debug!(tag, "Located content region");
    Ok(ContentRegion::from_element(found))
}
