//! Page extraction and text aggregation.

use futures::future::try_join_all;

use crate::error::{Error, Result};
use crate::source::{DocumentHandle, PageRef};

/// Fetch pages `1..=page_count` of a document.
///
/// Fetches run concurrently; the result is assembled in page-number order
/// regardless of completion order. The first failing fetch fails the whole
/// extraction.
pub async fn extract_pages(handle: &dyn DocumentHandle) -> Result<Vec<PageRef>> {
    let page_count = handle.page_count();
    let fetches = (1..=page_count).map(|number| async move {
        let page = handle.get_page(number).await.map_err(|e| match e {
            err @ (Error::PageFetch { .. } | Error::PageOutOfRange(..)) => err,
            other => Error::PageFetch {
                page: number,
                reason: other.to_string(),
            },
        })?;
        if page.number() != number {
            return Err(Error::PageMismatch {
                requested: number,
                returned: page.number(),
            });
        }
        Ok(page)
    });

    let pages = try_join_all(fetches).await?;
    log::debug!("Extracted {} pages", pages.len());
    Ok(pages)
}

/// Concatenate the text items of every page into one string.
///
/// Text content is fetched concurrently, and flattened only after every
/// fetch has completed: page order first, then item order within a page.
/// No separator is inserted between items or pages.
pub async fn aggregate_text(pages: &[PageRef]) -> Result<String> {
    let fetches = pages.iter().map(|page| async move {
        page.text_content().await.map_err(|e| match e {
            err @ Error::TextContent { .. } => err,
            other => Error::TextContent {
                page: page.number(),
                reason: other.to_string(),
            },
        })
    });

    let contents = try_join_all(fetches).await?;
    let text: String = contents
        .iter()
        .flatten()
        .map(|item| item.text.as_str())
        .collect();
    log::debug!(
        "Aggregated {} bytes of text from {} pages",
        text.len(),
        pages.len()
    );
    Ok(text)
}
