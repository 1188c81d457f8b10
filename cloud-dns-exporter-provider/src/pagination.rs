//! 1-based page iteration shared by every listing call.

use std::future::Future;

use crate::error::Result;

/// Hard stop for APIs that keep returning full pages.
pub const MAX_PAGES: u32 = 1_000;

/// Fetch pages `1, 2, ...` until a page holds fewer than `page_size` items.
///
/// An empty page also terminates. The first failing page aborts the listing and its
/// error is returned; items from earlier pages are dropped with it.
pub async fn collect_pages<T, F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let page_size = page_size as usize;
    let mut items = Vec::new();

    for page in 1..=MAX_PAGES {
        let batch = fetch_page(page).await?;
        let count = batch.len();
        items.extend(batch);
        if count == 0 || count < page_size {
            return Ok(items);
        }
    }

    log::warn!(
        "Pagination stopped after {MAX_PAGES} full pages ({} items); listing may be incomplete",
        items.len()
    );
    Ok(items)
}

/// Zero-based offset of a 1-based page, for offset/limit style APIs.
pub fn page_offset(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}
