use std::future::Future;

use crate::Result;

/// First page number sent to paginated endpoints.
pub(crate) const FIRST_PAGE: u32 = 1;

/// Fetches pages starting at [`FIRST_PAGE`] until one yields no items.
///
/// `max_pages` caps the number of fetches; `None` means no cap. An error on any
/// page aborts the walk and drops what was collected so far.
pub(crate) async fn collect_pages<F, Fut, T>(
    max_pages: Option<usize>,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = FIRST_PAGE;
    let mut fetched = 0usize;

    while max_pages.map_or(true, |max| fetched < max) {
        let batch = fetch(page).await?;
        if batch.is_empty() {
            break;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("page {} yielded {} item(s)", page, batch.len());

        items.extend(batch);
        fetched += 1;
        page += 1;
    }

    Ok(items)
}
