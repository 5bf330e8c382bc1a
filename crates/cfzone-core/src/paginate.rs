//! Page-walking over the provider's listing endpoints
//!
//! A [`Paginator`] turns a `page number -> Page<T>` fetch into a single lazy,
//! single-pass sequence of items. Pages are pulled on demand: page 1 is
//! fetched on the first call to [`Paginator::next`], and page `n + 1` only
//! once every item of page `n` has been handed out and `n + 1` is within the
//! `total_pages` reported by the most recently fetched page.
//!
//! ```rust,ignore
//! let mut zones = paginate(|page| provider.list_zones(&query, page));
//! while let Some(zone) = zones.next().await? {
//!     println!("{}", zone.name);
//! }
//! ```

use std::collections::VecDeque;
use std::future::Future;

use crate::error::Result;
use crate::model::Page;

/// Build a paginator over `fetch_page`
pub fn paginate<T, F, Fut>(fetch_page: F) -> Paginator<T, F>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    Paginator::new(fetch_page)
}

/// Lazy, single-pass sequence over a paged listing
pub struct Paginator<T, F> {
    fetch_page: F,
    next_page: u32,
    /// `total_pages` of the last fetched page, `None` before the first fetch
    total_pages: Option<u32>,
    buffer: VecDeque<T>,
    pages_fetched: u32,
    exhausted: bool,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    pub fn new(fetch_page: F) -> Self {
        Self {
            fetch_page,
            next_page: 1,
            total_pages: None,
            buffer: VecDeque::new(),
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Next item, fetching the next page when the current one is drained.
    ///
    /// A fetch error is returned once; afterwards the paginator is exhausted.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if !self.has_more_pages() {
                self.exhausted = true;
                return Ok(None);
            }

            let page_number = self.next_page;
            let page = match (self.fetch_page)(page_number).await {
                Ok(page) => page,
                Err(e) => {
                    self.exhausted = true;
                    self.buffer.clear();
                    return Err(e);
                }
            };

            tracing::trace!(
                "Fetched page {}/{} ({} items)",
                page_number,
                page.result_info.total_pages,
                page.result.len()
            );

            self.pages_fetched += 1;
            self.next_page += 1;
            self.total_pages = Some(page.result_info.total_pages);
            self.buffer.extend(page.result);
        }
    }

    /// Drain every remaining item into a `Vec`
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    fn has_more_pages(&self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.total_pages {
            None => true,
            Some(total) => self.next_page <= total,
        }
    }
}
