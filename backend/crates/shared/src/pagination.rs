//! Pagination Policy
//!
//! Shared page/offset/limit arithmetic used by every list endpoint.
//!
//! - unset or non-positive `page` becomes 1, `pageSize` becomes 10
//! - `offset = (page - 1) * pageSize`
//! - `pages = ceil(total / pageSize)`, and 0 when `pageSize == 0`
//! - when `total == 0` the slice read is skipped

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::app_error::AppResult;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page request as received from the query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Apply the defaults and compute the slice window
    pub fn resolve(&self) -> PageWindow {
        let page = self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let page_size = self
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        PageWindow {
            page,
            page_size,
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

/// Resolved page request: the numbers echoed back plus the SQL window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
    pub offset: i64,
    pub limit: i64,
}

impl PageWindow {
    pub fn response(&self, total: i64) -> PageResponse {
        build_page_response(total, self.page, self.page_size)
    }
}

/// Page metadata returned alongside every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub total: i64,
    pub pages: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Build page metadata
///
/// `pages` is guarded against a zero page size. The rounding is done on
/// the remainder so a huge `pageSize` cannot overflow.
pub fn build_page_response(total: i64, page: i64, page_size: i64) -> PageResponse {
    let pages = if page_size > 0 {
        total / page_size + i64::from(total % page_size != 0)
    } else {
        0
    };

    PageResponse {
        total,
        pages,
        page,
        page_size,
    }
}

/// A page of items with its metadata, serialized flat as `{total, pages, page, pageSize, list}`
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub meta: PageResponse,
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(list: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            meta: window.response(total),
            list,
        }
    }

    /// Convert the items (entity -> response DTO), keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            meta: self.meta,
            list: self.list.into_iter().map(f).collect(),
        }
    }
}

/// Second half of a page read
///
/// Given the already-counted `total`, fetches the slice only when there is
/// something to fetch.
pub async fn fetch_page<T, F, Fut>(total: i64, fetch: F) -> AppResult<(Vec<T>, i64)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    if total == 0 {
        return Ok((Vec::new(), 0));
    }
    let items = fetch().await?;
    Ok((items, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_resolve_defaults() {
        let window = PageRequest::new(0, 0).resolve();
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 10);
        assert_eq!(window.page, 1);

        let window = PageRequest::default().resolve();
        assert_eq!((window.page, window.page_size), (1, 10));

        let window = PageRequest::new(-4, -1).resolve();
        assert_eq!((window.offset, window.limit), (0, 10));
    }

    #[test]
    fn test_resolve_offset() {
        let window = PageRequest::new(2, 3).resolve();
        assert_eq!(window.offset, 3);
        assert_eq!(window.limit, 3);

        let window = PageRequest::new(5, 20).resolve();
        assert_eq!(window.offset, 80);
    }

    #[test]
    fn test_pages_rounds_up() {
        assert_eq!(build_page_response(5, 1, 3).pages, 2);
        assert_eq!(build_page_response(6, 1, 3).pages, 2);
        assert_eq!(build_page_response(7, 1, 3).pages, 3);
        assert_eq!(build_page_response(1, 1, 10).pages, 1);
        assert_eq!(build_page_response(0, 1, 10).pages, 0);
    }

    #[test]
    fn test_pages_guarded_for_zero_page_size() {
        let meta = build_page_response(42, 1, 0);
        assert_eq!(meta.pages, 0);
        assert_eq!(meta.total, 42);
    }

    #[test]
    fn test_pages_with_max_page_size() {
        let window = PageRequest::new(1, i64::MAX).resolve();
        assert_eq!(window.limit, i64::MAX);

        let meta = window.response(2);
        assert_eq!(meta.pages, 1);
        assert_eq!(build_page_response(i64::MAX, 1, i64::MAX).pages, 1);
        assert_eq!(build_page_response(i64::MAX, 1, 2).pages, i64::MAX / 2 + 1);
    }

    #[test]
    fn test_page_serializes_flat() {
        let window = PageRequest::new(1, 3).resolve();
        let page = Page::new(vec!["a", "b", "c"], 5, window);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["total"], 5);
        assert_eq!(json["pages"], 2);
        assert_eq!(json["page"], 1);
        assert_eq!(json["pageSize"], 3);
        assert_eq!(json["list"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_page_request_from_query() {
        let req: PageRequest = serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
        assert_eq!(req, PageRequest::new(2, 25));
    }

    #[tokio::test]
    async fn test_fetch_page_skips_slice_read_when_empty() {
        let reads = AtomicUsize::new(0);

        let (items, total) = fetch_page(0, || async {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2, 3])
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(total, 0);
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_page_reads_slice() {
        let reads = AtomicUsize::new(0);

        let (items, total) = fetch_page(12, || async {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![7, 8])
        })
        .await
        .unwrap();

        assert_eq!(items, vec![7, 8]);
        assert_eq!(total, 12);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }
}
