//! # Paginator
//!
//! Page/limit clamping, offset derivation and navigation links. Links
//! reproduce the caller's original query string (minus `page`/`limit`,
//! with `limit` re-appended explicitly) so that following `next`
//! repeatedly enumerates the full result set exactly once over a static
//! dataset. No snapshot isolation is provided; concurrent writes to the
//! source tables may shift rows across pages.

use serde::{Deserialize, Serialize};

/// Hard upper bound on page size
pub const MAX_LIMIT: u32 = 1000;

/// Page size when the caller sends none
pub const DEFAULT_LIMIT: u32 = 100;

/// Deserialize a query-string page/limit value leniently: absent, empty
/// or non-numeric input coerces to `None` (and from there to the
/// default) instead of rejecting the request. Out-of-range values are
/// the clamp's job, unparseable ones are this one's.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

/// A clamped pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Clamp raw caller values into valid bounds. Out-of-range values
    /// are corrected, never rejected.
    pub fn clamped(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    /// Row offset for the SQL query
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Total pages for a given row count (at least 1)
    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        ((total + limit - 1) / limit).max(1)
    }
}

/// Navigation links for a page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageLinks {
    /// Build `next`/`prev` URLs.
    ///
    /// `raw_query` is the caller's query string verbatim; every pair is
    /// echoed except `page` and `limit`, which are re-appended from the
    /// clamped request. `public_url` (when configured) prefixes the
    /// path to form absolute links.
    pub fn build(
        public_url: Option<&str>,
        path: &str,
        raw_query: Option<&str>,
        page: &PageRequest,
        total: i64,
    ) -> Self {
        let mut params: Vec<&str> = raw_query
            .unwrap_or("")
            .split('&')
            .filter(|pair| {
                if pair.is_empty() {
                    return false;
                }
                let key = pair.split('=').next().unwrap_or(pair);
                key != "page" && key != "limit"
            })
            .collect();

        let limit_param = format!("limit={}", page.limit);
        params.push(&limit_param);
        let echoed = params.join("&");

        let base = format!("{}{}", public_url.unwrap_or(""), path);

        let next = if i64::from(page.limit) * i64::from(page.page) >= total {
            None
        } else {
            Some(format!("{base}?{echoed}&page={}", page.page + 1))
        };

        let prev = if page.page <= 1 {
            None
        } else {
            Some(format!("{base}?{echoed}&page={}", page.page - 1))
        };

        Self { next, prev }
    }
}

/// Standard paginated response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: Serialize> {
    pub success: bool,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next: Option<String>,
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<serde_json::Value>,
    pub data: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble the envelope from the clamped request, the filtered
    /// total and the page rows.
    pub fn new(page: &PageRequest, total: i64, links: PageLinks, data: Vec<T>) -> Self {
        let total_pages = page.total_pages(total);
        Self {
            success: true,
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
            has_next: i64::from(page.page) < total_pages && total > 0,
            has_prev: page.page > 1,
            next: links.next,
            prev: links.prev,
            summary: None,
            data,
        }
    }

    /// Attach the aggregate summary computed over the same filtered set
    pub fn with_summary(mut self, summary: serde_json::Value) -> Self {
        self.summary = Some(summary);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "lenient_u32")]
        page: Option<u32>,
    }

    #[test]
    fn test_lenient_parse_coerces_garbage_to_none() {
        let p: Params = serde_urlencoded::from_str("page=3").unwrap();
        assert_eq!(p.page, Some(3));

        for query in ["page=abc", "page=", "page=-1", ""] {
            let p: Params = serde_urlencoded::from_str(query).unwrap();
            assert_eq!(p.page, None, "query {query:?}");
        }
    }

    #[test]
    fn test_clamping_bounds() {
        let page = PageRequest::clamped(Some(0), Some(5000), 100);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_LIMIT);

        let page = PageRequest::clamped(None, Some(0), 100);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);

        let page = PageRequest::clamped(None, None, 100);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_offset_derivation() {
        let page = PageRequest::clamped(Some(3), Some(50), 100);
        assert_eq!(page.offset(), 100);
        assert_eq!(PageRequest::clamped(Some(1), Some(50), 100).offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::clamped(Some(1), Some(50), 100);
        assert_eq!(page.total_pages(0), 1);
        assert_eq!(page.total_pages(50), 1);
        assert_eq!(page.total_pages(51), 2);
        assert_eq!(page.total_pages(101), 3);
    }

    #[test]
    fn test_next_absent_on_last_page() {
        let page = PageRequest::clamped(Some(2), Some(50), 100);
        let links = PageLinks::build(None, "/api/inventario", None, &page, 100);
        assert!(links.next.is_none());
        assert_eq!(
            links.prev.as_deref(),
            Some("/api/inventario?limit=50&page=1")
        );
    }

    #[test]
    fn test_prev_absent_on_first_page() {
        let page = PageRequest::clamped(Some(1), Some(50), 100);
        let links = PageLinks::build(None, "/api/inventario", None, &page, 100);
        assert!(links.prev.is_none());
        assert_eq!(
            links.next.as_deref(),
            Some("/api/inventario?limit=50&page=2")
        );
    }

    #[test]
    fn test_links_echo_original_filters() {
        let page = PageRequest::clamped(Some(2), Some(10), 100);
        let links = PageLinks::build(
            Some("http://localhost:3000"),
            "/api/inventario",
            Some("ciudad=AGUACHICA&empresa=CBB&page=2&limit=10"),
            &page,
            100,
        );
        assert_eq!(
            links.next.as_deref(),
            Some("http://localhost:3000/api/inventario?ciudad=AGUACHICA&empresa=CBB&limit=10&page=3")
        );
        assert_eq!(
            links.prev.as_deref(),
            Some("http://localhost:3000/api/inventario?ciudad=AGUACHICA&empresa=CBB&limit=10&page=1")
        );
    }

    #[test]
    fn test_following_next_enumerates_without_gaps() {
        // 95 rows, limit 10: pages 1..=10, next present through page 9
        let mut visited = 0i64;
        for p in 1..=10u32 {
            let page = PageRequest::clamped(Some(p), Some(10), 100);
            let links = PageLinks::build(None, "/r", None, &page, 95);
            let rows_on_page = (95 - page.offset() as i64).clamp(0, 10);
            visited += rows_on_page;
            assert_eq!(links.next.is_some(), p < 10, "page {p}");
        }
        assert_eq!(visited, 95);
    }

    #[test]
    fn test_envelope_flags() {
        let page = PageRequest::clamped(Some(1), Some(50), 100);
        let links = PageLinks::build(None, "/r", None, &page, 120);
        let env = Paginated::new(&page, 120, links, vec![1u32, 2, 3]);
        assert!(env.has_next);
        assert!(!env.has_prev);
        assert_eq!(env.total_pages, 3);

        let empty_page = PageRequest::clamped(Some(1), Some(50), 100);
        let links = PageLinks::build(None, "/r", None, &empty_page, 0);
        let env = Paginated::new(&empty_page, 0, links, Vec::<u32>::new());
        assert!(!env.has_next);
        assert_eq!(env.total_pages, 1);
    }
}
