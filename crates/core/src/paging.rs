//! Page/limit query parameters and the pagination block sent with listings.

use serde::Serialize;

/// Page size when none is given.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Requested page, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: i64,
}

impl Paging {
    /// Parse `page` (≥ 1, default 1) and `limit` (1..=100, default 20).
    ///
    /// Values that do not parse are treated as absent.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, limit }
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl Pagination {
    #[must_use]
    pub const fn new(paging: Paging, total: i64) -> Self {
        Self {
            page: paging.page,
            limit: paging.limit,
            total,
            total_pages: total.saturating_add(paging.limit - 1) / paging.limit,
            has_more: paging.offset().saturating_add(paging.limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults() {
        assert_eq!(Paging::parse(None, None), Paging { page: 1, limit: 20 });
    }

    #[test]
    fn test_paging_clamps() {
        assert_eq!(Paging::parse(Some("0"), Some("500")), Paging { page: 1, limit: 100 });
        assert_eq!(Paging::parse(Some("-3"), Some("0")), Paging { page: 1, limit: 1 });
        assert_eq!(Paging::parse(Some("abc"), Some(" 12 ")), Paging { page: 1, limit: 12 });
    }

    #[test]
    fn test_paging_offset() {
        assert_eq!(Paging::parse(Some("3"), Some("20")).offset(), 40);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(Paging { page: 1, limit: 20 }, 41);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more);

        let p = Pagination::new(Paging { page: 3, limit: 20 }, 41);
        assert!(!p.has_more);

        let p = Pagination::new(Paging { page: 2, limit: 20 }, 40);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_more);

        let p = Pagination::new(Paging { page: 1, limit: 20 }, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_more);
    }

    #[test]
    fn test_pagination_huge_page_has_no_more() {
        let paging = Paging::parse(Some("9223372036854775807"), Some("20"));
        assert_eq!(paging.offset(), i64::MAX);

        let p = Pagination::new(paging, 5);
        assert_eq!(p.page, i64::MAX);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_more);
    }
}
