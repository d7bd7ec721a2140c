//! Page-number pagination: `?page=N&limit=M`, answered with absolute links
//! to the neighbouring pages.

use url::Url;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build a page request, falling back to `default_limit` and clamping the
    /// limit into `1..=max_limit`. Page numbers below 1 are rejected.
    pub fn new(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: i64,
        max_limit: i64,
    ) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(ValidationError::InvalidParameter {
                field: "page",
                value: page.to_string(),
            });
        }
        let limit = limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn has_next(&self, total: i64) -> bool {
        self.page.saturating_mul(self.limit) < total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Absolute `(next, previous)` links for this page of `total` rows.
    ///
    /// `request_url` is the URL the client called; its other query
    /// parameters are carried over and only `page` is replaced. The first
    /// page is linked without a `page` parameter.
    pub fn links(&self, request_url: &Url, total: i64) -> (Option<String>, Option<String>) {
        let next = self
            .has_next(total)
            .then(|| with_page(request_url, Some(self.page + 1)));
        let previous = self.has_previous().then(|| {
            let target = self.page - 1;
            with_page(request_url, (target > 1).then_some(target))
        });
        (next, previous)
    }
}

fn with_page(url: &Url, page: Option<i64>) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut target = url.clone();
    target.set_query(None);
    {
        let mut pairs = target.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if let Some(page) = page {
            pairs.append_pair("page", &page.to_string());
        }
    }
    if target.query() == Some("") {
        target.set_query(None);
    }
    target.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_defaults_and_clamping() {
        let req = PageRequest::new(None, None, 6, 100).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 6 });
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(Some(3), Some(1000), 6, 100).unwrap();
        assert_eq!(req.limit, 100);
        assert_eq!(req.offset(), 200);

        assert_eq!(PageRequest::new(None, Some(0), 6, 100).unwrap().limit, 1);
    }

    #[test]
    fn test_rejects_page_zero() {
        assert!(PageRequest::new(Some(0), None, 6, 100).is_err());
    }

    #[test]
    fn test_links_middle_page() {
        let req = PageRequest::new(Some(2), Some(2), 6, 100).unwrap();
        let (next, previous) =
            req.links(&url("http://h/api/recipes?tags=a&page=2&limit=2"), 7);
        assert_eq!(
            next.as_deref(),
            Some("http://h/api/recipes?tags=a&limit=2&page=3")
        );
        assert_eq!(
            previous.as_deref(),
            Some("http://h/api/recipes?tags=a&limit=2")
        );
    }

    #[test]
    fn test_links_single_page() {
        let req = PageRequest::new(None, None, 6, 100).unwrap();
        assert_eq!(req.links(&url("http://h/api/users"), 6), (None, None));
    }

    #[test]
    fn test_previous_link_drops_empty_query() {
        let req = PageRequest::new(Some(2), None, 6, 100).unwrap();
        let (_, previous) = req.links(&url("http://h/api/users?page=2"), 8);
        assert_eq!(previous.as_deref(), Some("http://h/api/users"));
    }
}
