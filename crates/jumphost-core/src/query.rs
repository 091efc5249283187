//! Query parameters for the paginated list endpoints.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub(crate) struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub(crate) fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub(crate) fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}

/// One page of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Page {
    /// First page with the given size.
    #[must_use]
    pub const fn first(per_page: u32) -> Self {
        Self {
            number: 1,
            per_page,
        }
    }

    /// The page after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            number: self.number + 1,
            per_page: self.per_page,
        }
    }

    /// Convert into `page`/`per_page` query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("page", self.number);
        params.push("per_page", self.per_page);
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, QueryParams};

    #[test]
    fn params_keep_insertion_order() {
        let mut params = QueryParams::new();
        params.push("per_page", 25);
        params.push("page", 2);
        assert_eq!(
            params.into_pairs(),
            vec![("per_page", "25".to_string()), ("page", "2".to_string())]
        );
    }

    #[test]
    fn page_advances() {
        let page = Page::first(50).next().next();
        assert_eq!(
            page.to_pairs(),
            vec![("page", "3".to_string()), ("per_page", "50".to_string())]
        );
    }
}
