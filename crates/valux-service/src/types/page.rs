use serde::{Deserialize, Serialize};

/// Query string pairs, in insertion order. Unset filters are never present.
pub type QueryParams = Vec<(&'static str, String)>;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Creates a page, deriving the navigation flags from the position.
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32, total_pages: u32) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Slices `all` into the requested one-based page.
    pub fn paginate(all: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = all.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let skip = (page as usize - 1) * limit as usize;
        let items = all.into_iter().skip(skip).take(limit as usize).collect();
        Self::new(items, total, page, limit, total_pages)
    }

    /// Maps every item, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    /// Consumes the page and returns its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
