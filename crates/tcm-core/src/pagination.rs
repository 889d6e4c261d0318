//! Pagination for API lists (`skip`/`limit`) and HTML lists (`page`/`page_size`).

use crate::errors::CoreError;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// An offset/limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Window {
    /// Build a window from API query values. Out-of-range values are
    /// rejected rather than clamped.
    pub fn from_query(skip: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or_else(|| i64::from(DEFAULT_LIMIT));
        let skip = u32::try_from(skip)
            .map_err(|_| CoreError::validation("skip must be greater than or equal to 0"))?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| {
                CoreError::validation(format!("limit must be between 1 and {MAX_LIMIT}"))
            })?;
        Ok(Self { skip, limit })
    }
}

/// A 1-indexed page of an HTML list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Clamp `page` to at least 1 and `page_size` into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let page_size = page_size
            .unwrap_or_else(|| i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE));
        Self {
            page: u32::try_from(page).unwrap_or(1),
            page_size: u32::try_from(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn window(self) -> Window {
        Window {
            skip: self.page.saturating_sub(1).saturating_mul(self.page_size),
            limit: self.page_size,
        }
    }

    #[must_use]
    pub const fn total_pages(self, total: u64) -> u64 {
        total_pages(total, self.page_size)
    }
}

/// `ceil(total / page_size)`, and 1 for an empty list.
#[must_use]
pub const fn total_pages(total: u64, page_size: u32) -> u64 {
    if total == 0 || page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size as u64)
}
