//! Pagination and bulk load response envelopes

use crate::validate::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated page coordinates (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Check raw query values against `1..` for the page and
    /// `1..=max_page_size` for the page size.
    pub fn new(page: i64, page_size: i64, max_page_size: u32) -> Result<Self, ValidationError> {
        if page < 1 || page > i64::from(u32::MAX) {
            return Err(ValidationError::OutOfRange {
                field: "page",
                min: 1,
                max: u32::MAX.into(),
                value: page,
            });
        }
        if page_size < 1 || page_size > i64::from(max_page_size) {
            return Err(ValidationError::OutOfRange {
                field: "page_size",
                min: 1,
                max: max_page_size.into(),
                value: page_size,
            });
        }
        Ok(Self {
            page: page as u32,
            page_size: page_size as u32,
        })
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size.into()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a collection plus the collection's total size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }
}

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let first = PageRequest::new(1, 10, MAX_PAGE_SIZE).unwrap();
        assert_eq!((first.offset(), first.limit()), (0, 10));

        let third = PageRequest::new(3, 25, MAX_PAGE_SIZE).unwrap();
        assert_eq!((third.offset(), third.limit()), (50, 25));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            PageRequest::new(0, 10, MAX_PAGE_SIZE),
            Err(ValidationError::OutOfRange { field: "page", .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 0, MAX_PAGE_SIZE),
            Err(ValidationError::OutOfRange {
                field: "page_size",
                ..
            })
        ));
        assert!(PageRequest::new(1, 101, MAX_PAGE_SIZE).is_err());
        assert!(PageRequest::new(1, 100, MAX_PAGE_SIZE).is_ok());
        assert!(PageRequest::new(1, 50, 20).is_err());
    }

    #[test]
    fn test_large_page_does_not_overflow() {
        let req = PageRequest::new(u32::MAX.into(), 100, MAX_PAGE_SIZE).unwrap();
        assert_eq!(req.offset(), (i64::from(u32::MAX) - 1) * 100);
    }
}
