//! Offset pagination

use serde::{Deserialize, Serialize};

use super::DomainError;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Page window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Build a window, falling back to the defaults for missing values
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Result<Self, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if limit == 0 || limit > MAX_LIMIT {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Pagination::new(None, None).unwrap();
        assert_eq!(page, Pagination::default());
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(Pagination::new(Some(0), None).is_err());
        assert!(Pagination::new(Some(101), None).is_err());
        assert_eq!(Pagination::new(Some(100), Some(5)).unwrap().offset, 5);
    }
}
