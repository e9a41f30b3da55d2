//! Pagination primitives shared by the list endpoints.
//!
//! Both list operations accept the same `limit`/`offset` window. Out-of-range
//! limits are clamped rather than rejected, and the same rule applies
//! everywhere; negative offsets cannot be represented and fail query
//! deserialization at the HTTP boundary.

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// A window over a result sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of items to return, always within `1..=MAX_LIMIT`.
    pub limit: i64,
    /// Number of items to skip.
    pub offset: u64,
}

impl Page {
    /// Build a window from optional query values, clamping the limit into range.
    pub fn from_query(limit: Option<i64>, offset: Option<u64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0);
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, offset: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p = Page::from_query(None, None);
        assert_eq!(p, Page { limit: DEFAULT_LIMIT, offset: 0 });
    }

    #[test]
    fn limit_clamps_at_both_ends() {
        assert_eq!(Page::from_query(Some(0), None).limit, 1);
        assert_eq!(Page::from_query(Some(-7), None).limit, 1);
        assert_eq!(Page::from_query(Some(5000), None).limit, MAX_LIMIT);
    }

    #[test]
    fn in_range_values_pass_through() {
        let p = Page::from_query(Some(25), Some(50));
        assert_eq!(p, Page { limit: 25, offset: 50 });
    }
}
