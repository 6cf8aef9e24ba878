use serde::Deserialize;

use crate::config;

/// Common `?limit=&offset=` query parameters.
///
/// Defaults to `limit=20, offset=0`. The effective limit is capped by
/// `pagination.max_limit` so a single caller cannot request an unbounded
/// result set.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        let cfg = &config::config().pagination;
        self.limit
            .unwrap_or(cfg.default_limit)
            .clamp(1, cfg.max_limit)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unspecified() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limit_is_capped() {
        let p = Pagination {
            limit: Some(10_000),
            offset: None,
        };
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn nonsense_values_are_clamped() {
        let p = Pagination {
            limit: Some(0),
            offset: Some(-5),
        };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn explicit_values_within_bounds_pass_through() {
        let p = Pagination {
            limit: Some(50),
            offset: Some(40),
        };
        assert_eq!(p.limit(), 50);
        assert_eq!(p.offset(), 40);
    }
}
