//! Shared list pagination for the service layer.

/// 1-based page / page-size pair as it arrives from the query string.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Returns `(zero_based_page, per_page)` with per_page clamped to
    /// 1..=100 and page 0 treated as page 1.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, 100);
        (u64::from(page - 1), u64::from(per_page))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn zero_inputs_fall_back_to_minimums() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!((idx, per), (0, 1));
    }

    #[test]
    fn per_page_is_capped_at_one_hundred() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!((idx, per), (4, 100));
    }

    #[test]
    fn defaults() {
        let d = Pagination::default();
        assert_eq!((d.page, d.per_page), (1, 20));
    }
}
