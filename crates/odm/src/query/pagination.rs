//! Query Builder pagination operations

use super::builder::Query;

impl<M> Query<M> {
    /// Return at most `count` documents; 0 removes the bound
    pub fn limit(mut self, count: u64) -> Self {
        self.limit_count = count;
        self
    }

    /// Skip the first `count` documents; 0 removes the bound
    pub fn skip(mut self, count: u64) -> Self {
        self.skip_count = count;
        self
    }

    /// Page-based pagination, `page` starts at 1 (0 is treated as 1)
    pub fn paginate(mut self, per_page: u64, page: u64) -> Self {
        self.limit_count = per_page;
        self.skip_count = page.max(1).saturating_sub(1).saturating_mul(per_page);
        self
    }
}
