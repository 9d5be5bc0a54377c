use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

impl PaginationParams {
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, 100)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        let per_page = params.limit();
        let total_pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        let has_more = params.offset() + (items.len() as u64) < total;
        Self {
            items,
            total,
            page: params.page,
            per_page,
            total_pages,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_limit() {
        let params = PaginationParams { page: 3, per_page: 20 };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);

        let oversized = PaginationParams { page: 1, per_page: 500 };
        assert_eq!(oversized.limit(), 100);
    }

    #[test]
    fn has_more_on_partial_last_page() {
        let params = PaginationParams { page: 1, per_page: 2 };
        let page = Paginated::new(vec![1, 2], 5, &params);
        assert!(page.has_more);
        assert_eq!(page.total_pages, 3);

        let last = PaginationParams { page: 3, per_page: 2 };
        let page = Paginated::new(vec![5], 5, &last);
        assert!(!page.has_more);
    }

    #[test]
    fn empty_result_set() {
        let params = PaginationParams::default();
        let page: Paginated<i32> = Paginated::new(vec![], 0, &params);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total_pages, 0);
    }
}
