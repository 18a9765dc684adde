use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Paging parameters accepted by the dashboard data tables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &PageQuery) -> Self {
        Self {
            items,
            total,
            page: query.page(),
            limit: query.limit(),
        }
    }
}

/// List envelope returned by the upstream backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ListResponse<T> {
    pub fn into_page(self, query: &PageQuery) -> Page<T> {
        let total = self.total.unwrap_or(self.items.len() as u64);
        Page::new(self.items, total, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);

        let query = PageQuery { page: Some(3), limit: Some(500) };
        assert_eq!(query.page(), 3);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);

        let query = PageQuery { page: Some(0), limit: Some(0) };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_list_response_without_total() {
        let list: ListResponse<u8> = serde_json::from_str(r#"{"items":[1,2,3]}"#).unwrap();
        let page = list.into_page(&PageQuery::default());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
    }
}
