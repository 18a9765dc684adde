//! Status and list filters shared by the admin-managed records
//! (promotions, clinics, tags, questions).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels::RECORD_STATUS;
use crate::page::PageQuery;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn code(&self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Inactive => "INACTIVE",
        }
    }

    pub fn label(&self) -> &'static str {
        RECORD_STATUS.label(self.code())
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Query parameters of the admin data tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<RecordStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListFilter {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn to_query_string(&self) -> String {
        let page = self.page_query();
        let mut parts = Vec::new();

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={}", status.code()));
        }
        parts.push(format!("page={}", page.page()));
        parts.push(format!("limit={}", page.limit()));

        parts.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RecordStatus::default(), RecordStatus::Active);
        assert_eq!(RecordStatus::Inactive.to_string(), "INACTIVE");
        assert_eq!(RecordStatus::Inactive.label(), "Inactive");
        assert_eq!(
            serde_json::from_str::<RecordStatus>("\"ACTIVE\"").unwrap(),
            RecordStatus::Active
        );
    }

    #[test]
    fn test_filter_query_string() {
        assert_eq!(ListFilter::default().to_query_string(), "page=1&limit=20");

        let filter = ListFilter {
            search: Some("  city clinic ".to_string()),
            status: Some(RecordStatus::Active),
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(
            filter.to_query_string(),
            "search=city%20clinic&status=ACTIVE&page=2&limit=10"
        );

        let blank = ListFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!blank.to_query_string().contains("search"));
    }
}
