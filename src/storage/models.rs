use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 一条短路径映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub path: String,
    pub target: String,
    pub name: Option<String>,
    /// 过期日期（含当天）
    pub expiry: Option<NaiveDate>,
    pub enabled: bool,
    pub is_wechat: bool,
    pub qr_code_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 分页查询结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingPage {
    pub mappings: Vec<Mapping>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl MappingPage {
    pub fn new(mappings: Vec<Mapping>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            mappings,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(MappingPage::new(vec![], 0, 1, 10).total_pages, 0);
        assert_eq!(MappingPage::new(vec![], 10, 1, 10).total_pages, 1);
        assert_eq!(MappingPage::new(vec![], 11, 1, 10).total_pages, 2);
    }

    #[test]
    fn test_mapping_serializes_camel_case() {
        let mapping = Mapping {
            path: "grp".to_string(),
            target: "https://example.com".to_string(),
            name: None,
            expiry: NaiveDate::from_ymd_opt(2024, 1, 1),
            enabled: true,
            is_wechat: true,
            qr_code_data: Some("data:image/png;base64,AAAA".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["isWechat"], true);
        assert_eq!(json["expiry"], "2024-01-01");
        assert_eq!(json["qrCodeData"], "data:image/png;base64,AAAA");
        assert!(json.get("createdAt").is_some());
    }
}
