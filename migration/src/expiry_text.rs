//! 过期日期文本
//!
//! 表里统一存 `YYYY-MM-DD`。旧数据和用户输入可能是其他写法，
//! 读取、写入和数据迁移都经过这里的同一个解析器。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: [&str; 2] = [EXPIRY_FORMAT, "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// 解析一个过期日期，带时间的只取字符串里写明的日期
///
/// RFC 3339 时间不做时区换算：`2024-03-14T16:00:00Z` 就是 3 月 14 日。
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

pub fn format_expiry_date(date: NaiveDate) -> String {
    date.format(EXPIRY_FORMAT).to_string()
}

/// 已经是规范的 `YYYY-MM-DD`（补零、无时间）
pub fn is_canonical(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, EXPIRY_FORMAT)
        .map(|date| format_expiry_date(date) == raw)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_legacy_forms() {
        assert_eq!(parse_expiry_date("2024/01/01"), Some(date(2024, 1, 1)));
        assert_eq!(parse_expiry_date("2024-01-01 18:30"), Some(date(2024, 1, 1)));
        assert_eq!(parse_expiry_date("2024/01/01 18:30:05"), Some(date(2024, 1, 1)));
        assert_eq!(
            parse_expiry_date("2024-03-14T16:00:00Z"),
            Some(date(2024, 3, 14))
        );
        assert_eq!(parse_expiry_date("soon"), None);
        assert_eq!(parse_expiry_date("  "), None);
    }

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical("2024-01-01"));
        assert!(!is_canonical("2024-1-1"));
        assert!(!is_canonical("2024/01/01"));
        assert!(!is_canonical("2024-01-01T00:00:00Z"));
        assert!(!is_canonical(""));
    }
}
