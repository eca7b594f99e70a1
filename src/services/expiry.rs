//! 过期日期的解析与"今天"的计算
//!
//! 过期日期是日历日期，当天全天有效。服务所在时区由 `utc_offset_minutes` 决定，
//! 报告窗口和清理阈值都从这里取日界。

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use migration::expiry_text::parse_expiry_date;

use crate::errors::{LivelinkError, Result};

/// 解析用户提交的过期日期
///
/// 空字符串视为未设置。接受 `YYYY-MM-DD`、`YYYY/MM/DD`、RFC 3339 时间，
/// 以及 `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DDTHH:MM[:SS]`。
/// 带时间的只保留字符串里写明的日期，不换算到服务时区：
/// 过期日期是日历日期，写下的那一天就是最后有效日。
pub fn parse_expiry(input: &str) -> Result<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    match parse_expiry_date(input) {
        Some(date) => Ok(Some(date)),
        None => Err(LivelinkError::invalid_expiry(format!(
            "Invalid expiry date: '{}'",
            input
        ))),
    }
}

/// 服务时区下的日历
#[derive(Debug, Clone, Copy)]
pub struct ExpiryClock {
    offset: FixedOffset,
}

impl Default for ExpiryClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl ExpiryClock {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// 超出 ±24h 的偏移按 UTC 处理
    pub fn from_offset_minutes(minutes: i32) -> Self {
        match minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Self { offset },
            None => {
                tracing::warn!("utc_offset_minutes {} out of range, using UTC", minutes);
                Self::utc()
            }
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 给定时刻在服务时区下的日期
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }

    /// 清理阈值：过期日零点早于 now 的映射应删除
    ///
    /// 对日期而言即 `expiry < cutoff`。now 恰好是零点时 cutoff 为今天，否则为明天。
    pub fn purge_cutoff(&self, now: DateTime<Utc>) -> NaiveDate {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();
        if local.time() == NaiveTime::MIN {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_expiry_formats() {
        assert_eq!(parse_expiry("2024-01-01").unwrap(), Some(date(2024, 1, 1)));
        assert_eq!(parse_expiry(" 2024/02/29 ").unwrap(), Some(date(2024, 2, 29)));
        assert_eq!(
            parse_expiry("2024-03-15T23:59:59.999Z").unwrap(),
            Some(date(2024, 3, 15))
        );
        assert_eq!(parse_expiry("2024-03-15T08:30").unwrap(), Some(date(2024, 3, 15)));
        assert_eq!(parse_expiry("2024-03-15 08:30").unwrap(), Some(date(2024, 3, 15)));
        assert_eq!(parse_expiry("2024-03-15 08:30:00").unwrap(), Some(date(2024, 3, 15)));
        assert_eq!(parse_expiry("").unwrap(), None);
    }

    #[test]
    fn test_parse_expiry_keeps_written_date() {
        // 同一时刻的两种写法各自保留字符串里的日期
        assert_eq!(
            parse_expiry("2024-03-15T00:00:00+08:00").unwrap(),
            Some(date(2024, 3, 15))
        );
        assert_eq!(
            parse_expiry("2024-03-14T16:00:00Z").unwrap(),
            Some(date(2024, 3, 14))
        );
    }

    #[test]
    fn test_parse_expiry_rejects_garbage() {
        assert!(matches!(
            parse_expiry("next week"),
            Err(LivelinkError::InvalidExpiry(_))
        ));
        assert!(matches!(
            parse_expiry("2023-02-29"),
            Err(LivelinkError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn test_today_respects_offset() {
        let now = Utc.with_ymd_and_hms(2024, 1, 4, 20, 0, 0).unwrap();
        assert_eq!(ExpiryClock::utc().today_at(now), date(2024, 1, 4));
        assert_eq!(
            ExpiryClock::from_offset_minutes(8 * 60).today_at(now),
            date(2024, 1, 5)
        );
    }

    #[test]
    fn test_purge_cutoff() {
        let clock = ExpiryClock::utc();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(clock.purge_cutoff(midnight), date(2024, 1, 5));

        let morning = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(clock.purge_cutoff(morning), date(2024, 1, 6));
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let clock = ExpiryClock::from_offset_minutes(48 * 60);
        assert_eq!(clock.offset().local_minus_utc(), 0);
    }
}
