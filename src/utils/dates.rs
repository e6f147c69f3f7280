//! 日期工具：周起点、时间戳解析与西班牙语日期格式

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// 所在周的周一 00:00 (UTC)
pub fn week_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    Utc.from_utc_datetime(&monday.and_time(NaiveTime::MIN))
}

/// 最近 `count` 周的起点，最早的在前
pub fn recent_week_starts(now: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    let current = week_start(now);
    (0..count)
        .rev()
        .map(|i| current - Duration::weeks(i as i64))
        .collect()
}

/// 解析 RFC 3339 时间戳，失败返回 None
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `YYYY-MM-DD` 或 RFC 3339 转为 `d/m/yyyy`，无法解析时原样返回
pub fn format_es_date(value: &str) -> String {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|dt| dt.date_naive()));
    match date {
        Some(d) => format!("{}/{}/{}", d.day(), d.month(), d.year()),
        None => value.to_string(),
    }
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
