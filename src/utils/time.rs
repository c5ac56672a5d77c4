//! 相对时间标签

use chrono::{DateTime, Datelike, Utc};

/// 把时间点格式化为相对 `now` 的标签
///
/// 一分钟以内（含将来时间）为 "Just now"，七天及以上退化为 `M/D/YYYY`。
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes();
    if minutes <= 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        };
    }

    let days = hours / 24;
    if days < 7 {
        return if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{} days ago", days)
        };
    }

    format!("{}/{}/{}", ts.month(), ts.day(), ts.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(time_ago(at(2024, 1, 15, 11, 59, 30), now()), "Just now");
        assert_eq!(time_ago(at(2024, 1, 15, 11, 59, 0), now()), "Just now");
        // 将来时间
        assert_eq!(time_ago(at(2024, 1, 16, 12, 0, 0), now()), "Just now");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(time_ago(at(2024, 1, 15, 11, 58, 0), now()), "2 minutes ago");
        assert_eq!(time_ago(at(2024, 1, 15, 11, 1, 0), now()), "59 minutes ago");
    }

    #[test]
    fn test_hours() {
        assert_eq!(time_ago(at(2024, 1, 15, 11, 0, 0), now()), "1 hour ago");
        assert_eq!(time_ago(at(2024, 1, 15, 0, 0, 0), now()), "12 hours ago");
        assert_eq!(time_ago(at(2024, 1, 14, 13, 0, 0), now()), "23 hours ago");
    }

    #[test]
    fn test_days() {
        assert_eq!(time_ago(at(2024, 1, 14, 12, 0, 0), now()), "1 day ago");
        assert_eq!(time_ago(at(2024, 1, 9, 12, 0, 0), now()), "6 days ago");
    }

    #[test]
    fn test_older_dates_are_formatted() {
        assert_eq!(time_ago(at(2024, 1, 8, 12, 0, 0), now()), "1/8/2024");
        assert_eq!(time_ago(at(2023, 12, 1, 12, 0, 0), now()), "12/1/2023");
    }
}
