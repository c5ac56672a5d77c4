//! 房源浏览统计
//!
//! - recorder: 写入浏览事件（每会话每天去重），写入后触发当天重算
//! - aggregator: 从原始日志重算单房源 / 全局天级汇总
//! - trend: 按滚动窗口计算环比

pub mod aggregator;
pub mod recorder;
pub mod trend;

pub use aggregator::{Aggregator, DaySummary, RangeReport};
pub use recorder::{EventRecorder, RecordOutcome};
pub use trend::{DailyPoint, Trend, compute_trend, round2};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// 浏览请求附带的元数据（来自 HTTP 头）
#[derive(Debug, Clone, Default)]
pub struct ViewMetadata {
    /// User-Agent，缺失时为空串
    pub user_agent: String,
    /// 客户端 IP，无法识别时为 "unknown"
    pub ip_address: String,
    /// Referer，缺失时为空串
    pub referrer: String,
}

/// 某天的 UTC 时间窗口 [00:00, 次日 00:00)
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
