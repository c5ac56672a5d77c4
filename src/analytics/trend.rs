//! 环比趋势计算
//!
//! 输入为按日期倒序（最近一天在前）的天级序列，取前 w 天为本期、
//! 接下来 w 天为上期，不足的部分按已有数据计算。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;

/// 趋势计算用的单日数据点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyPoint {
    pub views: i64,
    pub inquiries: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub views_trend_pct: f64,
    pub inquiries_trend_pct: f64,
}

/// 保留两位小数，.5 远离零舍入
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent_change(recent: i64, previous: i64) -> f64 {
    if previous > 0 {
        round2((recent - previous) as f64 / previous as f64 * 100.0)
    } else {
        0.0
    }
}

/// 计算浏览量与咨询量的环比变化百分比
pub fn compute_trend(series: &[DailyPoint], window_days: usize) -> Trend {
    let recent_end = window_days.min(series.len());
    let previous_end = window_days.saturating_mul(2).min(series.len());

    let recent = &series[..recent_end];
    let previous = &series[recent_end..previous_end];

    let sum = |points: &[DailyPoint], f: fn(&DailyPoint) -> i64| -> i64 {
        points.iter().map(f).sum()
    };

    Trend {
        views_trend_pct: percent_change(sum(recent, |p| p.views), sum(previous, |p| p.views)),
        inquiries_trend_pct: percent_change(
            sum(recent, |p| p.inquiries),
            sum(previous, |p| p.inquiries),
        ),
    }
}
