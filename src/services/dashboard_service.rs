//! Agent dashboard service
//!
//! 本月统计和经纪人最近动态。月份边界按 UTC 计算。

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use strum::{AsRefStr, Display};
use ts_rs::TS;

use crate::analytics::round2;
use crate::config::TS_EXPORT_PATH;
use crate::errors::Result;
use crate::storage::{CurrentAgent, SeaOrmStorage};
use crate::utils::time::time_ago;

/// 没有已售房源时的平均在售天数
pub const DEFAULT_TIME_ON_MARKET_DAYS: i64 = 45;

const ACTIVITY_SOURCE_LIMIT: u64 = 5;
const ACTIVITY_FEED_LIMIT: usize = 10;
const STATUS_CHANGE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_listings: u64,
    pub active_listings: u64,
    pub pending_listings: u64,
    pub sold_this_month: u64,
    pub total_value_sold: i64,
    pub new_inquiries: i64,
    pub average_views: i64,
    pub conversion_rate: f64,
    pub average_time_on_market: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, AsRefStr, Display)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    Listing,
    Inquiry,
    StatusChange,
}

/// 动态流中的一条
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub time: String,
    pub timestamp: DateTime<Utc>,
    pub property_id: String,
    pub property_title: String,
}

/// 当月第一天 00:00 UTC
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// 已售房源的平均在售天数（上架日到最后更新时间，按整天向下取整）
pub fn average_time_on_market(sold: &[(NaiveDate, DateTime<Utc>)]) -> i64 {
    if sold.is_empty() {
        return DEFAULT_TIME_ON_MARKET_DAYS;
    }
    let total_days: i64 = sold
        .iter()
        .map(|(listed, sold_at)| {
            let listed_at = listed.and_time(NaiveTime::MIN).and_utc();
            (*sold_at - listed_at).num_seconds().div_euclid(86_400)
        })
        .sum();
    (total_days as f64 / sold.len() as f64).round() as i64
}

/// 咨询数 / active 房源数 × 100，保留两位小数
pub fn conversion_rate(new_inquiries: i64, active_listings: u64) -> f64 {
    if active_listings == 0 {
        return 0.0;
    }
    round2(new_inquiries as f64 / active_listings as f64 * 100.0)
}

/// 按时间倒序合并并截取前 `limit` 条
fn merge_activity(mut items: Vec<ActivityItem>, limit: usize) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(limit);
    items
}

pub struct DashboardService {
    storage: Arc<SeaOrmStorage>,
}

impl DashboardService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let since = month_start(now);

        let counts = self.storage.dashboard_counts(since).await?;
        let new_inquiries = self.storage.count_inquiries_since(since).await?;
        let views_this_month = self.storage.count_views_since(since).await?;
        let sold = self.storage.sold_listing_dates().await?;

        let average_views = if counts.active > 0 {
            (views_this_month as f64 / counts.active as f64).round() as i64
        } else {
            0
        };

        Ok(DashboardStats {
            total_listings: counts.total,
            active_listings: counts.active,
            pending_listings: counts.pending,
            sold_this_month: counts.sold_since,
            total_value_sold: counts.value_sold_since,
            new_inquiries,
            average_views,
            conversion_rate: conversion_rate(new_inquiries, counts.active),
            average_time_on_market: average_time_on_market(&sold),
        })
    }

    /// 经纪人最近动态：新上架、新咨询、状态变更，最新在前
    pub async fn recent_activity(
        &self,
        agent: &CurrentAgent,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActivityItem>> {
        let mut items = Vec::new();

        for listing in self
            .storage
            .recent_listings(&agent.id, ACTIVITY_SOURCE_LIMIT)
            .await?
        {
            items.push(ActivityItem {
                id: format!("listing-{}", listing.id),
                kind: ActivityKind::Listing,
                description: format!("{} was listed", listing.title),
                time: time_ago(listing.created_at, now),
                timestamp: listing.created_at,
                property_id: listing.id,
                property_title: listing.title,
            });
        }

        for entry in self
            .storage
            .list_inquiries(Some(&agent.id), Some(ACTIVITY_SOURCE_LIMIT))
            .await?
        {
            // 经纪人过滤保证房源存在
            let Some(property) = entry.property else {
                continue;
            };
            let submitted = entry.inquiry.date_submitted;
            items.push(ActivityItem {
                id: format!("inquiry-{}", entry.inquiry.id),
                kind: ActivityKind::Inquiry,
                description: format!("New inquiry for {}", property.title),
                time: time_ago(submitted, now),
                timestamp: submitted,
                property_id: property.id,
                property_title: property.title,
            });
        }

        let window_start = now - Duration::days(STATUS_CHANGE_WINDOW_DAYS);
        for update in self
            .storage
            .recently_updated_listings(&agent.id, window_start, ACTIVITY_SOURCE_LIMIT)
            .await?
        {
            items.push(ActivityItem {
                id: format!(
                    "status-{}-{}",
                    update.id,
                    update.updated_at.timestamp_millis()
                ),
                kind: ActivityKind::StatusChange,
                description: format!("{} status changed to {}", update.title, update.status),
                time: time_ago(update.updated_at, now),
                timestamp: update.updated_at,
                property_id: update.id,
                property_title: update.title,
            });
        }

        Ok(merge_activity(items, ACTIVITY_FEED_LIMIT))
    }
}
