//! Analytics query service
//!
//! 读侧接口：汇总面板、热门房源、单房源统计。
//!
//! - 汇总和图表数据读取全局天级汇总表
//! - 今日数据、热门房源、单房源统计直接从原始日志实时计数

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::analytics::{DailyPoint, compute_trend, day_window};
use crate::config::{AnalyticsConfig, TS_EXPORT_PATH};
use crate::errors::{ProperviewError, Result};
use crate::storage::{SeaOrmStorage, ViewTotals};

// ============ 公共类型定义 ============

/// 热门房源
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct TopProperty {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: i64,
    pub views: i64,
    pub inquiries: i64,
    pub unique_visitors: i64,
}

/// 单房源全部统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalytics {
    pub views: i64,
    pub inquiries: i64,
    pub unique_visitors: i64,
}

/// 图表数据点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub views: i64,
    pub inquiries: i64,
    pub unique_visitors: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_views: i64,
    pub total_inquiries: i64,
    pub total_sales_value: i64,
    pub views_trend: f64,
    pub inquiries_trend: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub views: i64,
    pub inquiries: i64,
    pub unique_visitors: i64,
}

/// 汇总面板
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub summary: SummaryTotals,
    pub chart_data: Vec<ChartPoint>,
    pub top_properties: Vec<TopProperty>,
    pub today: TodayStats,
}

/// 按浏览量排序取前 n 个：浏览量降序，相同时按 id 升序
pub fn rank_top_properties(mut totals: Vec<ViewTotals>, n: usize) -> Vec<ViewTotals> {
    totals.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then_with(|| a.property_id.cmp(&b.property_id))
    });
    totals.truncate(n);
    totals
}

// ============ AnalyticsService ============

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>, config: AnalyticsConfig) -> Self {
        Self { storage, config }
    }

    /// 全部时间浏览量最高的 n 个房源
    ///
    /// 已删除房源的浏览记录会被跳过，因此结果可能少于 n 个。
    pub async fn top_properties(&self, n: usize) -> Result<Vec<TopProperty>> {
        let totals = self.storage.view_totals_by_property(None).await?;
        self.attach_details(totals, n).await
    }

    /// 在给定房源范围内取前 n 个，没有浏览的房源以 0 计入
    pub async fn top_properties_among(&self, ids: &[String], n: usize) -> Result<Vec<TopProperty>> {
        if ids.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        let mut totals: HashMap<String, ViewTotals> = self
            .storage
            .view_totals_by_property(Some(ids))
            .await?
            .into_iter()
            .map(|t| (t.property_id.clone(), t))
            .collect();
        for id in ids {
            totals.entry(id.clone()).or_insert_with(|| ViewTotals {
                property_id: id.clone(),
                views: 0,
                unique_visitors: 0,
            });
        }

        self.attach_details(totals.into_values().collect(), n).await
    }

    /// 排序后补充房源信息和咨询数
    async fn attach_details(
        &self,
        totals: Vec<ViewTotals>,
        n: usize,
    ) -> Result<Vec<TopProperty>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        // 已删除的房源会被过滤，按全量排序后逐个补齐到 n 个
        let ranked = rank_top_properties(totals, usize::MAX);
        let candidate_ids: Vec<String> = ranked.iter().map(|t| t.property_id.clone()).collect();

        let properties: HashMap<String, _> = self
            .storage
            .find_properties_by_ids(&candidate_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let kept: Vec<ViewTotals> = ranked
            .into_iter()
            .filter(|t| properties.contains_key(&t.property_id))
            .take(n)
            .collect();

        if kept.len() < candidate_ids.len().min(n) {
            debug!("Skipped view totals of properties that no longer exist");
        }

        let kept_ids: Vec<String> = kept.iter().map(|t| t.property_id.clone()).collect();
        let inquiries = self.storage.inquiry_totals_by_property(&kept_ids).await?;

        Ok(kept
            .into_iter()
            .filter_map(|t| {
                let p = properties.get(&t.property_id)?;
                Some(TopProperty {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    address: p.address.clone(),
                    price: p.price,
                    views: t.views,
                    inquiries: inquiries.get(&t.property_id).copied().unwrap_or(0),
                    unique_visitors: t.unique_visitors,
                })
            })
            .collect())
    }

    /// 单房源全部时间统计，房源不存在时返回 NotFound
    pub async fn property_analytics(&self, property_id: &str) -> Result<PropertyAnalytics> {
        if self.storage.find_property(property_id).await?.is_none() {
            return Err(ProperviewError::not_found("Property not found"));
        }

        let (views, unique_visitors) = self.storage.property_view_totals(property_id).await?;
        let inquiries = self.storage.count_property_inquiries(property_id).await?;

        Ok(PropertyAnalytics {
            views,
            inquiries,
            unique_visitors,
        })
    }

    /// 汇总面板
    pub async fn summary(&self, now: DateTime<Utc>) -> Result<AnalyticsSummary> {
        let today = now.date_naive();
        let window_start = today - Duration::days(self.config.summary_days);

        // 升序
        let rows = self.storage.global_daily_since(window_start).await?;

        let total_views = rows.iter().map(|(_, c)| c.views).sum();
        let total_inquiries = rows.iter().map(|(_, c)| c.inquiries).sum();

        // 趋势计算需要最近一天在前
        let series: Vec<DailyPoint> = rows
            .iter()
            .rev()
            .map(|(_, c)| DailyPoint {
                views: c.views,
                inquiries: c.inquiries,
            })
            .collect();
        let trend = compute_trend(&series, self.config.trend_window_days);

        let sold_since = window_start.and_time(chrono::NaiveTime::MIN).and_utc();
        let total_sales_value = self
            .storage
            .sold_prices_since(sold_since)
            .await?
            .into_iter()
            .sum();

        let chart_data = rows
            .into_iter()
            .map(|(date, c)| ChartPoint {
                date,
                views: c.views,
                inquiries: c.inquiries,
                unique_visitors: c.unique_visitors,
            })
            .collect();

        let top_properties = self
            .top_properties(self.config.top_properties_limit)
            .await?;

        let (start, end) = day_window(today);
        let (views, unique_visitors) = self.storage.view_counts_between(None, start, end).await?;
        let inquiries = self
            .storage
            .count_inquiries_between(None, start, end)
            .await?;

        Ok(AnalyticsSummary {
            summary: SummaryTotals {
                total_views,
                total_inquiries,
                total_sales_value,
                views_trend: trend.views_trend_pct,
                inquiries_trend: trend.inquiries_trend_pct,
            },
            chart_data,
            top_properties,
            today: TodayStats {
                views,
                inquiries,
                unique_visitors,
            },
        })
    }
}
