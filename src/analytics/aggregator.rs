//! 天级汇总重算
//!
//! 每次重算都从原始浏览日志和咨询表重新计数，再整行覆盖写入汇总表，
//! 因此重复执行结果不变。同一进程内的重算串行执行，计数和写入之间
//! 不会插入另一次重算，最后写入的一方总是完整计数。

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::day_window;
use crate::errors::{ProperviewError, Result};
use crate::storage::{DailyCounts, SeaOrmStorage};

static RECOMPUTE_LOCK: Mutex<()> = Mutex::const_new(());

/// 一天重算的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub global: DailyCounts,
    pub properties_updated: usize,
}

/// 区间回填结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeReport {
    pub days: usize,
    pub property_rows: usize,
    pub total_views: i64,
}

#[derive(Clone)]
pub struct Aggregator {
    storage: Arc<SeaOrmStorage>,
}

impl Aggregator {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 重算指定日期：涉及的每个房源一行，外加全局一行
    pub async fn recompute_day(&self, date: NaiveDate, property_ids: &[String]) -> Result<DaySummary> {
        let _guard = RECOMPUTE_LOCK.lock().await;
        let (start, end) = day_window(date);

        let touched: BTreeSet<&str> = property_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect();

        for &property_id in &touched {
            let (views, unique_visitors) = self
                .storage
                .view_counts_between(Some(property_id), start, end)
                .await?;
            let inquiries = self
                .storage
                .count_inquiries_between(Some(property_id), start, end)
                .await?;

            let counts = DailyCounts {
                views,
                unique_visitors,
                inquiries,
            };
            self.storage
                .upsert_property_daily(property_id, date, counts)
                .await?;

            debug!(
                "Property daily recomputed: {} {} views={} unique={} inquiries={}",
                property_id, date, views, unique_visitors, inquiries
            );
        }

        let (views, unique_visitors) = self.storage.view_counts_between(None, start, end).await?;
        let inquiries = self
            .storage
            .count_inquiries_between(None, start, end)
            .await?;
        let global = DailyCounts {
            views,
            unique_visitors,
            inquiries,
        };
        self.storage.upsert_global_daily(date, global).await?;

        Ok(DaySummary {
            date,
            global,
            properties_updated: touched.len(),
        })
    }

    /// 回填 [from, to]（含两端）内每一天
    ///
    /// 当天有浏览或咨询的房源都会重算。
    pub async fn recompute_range(&self, from: NaiveDate, to: NaiveDate) -> Result<RangeReport> {
        if from > to {
            return Err(ProperviewError::validation(format!(
                "Invalid date range: {} is after {}",
                from, to
            )));
        }

        let mut report = RangeReport::default();
        let mut date = from;
        while date <= to {
            let (start, end) = day_window(date);

            let mut ids: BTreeSet<String> = self
                .storage
                .view_property_ids_between(start, end)
                .await?
                .into_iter()
                .collect();
            ids.extend(
                self.storage
                    .inquiry_property_ids_between(start, end)
                    .await?,
            );
            let ids: Vec<String> = ids.into_iter().collect();

            let summary = self.recompute_day(date, &ids).await?;
            report.days += 1;
            report.property_rows += summary.properties_updated;
            report.total_views += summary.global.views;

            date += Duration::days(1);
        }

        info!(
            "Recomputed {} day(s) from {} to {}: {} property rows, {} views",
            report.days, from, to, report.property_rows, report.total_views
        );
        Ok(report)
    }
}
