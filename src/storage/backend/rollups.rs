//! 天级汇总表写入与读取
//!
//! 汇总行只由重算写入，写入方式为整行覆盖的原子 upsert。

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};

use crate::errors::Result;
use crate::storage::models::DailyCounts;
use migration::entities::{global_daily_analytics, property_daily_analytics};

impl super::SeaOrmStorage {
    /// 覆盖写入单房源某天的汇总
    pub async fn upsert_property_daily(
        &self,
        property_id: &str,
        date: NaiveDate,
        counts: DailyCounts,
    ) -> Result<()> {
        self.retrying("upsert_property_daily", || {
            let model = property_daily_analytics::ActiveModel {
                id: NotSet,
                property_id: Set(property_id.to_string()),
                date: Set(date),
                views: Set(counts.views),
                unique_visitors: Set(counts.unique_visitors),
                inquiries: Set(counts.inquiries),
            };

            property_daily_analytics::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        property_daily_analytics::Column::PropertyId,
                        property_daily_analytics::Column::Date,
                    ])
                    .update_columns([
                        property_daily_analytics::Column::Views,
                        property_daily_analytics::Column::UniqueVisitors,
                        property_daily_analytics::Column::Inquiries,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
        })
        .await?;
        Ok(())
    }

    /// 覆盖写入某天的全局汇总
    pub async fn upsert_global_daily(&self, date: NaiveDate, counts: DailyCounts) -> Result<()> {
        self.retrying("upsert_global_daily", || {
            let model = global_daily_analytics::ActiveModel {
                id: NotSet,
                date: Set(date),
                total_views: Set(counts.views),
                unique_visitors: Set(counts.unique_visitors),
                total_inquiries: Set(counts.inquiries),
            };

            global_daily_analytics::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(global_daily_analytics::Column::Date)
                        .update_columns([
                            global_daily_analytics::Column::TotalViews,
                            global_daily_analytics::Column::UniqueVisitors,
                            global_daily_analytics::Column::TotalInquiries,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
        })
        .await?;
        Ok(())
    }

    pub async fn property_daily(
        &self,
        property_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyCounts>> {
        let row = property_daily_analytics::Entity::find()
            .filter(property_daily_analytics::Column::PropertyId.eq(property_id))
            .filter(property_daily_analytics::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(row.map(|r| DailyCounts {
            views: r.views,
            unique_visitors: r.unique_visitors,
            inquiries: r.inquiries,
        }))
    }

    pub async fn global_daily(&self, date: NaiveDate) -> Result<Option<DailyCounts>> {
        let row = global_daily_analytics::Entity::find()
            .filter(global_daily_analytics::Column::Date.eq(date))
            .one(&self.db)
            .await?;
        Ok(row.map(|r| DailyCounts {
            views: r.total_views,
            unique_visitors: r.unique_visitors,
            inquiries: r.total_inquiries,
        }))
    }

    /// `from` 起（含）的全局天级汇总，按日期升序
    pub async fn global_daily_since(
        &self,
        from: NaiveDate,
    ) -> Result<Vec<(NaiveDate, DailyCounts)>> {
        let rows = global_daily_analytics::Entity::find()
            .filter(global_daily_analytics::Column::Date.gte(from))
            .order_by_asc(global_daily_analytics::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.date,
                    DailyCounts {
                        views: r.total_views,
                        unique_visitors: r.unique_visitors,
                        inquiries: r.total_inquiries,
                    },
                )
            })
            .collect())
    }
}
