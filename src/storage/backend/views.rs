//! 浏览事件日志读写

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, OnConflict},
};
use tracing::debug;

use super::converters::view_to_active_model;
use crate::errors::Result;
use crate::storage::models::NewViewEvent;
use migration::entities::listing_view;

/// 单房源浏览合计
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ViewTotals {
    pub property_id: String,
    pub views: i64,
    pub unique_visitors: i64,
}

/// 全局合计查询结果行
#[derive(Debug, FromQueryResult)]
struct CountRow {
    views: i64,
    unique_visitors: i64,
}

const DISTINCT_SESSIONS: &str = "COUNT(DISTINCT session_id)";

impl super::SeaOrmStorage {
    /// 写入浏览事件，同一 (property_id, session_id, view_day) 已存在时不写入
    ///
    /// 返回是否真正写入。去重依赖唯一索引，并发重复请求只会有一条成功。
    pub async fn insert_view_dedup(&self, event: &NewViewEvent) -> Result<bool> {
        let result = self
            .retrying("insert_view", || async {
                let outcome = listing_view::Entity::insert(view_to_active_model(event))
                    .on_conflict(
                        OnConflict::columns([
                            listing_view::Column::PropertyId,
                            listing_view::Column::SessionId,
                            listing_view::Column::ViewDay,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(&self.db)
                    .await;

                match outcome {
                    Ok(rows) => Ok(rows > 0),
                    Err(DbErr::RecordNotInserted) => Ok(false),
                    Err(e) => Err(e),
                }
            })
            .await?;

        if !result {
            debug!(
                "Duplicate view ignored: property={} session={}",
                event.property_id, event.session_id
            );
        }
        Ok(result)
    }

    /// [start, end) 内单房源的浏览数与独立会话数
    pub async fn view_counts_between(
        &self,
        property_id: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(i64, i64)> {
        let mut query = listing_view::Entity::find()
            .select_only()
            .column_as(listing_view::Column::Id.count(), "views")
            .column_as(Expr::cust(DISTINCT_SESSIONS), "unique_visitors")
            .filter(listing_view::Column::ViewedAt.gte(start))
            .filter(listing_view::Column::ViewedAt.lt(end));
        if let Some(property_id) = property_id {
            query = query.filter(listing_view::Column::PropertyId.eq(property_id));
        }

        let row = self
            .retrying("count_views", || {
                query.clone().into_model::<CountRow>().one(&self.db)
            })
            .await?;

        Ok(row.map(|r| (r.views, r.unique_visitors)).unwrap_or((0, 0)))
    }

    /// [start, end) 内有浏览的房源
    pub async fn view_property_ids_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let ids: Vec<String> = listing_view::Entity::find()
            .select_only()
            .column(listing_view::Column::PropertyId)
            .filter(listing_view::Column::ViewedAt.gte(start))
            .filter(listing_view::Column::ViewedAt.lt(end))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// 按房源分组的全部浏览合计，可限定房源集合
    pub async fn view_totals_by_property(
        &self,
        property_ids: Option<&[String]>,
    ) -> Result<Vec<ViewTotals>> {
        let mut query = listing_view::Entity::find()
            .select_only()
            .column(listing_view::Column::PropertyId)
            .column_as(listing_view::Column::Id.count(), "views")
            .column_as(Expr::cust(DISTINCT_SESSIONS), "unique_visitors");
        if let Some(ids) = property_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(listing_view::Column::PropertyId.is_in(ids.iter().cloned()));
        }

        let rows = query
            .group_by(listing_view::Column::PropertyId)
            .into_model::<ViewTotals>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// 单房源全部浏览合计
    pub async fn property_view_totals(&self, property_id: &str) -> Result<(i64, i64)> {
        let row = listing_view::Entity::find()
            .select_only()
            .column_as(listing_view::Column::Id.count(), "views")
            .column_as(Expr::cust(DISTINCT_SESSIONS), "unique_visitors")
            .filter(listing_view::Column::PropertyId.eq(property_id))
            .into_model::<CountRow>()
            .one(&self.db)
            .await?;
        Ok(row.map(|r| (r.views, r.unique_visitors)).unwrap_or((0, 0)))
    }

    /// `since` 之后的浏览事件数
    pub async fn count_views_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count = listing_view::Entity::find()
            .filter(listing_view::Column::ViewedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count as i64)
    }
}
