//! 房源表读写

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;

use super::converters::{model_to_property, property_to_active_model};
use crate::errors::Result;
use crate::storage::models::{Property, PropertyFilter, PropertyStatus};
use migration::entities::{inquiry, listing_view, property, property_daily_analytics};

/// 房源部分更新，`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub address: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub description: Option<String>,
    pub status: Option<PropertyStatus>,
    pub image_url: Option<String>,
    pub sqft: Option<i32>,
    pub property_type: Option<String>,
}

/// 仪表盘用到的房源计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub total: u64,
    pub active: u64,
    pub pending: u64,
    pub sold_since: u64,
    pub value_sold_since: i64,
}

impl super::SeaOrmStorage {
    pub async fn find_property(&self, id: &str) -> Result<Option<Property>> {
        let model = self
            .retrying("find_property", || {
                property::Entity::find_by_id(id.to_string()).one(&self.db)
            })
            .await?;
        Ok(model.map(model_to_property))
    }

    /// 按过滤条件列出房源，最新创建的在前
    pub async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let mut query = property::Entity::find();
        if let Some(ref agent_id) = filter.agent_id {
            query = query.filter(property::Column::AgentId.eq(agent_id.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(property::Column::Status.eq(status.as_ref()));
        }

        let models = self
            .retrying("list_properties", || {
                query
                    .clone()
                    .order_by_desc(property::Column::CreatedAt)
                    .order_by_asc(property::Column::Id)
                    .all(&self.db)
            })
            .await?;

        Ok(models.into_iter().map(model_to_property).collect())
    }

    pub async fn find_properties_by_ids(&self, ids: &[String]) -> Result<Vec<Property>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = self
            .retrying("find_properties_by_ids", || {
                property::Entity::find()
                    .filter(property::Column::Id.is_in(ids.iter().cloned()))
                    .all(&self.db)
            })
            .await?;
        Ok(models.into_iter().map(model_to_property).collect())
    }

    pub async fn insert_property(&self, p: &Property) -> Result<()> {
        self.retrying("insert_property", || {
            property::Entity::insert(property_to_active_model(p)).exec_without_returning(&self.db)
        })
        .await?;
        info!("Property created: {} ({})", p.id, p.title);
        Ok(())
    }

    /// 部分更新，返回更新后的房源；房源不存在时返回 None
    pub async fn update_property(
        &self,
        id: &str,
        patch: &PropertyPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Property>> {
        let Some(existing) = self
            .retrying("find_property", || {
                property::Entity::find_by_id(id.to_string()).one(&self.db)
            })
            .await?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(ref title) = patch.title {
            active.title = Set(title.clone());
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(ref address) = patch.address {
            active.address = Set(address.clone());
        }
        if let Some(bedrooms) = patch.bedrooms {
            active.bedrooms = Set(bedrooms);
        }
        if let Some(bathrooms) = patch.bathrooms {
            active.bathrooms = Set(bathrooms);
        }
        if let Some(ref description) = patch.description {
            active.description = Set(description.clone());
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_ref().to_string());
        }
        if let Some(ref image_url) = patch.image_url {
            active.image_url = Set(Some(image_url.clone()));
        }
        if let Some(sqft) = patch.sqft {
            active.sqft = Set(Some(sqft));
        }
        if let Some(ref property_type) = patch.property_type {
            active.property_type = Set(Some(property_type.clone()));
        }
        active.updated_at = Set(now);

        let updated = self
            .retrying("update_property", || active.clone().update(&self.db))
            .await?;
        Ok(Some(model_to_property(updated)))
    }

    /// 删除房源及其咨询、浏览事件、单房源天级汇总（同一事务）
    ///
    /// 返回被删除数据涉及的日期（升序），房源不存在时返回 `None`。
    /// 全局天级汇总由调用方按这些日期重算。
    pub async fn delete_property_cascade(&self, id: &str) -> Result<Option<Vec<NaiveDate>>> {
        let txn = self.db.begin().await?;

        let view_days: Vec<NaiveDate> = listing_view::Entity::find()
            .select_only()
            .column(listing_view::Column::ViewDay)
            .filter(listing_view::Column::PropertyId.eq(id))
            .distinct()
            .into_tuple()
            .all(&txn)
            .await?;
        let inquiry_times: Vec<DateTime<Utc>> = inquiry::Entity::find()
            .select_only()
            .column(inquiry::Column::DateSubmitted)
            .filter(inquiry::Column::PropertyId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        let days: BTreeSet<NaiveDate> = view_days
            .into_iter()
            .chain(inquiry_times.iter().map(|t| t.date_naive()))
            .collect();

        inquiry::Entity::delete_many()
            .filter(inquiry::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;
        listing_view::Entity::delete_many()
            .filter(listing_view::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;
        property_daily_analytics::Entity::delete_many()
            .filter(property_daily_analytics::Column::PropertyId.eq(id))
            .exec(&txn)
            .await?;
        let result = property::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;
        info!("Property deleted: {} ({} affected day(s))", id, days.len());
        Ok(Some(days.into_iter().collect()))
    }

    /// 房源计数：总数、active、pending、`since` 之后售出的数量与总价
    pub async fn dashboard_counts(&self, since: DateTime<Utc>) -> Result<DashboardCounts> {
        let total = property::Entity::find().count(&self.db).await?;
        let active = property::Entity::find()
            .filter(property::Column::Status.eq(PropertyStatus::Active.as_ref()))
            .count(&self.db)
            .await?;
        let pending = property::Entity::find()
            .filter(property::Column::Status.eq(PropertyStatus::Pending.as_ref()))
            .count(&self.db)
            .await?;

        let sold_prices = self.sold_prices_since(since).await?;

        Ok(DashboardCounts {
            total,
            active,
            pending,
            sold_since: sold_prices.len() as u64,
            value_sold_since: sold_prices.iter().sum(),
        })
    }

    /// `since` 之后标记为售出（以 updated_at 计）的房源价格
    pub async fn sold_prices_since(&self, since: DateTime<Utc>) -> Result<Vec<i64>> {
        let prices: Vec<i64> = property::Entity::find()
            .select_only()
            .column(property::Column::Price)
            .filter(property::Column::Status.eq(PropertyStatus::Sold.as_ref()))
            .filter(property::Column::UpdatedAt.gte(since))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(prices)
    }

    /// 所有已售房源的 (date_listed, updated_at)
    pub async fn sold_listing_dates(&self) -> Result<Vec<(NaiveDate, DateTime<Utc>)>> {
        let rows: Vec<(NaiveDate, DateTime<Utc>)> = property::Entity::find()
            .select_only()
            .column(property::Column::DateListed)
            .column(property::Column::UpdatedAt)
            .filter(property::Column::Status.eq(PropertyStatus::Sold.as_ref()))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// 经纪人最近创建的房源
    pub async fn recent_listings(&self, agent_id: &str, limit: u64) -> Result<Vec<Property>> {
        let models = property::Entity::find()
            .filter(property::Column::AgentId.eq(agent_id))
            .order_by_desc(property::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_property).collect())
    }

    /// 经纪人在 `since` 之后更新、但在此之前创建的房源（状态变更）
    pub async fn recently_updated_listings(
        &self,
        agent_id: &str,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Property>> {
        let models = property::Entity::find()
            .filter(property::Column::AgentId.eq(agent_id))
            .filter(property::Column::UpdatedAt.gte(since))
            .filter(property::Column::CreatedAt.lt(since))
            .order_by_desc(property::Column::UpdatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_property).collect())
    }
}
