//! 咨询表读写

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use super::converters::{inquiry_to_active_model, model_to_inquiry, model_to_property_ref};
use crate::errors::Result;
use crate::storage::models::{Inquiry, InquiryWithProperty};
use migration::entities::{inquiry, property};

impl super::SeaOrmStorage {
    pub async fn insert_inquiry(&self, i: &Inquiry) -> Result<()> {
        self.retrying("insert_inquiry", || {
            inquiry::Entity::insert(inquiry_to_active_model(i)).exec_without_returning(&self.db)
        })
        .await?;
        Ok(())
    }

    pub async fn find_inquiry(&self, id: &str) -> Result<Option<Inquiry>> {
        let model = inquiry::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_inquiry))
    }

    /// 修改已读状态，咨询不存在时返回 None
    pub async fn set_inquiry_read(&self, id: &str, is_read: bool) -> Result<Option<Inquiry>> {
        let Some(model) = inquiry::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.is_read = Set(is_read);
        let updated = self
            .retrying("set_inquiry_read", || active.clone().update(&self.db))
            .await?;
        Ok(Some(model_to_inquiry(updated)))
    }

    /// 列出咨询并附带房源摘要，最新提交的在前
    ///
    /// 指定 `agent_id` 时只返回该经纪人房源下的咨询。
    pub async fn list_inquiries(
        &self,
        agent_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<InquiryWithProperty>> {
        let mut query = inquiry::Entity::find();

        if let Some(agent_id) = agent_id {
            let property_ids: Vec<String> = property::Entity::find()
                .select_only()
                .column(property::Column::Id)
                .filter(property::Column::AgentId.eq(agent_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            if property_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(inquiry::Column::PropertyId.is_in(property_ids));
        }

        let inquiries = query
            .order_by_desc(inquiry::Column::DateSubmitted)
            .order_by_asc(inquiry::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        let mut property_ids: Vec<String> =
            inquiries.iter().map(|i| i.property_id.clone()).collect();
        property_ids.sort();
        property_ids.dedup();

        let properties: HashMap<String, property::Model> = if property_ids.is_empty() {
            HashMap::new()
        } else {
            property::Entity::find()
                .filter(property::Column::Id.is_in(property_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect()
        };

        Ok(inquiries
            .into_iter()
            .map(|model| {
                let property = properties.get(&model.property_id).map(model_to_property_ref);
                InquiryWithProperty {
                    inquiry: model_to_inquiry(model),
                    property,
                }
            })
            .collect())
    }

    /// 统计 [start, end) 内提交的咨询数，可限定单个房源
    pub async fn count_inquiries_between(
        &self,
        property_id: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let mut query = inquiry::Entity::find()
            .filter(inquiry::Column::DateSubmitted.gte(start))
            .filter(inquiry::Column::DateSubmitted.lt(end));
        if let Some(property_id) = property_id {
            query = query.filter(inquiry::Column::PropertyId.eq(property_id));
        }
        let count = self
            .retrying("count_inquiries", || query.clone().count(&self.db))
            .await?;
        Ok(count as i64)
    }

    /// `since` 之后提交的咨询数
    pub async fn count_inquiries_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count = inquiry::Entity::find()
            .filter(inquiry::Column::DateSubmitted.gte(since))
            .count(&self.db)
            .await?;
        Ok(count as i64)
    }

    /// 单房源全部咨询数
    pub async fn count_property_inquiries(&self, property_id: &str) -> Result<i64> {
        let count = inquiry::Entity::find()
            .filter(inquiry::Column::PropertyId.eq(property_id))
            .count(&self.db)
            .await?;
        Ok(count as i64)
    }

    /// 按房源分组的全部咨询数
    pub async fn inquiry_totals_by_property(
        &self,
        property_ids: &[String],
    ) -> Result<HashMap<String, i64>> {
        if property_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(String, i64)> = inquiry::Entity::find()
            .select_only()
            .column(inquiry::Column::PropertyId)
            .column_as(inquiry::Column::Id.count(), "count")
            .filter(inquiry::Column::PropertyId.is_in(property_ids.iter().cloned()))
            .group_by(inquiry::Column::PropertyId)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// [start, end) 内有咨询的房源
    pub async fn inquiry_property_ids_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let ids: Vec<String> = inquiry::Entity::find()
            .select_only()
            .column(inquiry::Column::PropertyId)
            .filter(inquiry::Column::DateSubmitted.gte(start))
            .filter(inquiry::Column::DateSubmitted.lt(end))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}
