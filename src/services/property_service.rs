//! Listing management service
//!
//! 房源增删改查，修改和删除只允许房源所属经纪人操作。

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::{error, info, warn};

use crate::analytics::Aggregator;
use crate::errors::{ProperviewError, Result};
use crate::storage::{
    CurrentAgent, Property, PropertyFilter, PropertyPatch, PropertyStatus, SeaOrmStorage,
};
use crate::utils::limits::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_PROPERTY_TYPE_LEN, ensure_max_len,
};

// ============ Request DTOs ============

/// 创建房源请求，所有字段都可缺省以便统一报告缺失项
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
}

/// 部分更新请求，缺省字段保持原值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
}

/// 接受 JSON 数字或数字字符串，空串和 null 视为缺省
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {}", s))),
        Some(other) => Err(D::Error::custom(format!("invalid number: {}", other))),
    }
}

fn parse_status(raw: &str) -> Result<PropertyStatus> {
    PropertyStatus::from_str(raw.trim()).map_err(|_| {
        ProperviewError::validation(format!(
            "Invalid status: '{}'. Valid: active, pending, sold",
            raw
        ))
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 有长度上限的文本字段
fn check_lengths(
    title: Option<&str>,
    address: Option<&str>,
    property_type: Option<&str>,
) -> Result<()> {
    if let Some(title) = title {
        ensure_max_len("title", title.trim(), MAX_NAME_LEN)?;
    }
    if let Some(address) = address {
        ensure_max_len("address", address.trim(), MAX_ADDRESS_LEN)?;
    }
    if let Some(property_type) = property_type {
        ensure_max_len("propertyType", property_type, MAX_PROPERTY_TYPE_LEN)?;
    }
    Ok(())
}

// ============ PropertyService ============

pub struct PropertyService {
    storage: Arc<SeaOrmStorage>,
    aggregator: Aggregator,
}

impl PropertyService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let aggregator = Aggregator::new(storage.clone());
        Self {
            storage,
            aggregator,
        }
    }

    /// 所有 active 房源，最新在前
    pub async fn list_active(&self) -> Result<Vec<Property>> {
        self.storage
            .list_properties(&PropertyFilter {
                agent_id: None,
                status: Some(PropertyStatus::Active),
            })
            .await
    }

    /// 经纪人自己的全部房源，最新在前
    pub async fn list_for_agent(&self, agent: &CurrentAgent) -> Result<Vec<Property>> {
        self.storage
            .list_properties(&PropertyFilter {
                agent_id: Some(agent.id.clone()),
                status: None,
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Property> {
        self.storage
            .find_property(id)
            .await?
            .ok_or_else(|| ProperviewError::not_found("Property not found"))
    }

    pub async fn create(
        &self,
        agent: &CurrentAgent,
        req: CreatePropertyRequest,
    ) -> Result<Property> {
        self.create_at(agent, req, Utc::now()).await
    }

    /// 校验必填字段并创建房源，缺失字段一次性全部列出
    pub async fn create_at(
        &self,
        agent: &CurrentAgent,
        req: CreatePropertyRequest,
        now: DateTime<Utc>,
    ) -> Result<Property> {
        let mut missing = Vec::new();
        if non_empty(&req.title).is_none() {
            missing.push("title");
        }
        if req.price.is_none_or(|p| p == 0.0) {
            missing.push("price");
        }
        if non_empty(&req.address).is_none() {
            missing.push("address");
        }
        if req.bedrooms.is_none() {
            missing.push("bedrooms");
        }
        if req.bathrooms.is_none() {
            missing.push("bathrooms");
        }
        if non_empty(&req.description).is_none() {
            missing.push("description");
        }
        if non_empty(&req.status).is_none() {
            missing.push("status");
        }
        if !missing.is_empty() {
            warn!("Rejected property create, missing fields: {:?}", missing);
            return Err(ProperviewError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        check_lengths(
            req.title.as_deref(),
            req.address.as_deref(),
            req.property_type.as_deref(),
        )?;
        let status = parse_status(req.status.as_deref().unwrap_or_default())?;

        let property = Property {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent.id.clone(),
            title: req.title.unwrap_or_default().trim().to_string(),
            price: req.price.unwrap_or_default().round() as i64,
            address: req.address.unwrap_or_default().trim().to_string(),
            bedrooms: req.bedrooms.unwrap_or_default().round() as i32,
            bathrooms: req.bathrooms.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            status,
            image_url: req.image_url.filter(|s| !s.is_empty()),
            date_listed: now.date_naive(),
            sqft: req.sqft.filter(|s| *s != 0.0).map(|s| s.round() as i32),
            property_type: req.property_type.filter(|s| !s.is_empty()),
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_property(&property).await?;
        Ok(property)
    }

    /// 加载房源并校验所有权
    async fn owned(&self, agent: &CurrentAgent, id: &str) -> Result<Property> {
        let property = self.get(id).await?;
        if property.agent_id != agent.id {
            warn!(
                "Agent {} attempted to modify property {} owned by {}",
                agent.id, id, property.agent_id
            );
            return Err(ProperviewError::forbidden(
                "Forbidden: You do not own this property",
            ));
        }
        Ok(property)
    }

    pub async fn update(
        &self,
        agent: &CurrentAgent,
        id: &str,
        req: UpdatePropertyRequest,
    ) -> Result<Property> {
        self.owned(agent, id).await?;
        check_lengths(
            req.title.as_deref(),
            req.address.as_deref(),
            req.property_type.as_deref(),
        )?;

        let status = match non_empty(&req.status) {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };

        let patch = PropertyPatch {
            title: req.title,
            price: req.price.map(|p| p.round() as i64),
            address: req.address,
            bedrooms: req.bedrooms.map(|b| b.round() as i32),
            bathrooms: req.bathrooms,
            description: req.description,
            status,
            image_url: req.image_url,
            sqft: req.sqft.map(|s| s.round() as i32),
            property_type: req.property_type,
        };

        let updated = self
            .storage
            .update_property(id, &patch, Utc::now())
            .await?
            .ok_or_else(|| ProperviewError::not_found("Property not found"))?;

        info!("Property updated: {}", id);
        Ok(updated)
    }

    /// 删除房源及其关联的咨询、浏览和天级汇总
    ///
    /// 删除后按涉及的日期重算全局天级汇总，使其与剩余日志一致。
    pub async fn delete(&self, agent: &CurrentAgent, id: &str) -> Result<()> {
        self.owned(agent, id).await?;

        let days = self
            .storage
            .delete_property_cascade(id)
            .await?
            .ok_or_else(|| ProperviewError::not_found("Property not found"))?;

        for day in days {
            if let Err(e) = self.aggregator.recompute_day(day, &[]).await {
                error!(
                    "Property {} deleted but global recompute failed for {}: {}",
                    id, day, e
                );
                return Err(e);
            }
        }
        Ok(())
    }
}
