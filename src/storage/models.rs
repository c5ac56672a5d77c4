use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

use crate::config::{AgentConfig, TS_EXPORT_PATH};

/// 房源状态
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PropertyStatus {
    #[default]
    Active,
    Pending,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub agent_id: String,
    pub title: String,
    pub price: i64,
    pub address: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub description: String,
    pub status: PropertyStatus,
    pub image_url: Option<String>,
    pub date_listed: NaiveDate,
    pub sqft: Option<i32>,
    pub property_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: String,
    pub property_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub date_submitted: DateTime<Utc>,
}

/// 咨询列表里附带的房源摘要
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: i64,
    pub agent_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct InquiryWithProperty {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub property: Option<PropertyRef>,
}

/// 待写入的浏览事件
#[derive(Debug, Clone)]
pub struct NewViewEvent {
    pub property_id: String,
    pub session_id: String,
    pub user_agent: String,
    pub ip_address: String,
    pub referrer: String,
    pub viewed_at: DateTime<Utc>,
}

/// 天级计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounts {
    pub views: i64,
    pub unique_visitors: i64,
    pub inquiries: i64,
}

/// 房源列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub agent_id: Option<String>,
    pub status: Option<PropertyStatus>,
}

/// 当前登录的经纪人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CurrentAgent {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&AgentConfig> for CurrentAgent {
    fn from(config: &AgentConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            email: config.email.clone(),
        }
    }
}
