//! Inquiry management service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info};

use crate::analytics::Aggregator;
use crate::errors::{ProperviewError, Result};
use crate::storage::{CurrentAgent, Inquiry, InquiryWithProperty, SeaOrmStorage};
use crate::utils::limits::{MAX_NAME_LEN, MAX_PHONE_LEN, ensure_max_len};

/// 提交咨询请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInquiryRequest {
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct InquiryService {
    storage: Arc<SeaOrmStorage>,
    aggregator: Aggregator,
}

impl InquiryService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let aggregator = Aggregator::new(storage.clone());
        Self {
            storage,
            aggregator,
        }
    }

    pub async fn submit(&self, req: SubmitInquiryRequest) -> Result<Inquiry> {
        self.submit_at(req, Utc::now()).await
    }

    /// 创建咨询并重算该房源当天的汇总
    pub async fn submit_at(&self, req: SubmitInquiryRequest, now: DateTime<Utc>) -> Result<Inquiry> {
        let (Some(property_id), Some(name), Some(email), Some(message)) = (
            required(req.property_id),
            required(req.name),
            required(req.email),
            required(req.message),
        ) else {
            return Err(ProperviewError::validation("Missing required fields"));
        };
        ensure_max_len("name", &name, MAX_NAME_LEN)?;
        ensure_max_len("email", &email, MAX_NAME_LEN)?;
        let phone = required(req.phone);
        if let Some(phone) = &phone {
            ensure_max_len("phone", phone, MAX_PHONE_LEN)?;
        }

        if self.storage.find_property(&property_id).await?.is_none() {
            return Err(ProperviewError::not_found("Property not found"));
        }

        let inquiry = Inquiry {
            id: uuid::Uuid::new_v4().to_string(),
            property_id,
            name,
            email,
            phone,
            message,
            is_read: false,
            date_submitted: now,
        };
        self.storage.insert_inquiry(&inquiry).await?;
        info!(
            "Inquiry {} submitted for property {}",
            inquiry.id, inquiry.property_id
        );

        let day = now.date_naive();
        if let Err(e) = self
            .aggregator
            .recompute_day(day, std::slice::from_ref(&inquiry.property_id))
            .await
        {
            error!(
                "Inquiry stored but daily recompute failed for {} on {}: {}",
                inquiry.property_id, day, e
            );
            return Err(e);
        }

        Ok(inquiry)
    }

    /// 全部咨询，最新在前
    pub async fn list_all(&self) -> Result<Vec<InquiryWithProperty>> {
        self.storage.list_inquiries(None, None).await
    }

    /// 经纪人房源下的咨询，最新在前
    pub async fn list_for_agent(&self, agent: &CurrentAgent) -> Result<Vec<InquiryWithProperty>> {
        self.storage.list_inquiries(Some(&agent.id), None).await
    }

    pub async fn set_read(&self, id: &str, is_read: bool) -> Result<Inquiry> {
        self.storage
            .set_inquiry_read(id, is_read)
            .await?
            .ok_or_else(|| ProperviewError::not_found("Inquiry not found"))
    }
}
