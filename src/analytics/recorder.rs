//! 浏览事件写入

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use super::{Aggregator, ViewMetadata};
use crate::errors::{ProperviewError, Result};
use crate::storage::{NewViewEvent, SeaOrmStorage};
use crate::utils::limits::{MAX_ID_LEN, MAX_SESSION_ID_LEN, ensure_max_len};

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// false 表示同一会话当天已记录过
    pub recorded: bool,
}

#[derive(Clone)]
pub struct EventRecorder {
    storage: Arc<SeaOrmStorage>,
    aggregator: Aggregator,
}

impl EventRecorder {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let aggregator = Aggregator::new(storage.clone());
        Self {
            storage,
            aggregator,
        }
    }

    pub async fn record_view(
        &self,
        property_id: &str,
        session_id: &str,
        metadata: ViewMetadata,
    ) -> Result<RecordOutcome> {
        self.record_view_at(property_id, session_id, metadata, Utc::now())
            .await
    }

    /// 在指定时间点记录一次浏览
    ///
    /// 写入成功后同步重算该房源当天和全局当天的汇总。重算失败时事件不回滚，
    /// 下一次写入会修复汇总行。
    pub async fn record_view_at(
        &self,
        property_id: &str,
        session_id: &str,
        metadata: ViewMetadata,
        viewed_at: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let property_id = property_id.trim();
        let session_id = session_id.trim();
        if property_id.is_empty() || session_id.is_empty() {
            return Err(ProperviewError::validation(
                "Missing propertyId or sessionId",
            ));
        }
        ensure_max_len("propertyId", property_id, MAX_ID_LEN)?;
        ensure_max_len("sessionId", session_id, MAX_SESSION_ID_LEN)?;

        let event = NewViewEvent {
            property_id: property_id.to_string(),
            session_id: session_id.to_string(),
            user_agent: metadata.user_agent,
            ip_address: metadata.ip_address,
            referrer: metadata.referrer,
            viewed_at,
        };

        if !self.storage.insert_view_dedup(&event).await? {
            return Ok(RecordOutcome { recorded: false });
        }

        let day = viewed_at.date_naive();
        if let Err(e) = self
            .aggregator
            .recompute_day(day, &[event.property_id.clone()])
            .await
        {
            error!(
                "View stored but daily recompute failed for {} on {}: {}",
                event.property_id, day, e
            );
            return Err(e);
        }

        debug!("View recorded: property={} day={}", event.property_id, day);
        Ok(RecordOutcome { recorded: true })
    }
}
