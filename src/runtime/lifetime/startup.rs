use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::{Aggregator, EventRecorder};
use crate::config::StaticConfig;
use crate::services::{AnalyticsService, DashboardService, InquiryService, PropertyService};
use crate::storage::{CurrentAgent, SeaOrmStorage, StorageFactory};

/// 服务端启动所需的全部共享组件
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub recorder: Arc<EventRecorder>,
    pub analytics_service: Arc<AnalyticsService>,
    pub property_service: Arc<PropertyService>,
    pub inquiry_service: Arc<InquiryService>,
    pub dashboard_service: Arc<DashboardService>,
    pub agent: Arc<CurrentAgent>,
}

impl StartupContext {
    /// 在已有存储上组装服务，测试也通过这里构造
    pub fn from_storage(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        Self {
            recorder: Arc::new(EventRecorder::new(storage.clone())),
            analytics_service: Arc::new(AnalyticsService::new(
                storage.clone(),
                config.analytics.clone(),
            )),
            property_service: Arc::new(PropertyService::new(storage.clone())),
            inquiry_service: Arc::new(InquiryService::new(storage.clone())),
            dashboard_service: Arc::new(DashboardService::new(storage.clone())),
            agent: Arc::new(CurrentAgent::from(&config.agent)),
            storage,
        }
    }
}

/// 连接数据库、执行迁移并组装服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::from_storage(storage, config);
    info!(
        "Acting agent: {} <{}>",
        context.agent.name, context.agent.email
    );

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}

/// CLI 回填任务只需要存储和聚合器
pub async fn prepare_aggregator(config: &StaticConfig) -> Result<Aggregator> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    Ok(Aggregator::new(storage))
}
