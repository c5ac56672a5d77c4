//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod inquiries;
mod properties;
pub mod retry;
mod rollups;
mod views;

use std::future::Future;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{ProperviewError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_inquiry, model_to_property, property_to_active_model};
pub use properties::{DashboardCounts, PropertyPatch};
pub use views::ViewTotals;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ProperviewError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new(database_url: &str, backend_name: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ProperviewError::database_config(
                "database_url 未设置".to_string(),
            ));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size, config.timeout).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 存活检查
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| ProperviewError::database_connection(e.to_string()))
    }

    /// 带重试执行单条语句，失败时附带操作名
    async fn retrying<T, F, Fut>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, DbErr>>,
    {
        retry::with_retry(operation_name, self.retry_config, operation)
            .await
            .map_err(|e| {
                ProperviewError::database_operation(format!("{} 失败: {}", operation_name, e))
            })
    }
}
