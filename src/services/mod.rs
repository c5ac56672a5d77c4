//! Service layer for business logic
//!
//! HTTP 处理函数和 CLI 共用的业务逻辑，所有服务都持有同一个存储实例。

mod analytics_service;
mod dashboard_service;
mod inquiry_service;
mod property_service;

pub use analytics_service::*;
pub use dashboard_service::*;
pub use inquiry_service::*;
pub use property_service::*;
