//! Mode routing
//!
//! - serve: HTTP 服务（默认）
//! - recompute: 回填天级汇总
//! - generate-config: 输出示例配置

pub mod recompute;
pub mod server;

pub use recompute::run_recompute;
pub use server::run_server;
