mod r#impl;
mod structs;

pub use r#impl::{get_config, init_config, init_config_from};
pub use structs::*;

/// TypeScript 类型导出路径，相对 ts-rs 的导出目录（默认 `<crate>/bindings`）
pub const TS_EXPORT_PATH: &str = "api.generated.ts";
