//! 字段长度上限
//!
//! 与迁移中的 varchar 长度一致。SQLite 不检查长度，Postgres / MySQL 会拒绝超长写入，
//! 所以写库前先在这里拦下，按 400 返回。

use crate::errors::{ProperviewError, Result};

/// 房源 / 咨询 id（uuid）
pub const MAX_ID_LEN: usize = 36;
pub const MAX_SESSION_ID_LEN: usize = 128;
/// IPv6 文本形式的最大长度
pub const MAX_IP_LEN: usize = 45;
/// 房源标题、咨询人姓名和邮箱
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_ADDRESS_LEN: usize = 512;
pub const MAX_PHONE_LEN: usize = 64;
pub const MAX_PROPERTY_TYPE_LEN: usize = 64;

/// 按字符数检查，超长返回 Validation 错误
pub fn ensure_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(ProperviewError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
