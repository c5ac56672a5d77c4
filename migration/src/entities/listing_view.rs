//! 房源浏览日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "listing_views")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub property_id: String,
    pub session_id: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub ip_address: String,
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
    pub viewed_at: DateTimeUtc,
    /// viewed_at 的 UTC 日期，用于每日去重
    pub view_day: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
