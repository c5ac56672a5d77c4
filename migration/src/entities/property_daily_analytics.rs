//! 单房源天级统计实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "property_daily_analytics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub property_id: String,
    pub date: Date,
    pub views: i64,
    pub unique_visitors: i64,
    pub inquiries: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
