//! 天级统计汇总表迁移
//!
//! - property_daily_analytics: 单房源天级汇总，(property_id, date) 唯一
//! - global_daily_analytics: 全局天级汇总，date 唯一
//!
//! 两张表都可以从 listing_views / inquiries 完整重算。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyDailyAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::PropertyId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::Date)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::UniqueVisitors)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PropertyDailyAnalytics::Inquiries)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：property_id + date（upsert 冲突键）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_property_daily_property_date")
                    .table(PropertyDailyAnalytics::Table)
                    .col(PropertyDailyAnalytics::PropertyId)
                    .col(PropertyDailyAnalytics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_property_daily_date")
                    .table(PropertyDailyAnalytics::Table)
                    .col(PropertyDailyAnalytics::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GlobalDailyAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GlobalDailyAnalytics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GlobalDailyAnalytics::Date).date().not_null())
                    .col(
                        ColumnDef::new(GlobalDailyAnalytics::TotalViews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GlobalDailyAnalytics::UniqueVisitors)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GlobalDailyAnalytics::TotalInquiries)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：date（每天只有一条全局记录）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_global_daily_date")
                    .table(GlobalDailyAnalytics::Table)
                    .col(GlobalDailyAnalytics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_global_daily_date").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GlobalDailyAnalytics::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_property_daily_date").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_property_daily_property_date")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PropertyDailyAnalytics::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum PropertyDailyAnalytics {
    #[sea_orm(iden = "property_daily_analytics")]
    Table,
    Id,
    PropertyId,
    Date,
    Views,
    UniqueVisitors,
    Inquiries,
}

#[derive(DeriveIden)]
enum GlobalDailyAnalytics {
    #[sea_orm(iden = "global_daily_analytics")]
    Table,
    Id,
    Date,
    TotalViews,
    UniqueVisitors,
    TotalInquiries,
}
