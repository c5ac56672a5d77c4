//! 房源浏览日志表迁移
//!
//! 每次有效浏览写入一行。view_day 为 viewed_at 的 UTC 日期，
//! (property_id, session_id, view_day) 唯一索引保证同一会话每天只记一次。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingViews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingViews::PropertyId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingViews::SessionId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingViews::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingViews::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingViews::Referrer).text().not_null())
                    .col(
                        ColumnDef::new(ListingViews::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingViews::ViewDay).date().not_null())
                    .to_owned(),
            )
            .await?;

        // 去重：同一会话同一房源每天一条
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listing_views_session_day")
                    .table(ListingViews::Table)
                    .col(ListingViews::PropertyId)
                    .col(ListingViews::SessionId)
                    .col(ListingViews::ViewDay)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 单房源时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listing_views_property_time")
                    .table(ListingViews::Table)
                    .col(ListingViews::PropertyId)
                    .col(ListingViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        // 全局时间范围查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listing_views_viewed_at")
                    .table(ListingViews::Table)
                    .col(ListingViews::ViewedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_listing_views_viewed_at").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_listing_views_property_time")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_listing_views_session_day")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ListingViews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ListingViews {
    #[sea_orm(iden = "listing_views")]
    Table,
    Id,
    PropertyId,
    SessionId,
    UserAgent,
    IpAddress,
    Referrer,
    ViewedAt,
    ViewDay,
}
