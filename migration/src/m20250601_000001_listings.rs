//! 房源与咨询表迁移
//!
//! - properties: 经纪人发布的房源
//! - inquiries: 买家针对房源提交的咨询

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::AgentId).string_len(64).not_null())
                    .col(ColumnDef::new(Properties::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Properties::Price).big_integer().not_null())
                    .col(ColumnDef::new(Properties::Address).string_len(512).not_null())
                    .col(ColumnDef::new(Properties::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(Properties::Bathrooms).double().not_null())
                    .col(ColumnDef::new(Properties::Description).text().not_null())
                    .col(
                        ColumnDef::new(Properties::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Properties::ImageUrl).text().null())
                    .col(ColumnDef::new(Properties::DateListed).date().not_null())
                    .col(ColumnDef::new(Properties::Sqft).integer().null())
                    .col(ColumnDef::new(Properties::PropertyType).string_len(64).null())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按经纪人筛选房源
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_properties_agent_id")
                    .table(Properties::Table)
                    .col(Properties::AgentId)
                    .to_owned(),
            )
            .await?;

        // 公开列表只展示 active
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_properties_status")
                    .table(Properties::Table)
                    .col(Properties::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inquiries::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inquiries::PropertyId).string_len(36).not_null())
                    .col(ColumnDef::new(Inquiries::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Inquiries::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Inquiries::Phone).string_len(64).null())
                    .col(ColumnDef::new(Inquiries::Message).text().not_null())
                    .col(
                        ColumnDef::new(Inquiries::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Inquiries::DateSubmitted)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 单房源 + 时间窗口计数（聚合时使用）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inquiries_property_submitted")
                    .table(Inquiries::Table)
                    .col(Inquiries::PropertyId)
                    .col(Inquiries::DateSubmitted)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inquiries_submitted")
                    .table(Inquiries::Table)
                    .col(Inquiries::DateSubmitted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_inquiries_submitted").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_inquiries_property_submitted")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Inquiries::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_properties_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_properties_agent_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    #[sea_orm(iden = "properties")]
    Table,
    Id,
    AgentId,
    Title,
    Price,
    Address,
    Bedrooms,
    Bathrooms,
    Description,
    Status,
    ImageUrl,
    DateListed,
    Sqft,
    PropertyType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Inquiries {
    #[sea_orm(iden = "inquiries")]
    Table,
    Id,
    PropertyId,
    Name,
    Email,
    Phone,
    Message,
    IsRead,
    DateSubmitted,
}
