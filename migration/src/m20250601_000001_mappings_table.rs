use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 基础表结构，和最早一版 mappings 表保持一致，已存在时直接沿用
        manager
            .create_table(
                Table::create()
                    .table(Mappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mappings::Path)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mappings::Target).text().not_null())
                    .col(ColumnDef::new(Mappings::Name).string().null())
                    .col(ColumnDef::new(Mappings::Expiry).string_len(32).null())
                    .col(
                        ColumnDef::new(Mappings::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Mappings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mappings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mappings {
    #[sea_orm(iden = "mappings")]
    Table,
    Path,
    Target,
    Name,
    Expiry,
    Enabled,
    CreatedAt,
}
