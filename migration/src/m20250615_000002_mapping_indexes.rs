use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expiry")
                    .table(Mappings::Table)
                    .col(Mappings::Expiry)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_created_at")
                    .table(Mappings::Table)
                    .col(Mappings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 过期扫描：enabled = 1 AND expiry <= ?
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enabled_expiry")
                    .table(Mappings::Table)
                    .col(Mappings::Enabled)
                    .col(Mappings::Expiry)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_enabled_expiry", "idx_created_at", "idx_expiry"] {
            manager
                .drop_index(Index::drop().name(name).table(Mappings::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Mappings {
    #[sea_orm(iden = "mappings")]
    Table,
    Expiry,
    Enabled,
    CreatedAt,
}
