//! 微信活码字段
//!
//! 为 mappings 表追加 isWechat / qrCodeData 两列。
//! 只增不改：列已存在（例如沿用旧版数据库）时跳过。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const TABLE: &str = "mappings";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_column(TABLE, "isWechat").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Mappings::Table)
                        .add_column(
                            ColumnDef::new(Mappings::IsWechat)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column(TABLE, "qrCodeData").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Mappings::Table)
                        .add_column(ColumnDef::new(Mappings::QrCodeData).text().null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 加列迁移不回滚，SQLite 旧版本也不支持 DROP COLUMN
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Mappings {
    #[sea_orm(iden = "mappings")]
    Table,
    #[sea_orm(iden = "isWechat")]
    IsWechat,
    #[sea_orm(iden = "qrCodeData")]
    QrCodeData,
}
