//! 过期日期规范化
//!
//! 沿用旧表时 expiry 可能是 `2024/01/01`、带时间的字符串等写法。
//! 过期查询按文本比较，这里统一改写为 `YYYY-MM-DD`；无法解析的置空。

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use sea_orm_migration::prelude::*;

use crate::entities::mapping;
use crate::expiry_text::{format_expiry_date, is_canonical, parse_expiry_date};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        let rows: Vec<(String, Option<String>)> = mapping::Entity::find()
            .select_only()
            .column(mapping::Column::Path)
            .column(mapping::Column::Expiry)
            .filter(mapping::Column::Expiry.is_not_null())
            .into_tuple()
            .all(db)
            .await?;

        for (path, raw) in rows {
            let Some(raw) = raw else { continue };
            if is_canonical(&raw) {
                continue;
            }

            let normalized = parse_expiry_date(&raw).map(format_expiry_date);
            mapping::Entity::update_many()
                .col_expr(mapping::Column::Expiry, Expr::value(normalized))
                .filter(mapping::Column::Path.eq(path))
                .exec(db)
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 原始写法已丢弃，无法还原
        Ok(())
    }
}
