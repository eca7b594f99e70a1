//! Mutation operations for SeaOrmStorage
//!
//! 写操作。唯一约束冲突经 `From<DbErr>` 映射为 `DuplicateKey`，其余为 `StorageError`。

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr, sea_query::OnConflict};
use tracing::{debug, info};

use super::converters::{format_expiry, mapping_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{LivelinkError, Result};
use crate::storage::Mapping;

use migration::entities::mapping;

impl SeaOrmStorage {
    /// 插入新映射；路径已存在时返回 `DuplicateKey`
    pub async fn insert(&self, m: &Mapping) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("insert({})", m.path), self.retry_config, || async {
            mapping::Entity::insert(mapping_to_active_model(m, true))
                .exec_without_returning(db)
                .await
        })
        .await?;

        debug!("Mapping inserted: {}", m.path);
        Ok(())
    }

    /// 插入或覆盖；覆盖时保留库中原有的 created_at
    pub async fn upsert(&self, m: &Mapping) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("upsert({})", m.path), self.retry_config, || async {
            mapping::Entity::insert(mapping_to_active_model(m, true))
                .on_conflict(
                    OnConflict::column(mapping::Column::Path)
                        .update_columns([
                            mapping::Column::Target,
                            mapping::Column::Name,
                            mapping::Column::Expiry,
                            mapping::Column::Enabled,
                            mapping::Column::IsWechat,
                            mapping::Column::QrCodeData,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await?;

        debug!("Mapping upserted: {}", m.path);
        Ok(())
    }

    /// 用一条 UPDATE 改写 original_path 对应的行（包括路径本身）
    ///
    /// 新路径与其他行冲突时返回 `DuplicateKey`，原路径不存在时返回 `NotFound`。
    pub async fn replace(&self, original_path: &str, m: &Mapping) -> Result<()> {
        let db = &self.db;
        let original = original_path.to_string();

        let result = retry::with_retry(
            &format!("replace({} -> {})", original_path, m.path),
            self.retry_config,
            || async {
                mapping::Entity::update_many()
                    .col_expr(mapping::Column::Path, Expr::value(m.path.clone()))
                    .col_expr(mapping::Column::Target, Expr::value(m.target.clone()))
                    .col_expr(mapping::Column::Name, Expr::value(m.name.clone()))
                    .col_expr(
                        mapping::Column::Expiry,
                        Expr::value(m.expiry.map(format_expiry)),
                    )
                    .col_expr(mapping::Column::Enabled, Expr::value(m.enabled))
                    .col_expr(mapping::Column::IsWechat, Expr::value(m.is_wechat))
                    .col_expr(mapping::Column::QrCodeData, Expr::value(m.qr_code_data.clone()))
                    .filter(mapping::Column::Path.eq(original.clone()))
                    .exec(db)
                    .await
            },
        )
        .await?;

        // MySQL 对"值未变化"的 UPDATE 可能报告 0 行，此时路径必然未变，需要再确认一次
        if result.rows_affected == 0
            && (original_path != m.path || !self.exists(original_path).await?)
        {
            return Err(LivelinkError::not_found(format!(
                "mapping not found: {}",
                original_path
            )));
        }

        if original_path != m.path {
            info!("Mapping renamed: {} -> {}", original_path, m.path);
        }
        Ok(())
    }

    /// 按路径删除，返回删除的行数（不存在时为 0）
    pub async fn remove(&self, path: &str) -> Result<u64> {
        let db = &self.db;
        let path_owned = path.to_string();

        let result = retry::with_retry(&format!("remove({})", path), self.retry_config, || async {
            mapping::Entity::delete_by_id(path_owned.clone()).exec(db).await
        })
        .await?;

        if result.rows_affected > 0 {
            debug!("Mapping deleted: {}", path);
        }
        Ok(result.rows_affected)
    }

    /// 批量按路径删除，返回删除的行数
    pub async fn remove_many(&self, paths: &[String]) -> Result<u64> {
        if paths.is_empty() {
            return Ok(0);
        }
        let db = &self.db;

        let result = retry::with_retry("remove_many", self.retry_config, || async {
            mapping::Entity::delete_many()
                .filter(mapping::Column::Path.is_in(paths.iter().cloned()))
                .exec(db)
                .await
        })
        .await?;

        debug!("Batch deleted {} mappings", result.rows_affected);
        Ok(result.rows_affected)
    }
}
