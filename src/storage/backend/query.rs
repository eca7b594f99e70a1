//! Query operations for SeaOrmStorage
//!
//! 只读操作。

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QueryResult, QuerySelect, sea_query::Expr,
};
use tracing::debug;

use super::converters::{format_expiry, model_to_mapping};
use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::services::reserved::RESERVED_PATHS;
use crate::storage::Mapping;

use migration::entities::mapping;

const TOTAL_ALIAS: &str = "total_count";

/// 带窗口计数的一行：映射本身 + 同一条语句算出的总行数
struct MappingWithTotal {
    model: mapping::Model,
    total: i64,
}

impl FromQueryResult for MappingWithTotal {
    fn from_query_result(res: &QueryResult, pre: &str) -> std::result::Result<Self, DbErr> {
        Ok(Self {
            model: mapping::Model::from_query_result(res, pre)?,
            total: res.try_get(pre, TOTAL_ALIAS)?,
        })
    }
}

fn not_reserved() -> Condition {
    Condition::all().add(mapping::Column::Path.is_not_in(RESERVED_PATHS.iter().copied()))
}

impl SeaOrmStorage {
    pub async fn get(&self, path: &str) -> Result<Option<Mapping>> {
        let db = &self.db;
        let path_owned = path.to_string();

        let model = retry::with_retry(&format!("get({})", path), self.retry_config, || async {
            mapping::Entity::find_by_id(path_owned.clone()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_mapping))
    }

    /// 分页读取（保留路径除外），按创建时间倒序
    ///
    /// 返回 (当前页, 总数)。总数通过 `COUNT(*) OVER ()` 和数据在同一条语句中读出；
    /// 页码越界时没有行可以携带总数，此时单独做一次聚合计数。
    pub async fn list_page(&self, limit: u64, offset: u64) -> Result<(Vec<Mapping>, u64)> {
        let db = &self.db;

        let rows = retry::with_retry("list_page", self.retry_config, || async {
            mapping::Entity::find()
                .column_as(Expr::cust("COUNT(*) OVER ()"), TOTAL_ALIAS)
                .filter(not_reserved())
                .order_by_desc(mapping::Column::CreatedAt)
                .order_by_asc(mapping::Column::Path)
                .limit(limit)
                .offset(offset)
                .into_model::<MappingWithTotal>()
                .all(db)
                .await
        })
        .await?;

        let total = match rows.first() {
            Some(row) => row.total.max(0) as u64,
            None if offset == 0 => 0,
            None => {
                debug!("list_page: offset {} past the end, counting separately", offset);
                retry::with_retry("list_page(count)", self.retry_config, || async {
                    mapping::Entity::find().filter(not_reserved()).count(db).await
                })
                .await?
            }
        };

        let mappings = rows.into_iter().map(|row| model_to_mapping(row.model)).collect();
        Ok((mappings, total))
    }

    /// 已启用、过期日期不晚于 last_day 的映射，按过期日期升序
    pub async fn find_expiry_candidates(&self, last_day: NaiveDate) -> Result<Vec<Mapping>> {
        let db = &self.db;
        let bound = format_expiry(last_day);

        let models = retry::with_retry("find_expiry_candidates", self.retry_config, || async {
            mapping::Entity::find()
                .filter(mapping::Column::Enabled.eq(true))
                .filter(mapping::Column::Expiry.is_not_null())
                .filter(mapping::Column::Expiry.ne(""))
                .filter(mapping::Column::Expiry.lte(bound.clone()))
                .order_by_asc(mapping::Column::Expiry)
                .all(db)
                .await
        })
        .await?;

        Ok(models
            .into_iter()
            .map(model_to_mapping)
            .filter(|m| m.expiry.is_some())
            .collect())
    }

    /// 过期日期早于 cutoff 的路径，最多 limit 条
    ///
    /// `YYYY-MM-DD` 文本按字典序比较即按日期比较；旧写法在迁移时已改写为该格式。
    pub async fn find_hard_expired_paths(&self, cutoff: NaiveDate, limit: u64) -> Result<Vec<String>> {
        let db = &self.db;
        let bound = format_expiry(cutoff);

        let paths = retry::with_retry("find_hard_expired_paths", self.retry_config, || async {
            mapping::Entity::find()
                .select_only()
                .column(mapping::Column::Path)
                .filter(mapping::Column::Expiry.is_not_null())
                .filter(mapping::Column::Expiry.ne(""))
                .filter(mapping::Column::Expiry.lt(bound.clone()))
                .order_by_asc(mapping::Column::Expiry)
                .limit(limit)
                .into_tuple::<String>()
                .all(db)
                .await
        })
        .await?;

        Ok(paths)
    }

    /// 路径是否已存在
    pub async fn exists(&self, path: &str) -> Result<bool> {
        let db = &self.db;
        let path_owned = path.to_string();

        let count = retry::with_retry(&format!("exists({})", path), self.retry_config, || async {
            mapping::Entity::find_by_id(path_owned.clone()).count(db).await
        })
        .await?;

        Ok(count > 0)
    }
}
