//! SeaORM storage backend
//!
//! SQLite / MySQL(MariaDB) / PostgreSQL 上的映射表存储。

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{LivelinkError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{format_expiry, mapping_to_active_model, model_to_mapping, parse_stored_expiry};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<&'static str> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite")
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql")
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(LivelinkError::config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based mapping store
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: &'static str,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并确保表结构就绪
    pub async fn new(database_url: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LivelinkError::config("database_url 未设置"));
        }

        let backend_name = infer_backend_from_url(database_url)?;
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            // mariadb:// 交给 sqlx 时需要改写成 mysql://
            let url = database_url.replacen("mariadb://", "mysql://", 1);
            connect_generic(&url, backend_name, config).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name,
            retry_config: retry::RetryConfig::from(config),
        };
        storage.ensure_schema().await?;

        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(storage)
    }

    /// 创建表、补齐列和索引；已存在的部分保持不变
    pub async fn ensure_schema(&self) -> Result<()> {
        run_migrations(&self.db).await
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
