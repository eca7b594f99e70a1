use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Mapping, MappingPage};

pub struct StorageFactory;

impl StorageFactory {
    /// 按全局配置创建存储（连接 + 迁移）
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let storage =
            SeaOrmStorage::new(&config.database.database_url, &config.database).await?;
        Ok(Arc::new(storage))
    }
}
