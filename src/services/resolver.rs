//! 请求时的路径解析
//!
//! 优先级：不存在 / 已停用 → NotFound，过期 → Expired，
//! 微信映射且有二维码 → ShowEmbeddedContent，否则 Redirect。

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::Result;
use crate::services::expiry::ExpiryClock;
use crate::services::reserved::is_reserved;
use crate::storage::{Mapping, SeaOrmStorage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    Expired {
        name: Option<String>,
        expiry: NaiveDate,
    },
    ShowEmbeddedContent {
        qr_code_data: String,
        name: Option<String>,
    },
    Redirect {
        target: String,
    },
}

/// 纯函数：根据映射和今天的日期决定结果
///
/// 过期日期当天仍然有效，只有 `expiry < today` 才算过期。
pub fn resolve(mapping: Option<&Mapping>, today: NaiveDate) -> Resolution {
    let Some(mapping) = mapping else {
        return Resolution::NotFound;
    };
    if !mapping.enabled {
        return Resolution::NotFound;
    }
    if let Some(expiry) = mapping.expiry
        && expiry < today
    {
        return Resolution::Expired {
            name: mapping.name.clone(),
            expiry,
        };
    }

    match mapping.qr_code_data.as_deref() {
        Some(qr) if mapping.is_wechat && !qr.is_empty() => Resolution::ShowEmbeddedContent {
            qr_code_data: qr.to_string(),
            name: mapping.name.clone(),
        },
        _ => Resolution::Redirect {
            target: mapping.target.clone(),
        },
    }
}

pub struct Resolver {
    storage: Arc<SeaOrmStorage>,
    clock: ExpiryClock,
}

impl Resolver {
    pub fn new(storage: Arc<SeaOrmStorage>, clock: ExpiryClock) -> Self {
        Self { storage, clock }
    }

    /// 保留路径 → 查库 → resolve；存储错误原样向上传递
    pub async fn resolve_path(&self, path: &str) -> Result<Resolution> {
        self.resolve_path_on(path, self.clock.today()).await
    }

    pub async fn resolve_path_on(&self, path: &str, today: NaiveDate) -> Result<Resolution> {
        if path.is_empty() || is_reserved(path) {
            return Ok(Resolution::NotFound);
        }

        let mapping = self.storage.get(path).await?;
        let resolution = resolve(mapping.as_ref(), today);
        debug!("Resolved '{}' -> {:?}", path, resolution);
        Ok(resolution)
    }
}
