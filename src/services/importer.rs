//! 旧数据导入
//!
//! 从旧的键值存储（导出的 JSON 文件或 Redis）逐键读取映射并写入当前存储。
//! 单个键的失败只记录不中断；列举键空间失败则整体中止。

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::{LivelinkError, Result};
use crate::services::mapping_service::{CreateMappingRequest, MappingService};
use crate::services::reserved::is_reserved;

/// 一页键及下一页游标（None 表示已到末尾）
#[derive(Debug, Clone, Default)]
pub struct KeyPage {
    pub keys: Vec<String>,
    pub cursor: Option<String>,
}

/// 旧键值存储
#[async_trait]
pub trait LegacySource: Send + Sync {
    async fn list_keys(&self, cursor: Option<String>, limit: usize) -> Result<KeyPage>;

    /// 键不存在或值为 null 时返回 None
    async fn get_value(&self, key: &str) -> Result<Option<Value>>;
}

/// 已存在路径的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// 跳过已存在的路径
    #[default]
    Skip,
    /// 覆盖已存在的路径
    Overwrite,
    /// 已存在的路径记为失败
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportFailure>,
}

/// 旧存储中的一条记录
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyRecord {
    target: Option<String>,
    name: Option<String>,
    expiry: Option<String>,
    enabled: Option<bool>,
    is_wechat: Option<bool>,
    qr_code_data: Option<String>,
}

impl LegacyRecord {
    fn into_request(self, path: &str) -> CreateMappingRequest {
        CreateMappingRequest {
            path: Some(path.to_string()),
            target: self.target,
            name: self.name,
            expiry: self.expiry,
            enabled: self.enabled,
            is_wechat: self.is_wechat,
            qr_code_data: self.qr_code_data,
        }
    }
}

/// 旧存储里的值可能是对象，也可能是 JSON 字符串
fn decode_value(raw: Value) -> Result<Value> {
    match raw {
        Value::String(s) => Ok(serde_json::from_str(&s)?),
        other => Ok(other),
    }
}

enum Outcome {
    Created,
    Skipped,
}

pub struct Importer {
    service: Arc<MappingService>,
    page_size: usize,
}

impl Importer {
    pub fn new(service: Arc<MappingService>, page_size: usize) -> Self {
        Self {
            service,
            page_size: page_size.max(1),
        }
    }

    /// 遍历整个旧键空间并导入
    pub async fn import_all(&self, source: &dyn LegacySource, mode: ImportMode) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut cursor: Option<String> = None;

        loop {
            let page = source.list_keys(cursor.take(), self.page_size).await?;
            debug!("Importer: got {} keys", page.keys.len());

            for key in page.keys {
                if is_reserved(&key) {
                    debug!("Importer: skipping reserved key '{}'", key);
                    report.skipped += 1;
                    continue;
                }

                match self.import_one(source, &key, mode).await {
                    Ok(Outcome::Created) => report.created += 1,
                    Ok(Outcome::Skipped) => report.skipped += 1,
                    Err(e) => {
                        error!("Failed to migrate {}: {}", key, e);
                        report.failed += 1;
                        report.errors.push(ImportFailure {
                            key,
                            message: e.to_string(),
                        });
                    }
                }
            }

            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(
            "Importer: {} created, {} skipped, {} failed",
            report.created, report.skipped, report.failed
        );
        Ok(report)
    }

    async fn import_one(&self, source: &dyn LegacySource, key: &str, mode: ImportMode) -> Result<Outcome> {
        let Some(raw) = source.get_value(key).await? else {
            return Ok(Outcome::Skipped);
        };
        let value = decode_value(raw)?;
        if value.is_null() {
            return Ok(Outcome::Skipped);
        }

        let record: LegacyRecord = serde_json::from_value(value)?;
        let request = record.into_request(key);

        match mode {
            ImportMode::Skip => {
                if self.service.storage().exists(key).await? {
                    debug!("Importer: '{}' already exists, skipped", key);
                    return Ok(Outcome::Skipped);
                }
                self.service.create(request).await?;
            }
            ImportMode::Error => {
                self.service.create(request).await?;
            }
            ImportMode::Overwrite => {
                self.service.create_or_replace(request).await?;
            }
        }
        Ok(Outcome::Created)
    }
}

// ============ Sources ============

/// 从旧存储导出的 JSON 对象 `{ "path": {...}, ... }` 读取，游标为偏移量
pub struct JsonFileSource {
    keys: Vec<String>,
    values: HashMap<String, Value>,
}

impl JsonFileSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => {
                let keys = map.keys().cloned().collect();
                Ok(Self {
                    keys,
                    values: map.into_iter().collect(),
                })
            }
            _ => Err(LivelinkError::source(
                "legacy export must be a JSON object keyed by path",
            )),
        }
    }
}

#[async_trait]
impl LegacySource for JsonFileSource {
    async fn list_keys(&self, cursor: Option<String>, limit: usize) -> Result<KeyPage> {
        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| LivelinkError::source(format!("invalid cursor: {}", c)))?,
            None => 0,
        };
        let start = start.min(self.keys.len());
        let end = start.saturating_add(limit.max(1)).min(self.keys.len());

        Ok(KeyPage {
            keys: self.keys[start..end].to_vec(),
            cursor: (end < self.keys.len()).then(|| end.to_string()),
        })
    }

    async fn get_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).filter(|v| !v.is_null()).cloned())
    }
}

/// 通过 SCAN + GET 从 Redis 读取，值为 JSON 字符串
pub struct RedisSource {
    connection: MultiplexedConnection,
    key_prefix: String,
}

impl RedisSource {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Connected to legacy Redis at {}", url);
        Ok(Self {
            connection,
            key_prefix: key_prefix.to_string(),
        })
    }
}

#[async_trait]
impl LegacySource for RedisSource {
    async fn list_keys(&self, cursor: Option<String>, limit: usize) -> Result<KeyPage> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}*", self.key_prefix);

        let (next, raw_keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor.as_deref().unwrap_or("0"))
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(limit.max(1))
            .query_async(&mut conn)
            .await?;

        let keys = raw_keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.key_prefix).map(str::to_string))
            .filter(|k| !k.is_empty())
            .collect();

        Ok(KeyPage {
            keys,
            cursor: (next != "0").then_some(next),
        })
    }

    async fn get_value(&self, key: &str) -> Result<Option<Value>> {
        use redis::AsyncCommands;

        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(format!("{}{}", self.key_prefix, key)).await?;
        match raw {
            Some(s) => {
                let value: Value = serde_json::from_str(&s)?;
                Ok((!value.is_null()).then_some(value))
            }
            None => Ok(None),
        }
    }
}
