//! Mapping lifecycle service
//!
//! 创建、更新（含改名）、删除与查询。所有校验在第一次写库之前完成，
//! HTTP 接口、CLI 和导入器共用这一套规则。

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::errors::{LivelinkError, Result};
use crate::services::expiry::parse_expiry;
use crate::services::reserved::is_reserved;
use crate::storage::{Mapping, MappingPage, SeaOrmStorage};

pub const MAX_PAGE_SIZE: u64 = 100;

// ============ Request DTOs ============

/// 创建映射请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMappingRequest {
    pub path: Option<String>,
    pub target: Option<String>,
    pub name: Option<String>,
    /// 过期日期，空字符串等同未设置
    pub expiry: Option<String>,
    pub enabled: Option<bool>,
    pub is_wechat: Option<bool>,
    pub qr_code_data: Option<String>,
}

/// 更新映射请求；path 与 original_path 不同即为改名
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMappingRequest {
    pub original_path: Option<String>,
    pub path: Option<String>,
    pub target: Option<String>,
    pub name: Option<String>,
    pub expiry: Option<String>,
    pub enabled: Option<bool>,
    pub is_wechat: Option<bool>,
    pub qr_code_data: Option<String>,
}

/// 校验通过的字段
#[derive(Debug)]
struct ValidatedFields {
    path: String,
    target: String,
    name: Option<String>,
    expiry: Option<NaiveDate>,
    enabled: bool,
    is_wechat: bool,
    qr_code_data: Option<String>,
}

impl ValidatedFields {
    fn into_mapping(self) -> Mapping {
        Mapping {
            path: self.path,
            target: self.target,
            name: self.name,
            expiry: self.expiry,
            enabled: self.enabled,
            is_wechat: self.is_wechat,
            qr_code_data: self.qr_code_data,
            created_at: Utc::now(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| LivelinkError::invalid_input(format!("{} is required", field)))
}

/// 路径 / 目标 / 保留名 / 过期日期校验，不含二维码检查
fn validate_fields(
    path: Option<String>,
    target: Option<String>,
    name: Option<String>,
    expiry: Option<String>,
    enabled: Option<bool>,
    is_wechat: Option<bool>,
    qr_code_data: Option<String>,
) -> Result<ValidatedFields> {
    let path = require(path, "path")?;
    let target = require(target, "target")?;

    if is_reserved(&path) {
        return Err(LivelinkError::reserved_path(format!(
            "'{}' is a reserved path",
            path
        )));
    }

    let expiry = match expiry {
        Some(raw) => parse_expiry(&raw)?,
        None => None,
    };

    Ok(ValidatedFields {
        path,
        target,
        name: non_empty(name),
        expiry,
        enabled: enabled.unwrap_or(true),
        is_wechat: is_wechat.unwrap_or(false),
        qr_code_data: non_empty(qr_code_data),
    })
}

fn ensure_qr_data(fields: &ValidatedFields) -> Result<()> {
    if fields.is_wechat && fields.qr_code_data.is_none() {
        return Err(LivelinkError::missing_qr_data(format!(
            "WeChat mapping '{}' requires qrCodeData",
            fields.path
        )));
    }
    Ok(())
}

/// 把分页参数钳到合法范围
pub fn clamp_paging(page: u64, page_size: u64) -> (u64, u64) {
    (page.max(1), page_size.clamp(1, MAX_PAGE_SIZE))
}

// ============ MappingService Implementation ============

pub struct MappingService {
    storage: Arc<SeaOrmStorage>,
}

impl MappingService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<SeaOrmStorage> {
        &self.storage
    }

    /// 创建映射
    pub async fn create(&self, req: CreateMappingRequest) -> Result<Mapping> {
        let fields = validate_fields(
            req.path,
            req.target,
            req.name,
            req.expiry,
            req.enabled,
            req.is_wechat,
            req.qr_code_data,
        )?;
        ensure_qr_data(&fields)?;

        let mapping = fields.into_mapping();
        self.storage.insert(&mapping).await?;

        info!(
            "MappingService: created '{}' -> '{}'",
            mapping.path, mapping.target
        );
        Ok(mapping)
    }

    /// 创建或覆盖（导入时的 overwrite 模式）
    pub async fn create_or_replace(&self, req: CreateMappingRequest) -> Result<Mapping> {
        let fields = validate_fields(
            req.path,
            req.target,
            req.name,
            req.expiry,
            req.enabled,
            req.is_wechat,
            req.qr_code_data,
        )?;
        ensure_qr_data(&fields)?;

        let mapping = fields.into_mapping();
        self.storage.upsert(&mapping).await?;

        info!("MappingService: upserted '{}'", mapping.path);
        Ok(mapping)
    }

    /// 更新映射，可同时改名
    ///
    /// 微信映射未提交二维码数据时沿用原记录中的数据。
    pub async fn update(&self, req: UpdateMappingRequest) -> Result<Mapping> {
        let original_path = require(req.original_path, "originalPath")?;
        let mut fields = validate_fields(
            req.path,
            req.target,
            req.name,
            req.expiry,
            req.enabled,
            req.is_wechat,
            req.qr_code_data,
        )?;

        if fields.is_wechat && fields.qr_code_data.is_none() {
            fields.qr_code_data = self
                .storage
                .get(&original_path)
                .await?
                .and_then(|existing| non_empty(existing.qr_code_data));
        }
        ensure_qr_data(&fields)?;

        // replace 不写 created_at
        let mapping = fields.into_mapping();
        self.storage.replace(&original_path, &mapping).await?;

        info!(
            "MappingService: updated '{}' (now '{}')",
            original_path, mapping.path
        );

        self.storage
            .get(&mapping.path)
            .await?
            .ok_or_else(|| LivelinkError::not_found(format!("mapping not found: {}", mapping.path)))
    }

    /// 删除映射；路径不存在时什么也不做
    pub async fn delete(&self, path: &str) -> Result<()> {
        if path.trim().is_empty() {
            return Err(LivelinkError::invalid_input("path is required"));
        }
        if is_reserved(path) {
            return Err(LivelinkError::reserved_path(format!(
                "'{}' is a reserved path",
                path
            )));
        }

        let removed = self.storage.remove(path).await?;
        if removed > 0 {
            info!("MappingService: deleted '{}'", path);
        }
        Ok(())
    }

    pub async fn get(&self, path: &str) -> Result<Option<Mapping>> {
        if is_reserved(path) {
            return Ok(None);
        }
        self.storage.get(path).await
    }

    /// 分页列表（page 从 1 开始，page_size 最大 100）
    pub async fn list(&self, page: u64, page_size: u64) -> Result<MappingPage> {
        let (page, page_size) = clamp_paging(page, page_size);
        let offset = (page - 1).saturating_mul(page_size);

        let (mappings, total) = self.storage.list_page(page_size, offset).await?;
        Ok(MappingPage::new(mappings, total, page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(path: &str, target: &str) -> Result<ValidatedFields> {
        validate_fields(
            Some(path.to_string()),
            Some(target.to_string()),
            None,
            None,
            None,
            None,
            None,
        )
    }

    #[test]
    fn test_defaults_applied() {
        let f = fields("promo", "https://example.com").unwrap();
        assert!(f.enabled);
        assert!(!f.is_wechat);
        assert!(f.expiry.is_none());
    }

    #[test]
    fn test_missing_fields_are_invalid_input() {
        assert!(matches!(
            fields("", "https://example.com"),
            Err(LivelinkError::InvalidInput(_))
        ));
        assert!(matches!(
            fields("promo", "  "),
            Err(LivelinkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_reserved_path_rejected() {
        assert!(matches!(
            fields("admin", "https://example.com"),
            Err(LivelinkError::ReservedPath(_))
        ));
    }

    #[test]
    fn test_empty_strings_become_none() {
        let f = validate_fields(
            Some("promo".to_string()),
            Some("https://example.com".to_string()),
            Some(String::new()),
            Some(String::new()),
            None,
            None,
            Some(String::new()),
        )
        .unwrap();
        assert!(f.name.is_none());
        assert!(f.expiry.is_none());
        assert!(f.qr_code_data.is_none());
    }

    #[test]
    fn test_wechat_without_qr_rejected() {
        let f = validate_fields(
            Some("grp".to_string()),
            Some("https://example.com".to_string()),
            None,
            None,
            None,
            Some(true),
            None,
        )
        .unwrap();
        assert!(matches!(
            ensure_qr_data(&f),
            Err(LivelinkError::MissingQrData(_))
        ));
    }

    #[test]
    fn test_clamp_paging() {
        assert_eq!(clamp_paging(0, 0), (1, 1));
        assert_eq!(clamp_paging(3, 500), (3, 100));
        assert_eq!(clamp_paging(2, 10), (2, 10));
    }
}
