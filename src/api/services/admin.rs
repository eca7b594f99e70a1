//! 管理接口 `/api/*`

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::helpers::{
    api_result, auth_cookie, clear_auth_cookie, error_from_livelink, error_response,
    json_response,
};
use crate::config::AdminConfig;
use crate::services::{CreateMappingRequest, MappingService, UpdateMappingRequest};
use crate::storage::Mapping;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub path: Option<String>,
}

/// 分页参数按字符串接收，无法解析或为 0 时取默认值
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(0) | None => default,
        Some(n) => n.max(1) as u64,
    }
}

impl ListQuery {
    pub fn paging(&self) -> (u64, u64) {
        (
            parse_positive(self.page.as_deref(), DEFAULT_PAGE),
            parse_positive(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeInfo {
    pub success: bool,
    pub short_url: String,
    pub qr_code_generate_url: String,
    pub name: String,
    pub is_wechat: bool,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_data: Option<String>,
}

impl QrCodeInfo {
    fn from_mapping(origin: &str, mapping: Mapping) -> Self {
        let short_url = format!("{}/{}", origin, mapping.path);
        let qr_code_data = if mapping.is_wechat {
            mapping.qr_code_data.filter(|d| !d.is_empty())
        } else {
            None
        };
        Self {
            success: true,
            qr_code_generate_url: short_url.clone(),
            short_url,
            name: mapping.name.unwrap_or_default(),
            is_wechat: mapping.is_wechat,
            target: mapping.target,
            qr_code_data,
        }
    }
}

fn require_path(query: &PathQuery) -> Result<&str, HttpResponse> {
    match query.path.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Ok(p),
        None => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Missing path parameter",
        )),
    }
}

/// `POST /api/login`
pub async fn login(
    body: web::Json<LoginCredentials>,
    admin: web::Data<AdminConfig>,
) -> impl Responder {
    if admin.password.is_empty() || body.password != admin.password {
        warn!("Admin login failed");
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    info!("Admin login succeeded");
    HttpResponse::Ok()
        .cookie(auth_cookie(&admin.password, admin.cookie_max_age_secs))
        .json(serde_json::json!({ "success": true, "token": admin.password }))
}

/// `POST /api/logout`
pub async fn logout(admin: web::Data<AdminConfig>) -> impl Responder {
    if admin.password.is_empty() {
        return error_response(StatusCode::NOT_FOUND, "Not Found");
    }
    HttpResponse::Ok()
        .cookie(clear_auth_cookie())
        .json(serde_json::json!({ "success": true }))
}

/// `GET /api/shorten?path=`
pub async fn get_mapping(
    query: web::Query<PathQuery>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    let path = match require_path(&query) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match service.get(path).await {
        Ok(Some(mapping)) => json_response(StatusCode::OK, &mapping),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Short URL not found"),
        Err(e) => error_from_livelink(&e),
    }
}

/// `POST /api/shorten`
pub async fn create_mapping(
    body: web::Json<CreateMappingRequest>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    api_result(service.create(body.into_inner()).await)
}

/// `PUT /api/shorten`
pub async fn update_mapping(
    body: web::Json<UpdateMappingRequest>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    api_result(service.update(body.into_inner()).await)
}

/// `DELETE /api/shorten`
pub async fn delete_mapping(
    body: web::Json<DeleteRequest>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    let path = body.into_inner().path.unwrap_or_default();
    api_result(service.delete(&path).await)
}

/// `GET /api/shorten/list` 与 `GET /api/mappings`
pub async fn list_mappings(
    query: web::Query<ListQuery>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    let (page, page_size) = query.paging();
    match service.list(page, page_size).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(e) => error_from_livelink(&e),
    }
}

/// `GET /api/qrcode?path=`
pub async fn qrcode_info(
    req: HttpRequest,
    query: web::Query<PathQuery>,
    service: web::Data<Arc<MappingService>>,
) -> impl Responder {
    let path = match require_path(&query) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match service.get(path).await {
        Ok(Some(mapping)) => {
            let conn = req.connection_info();
            let origin = format!("{}://{}", conn.scheme(), conn.host());
            json_response(StatusCode::OK, &QrCodeInfo::from_mapping(&origin, mapping))
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Short URL not found"),
        Err(e) => error_from_livelink(&e),
    }
}

/// `/api` 下未匹配的路由
pub async fn api_not_found() -> impl Responder {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}
