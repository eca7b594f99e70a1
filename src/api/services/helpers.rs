//! 响应构建帮助函数

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::errors::LivelinkError;

pub const AUTH_COOKIE: &str = "token";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// `{"success": true}`
pub fn success_response() -> HttpResponse {
    json_response(StatusCode::OK, &json!({ "success": true }))
}

/// `{"error": "..."}`
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &json!({ "error": message }))
}

/// 从 LivelinkError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_livelink(err: &LivelinkError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Admin API error: {}", err);
    }
    error_response(status, err.message())
}

/// 成功返回 `{"success": true}`，失败映射错误
pub fn api_result<T>(result: Result<T, LivelinkError>) -> HttpResponse {
    match result {
        Ok(_) => success_response(),
        Err(e) => error_from_livelink(&e),
    }
}

/// 登录 Cookie（HttpOnly, SameSite=Strict, Path=/）
pub fn auth_cookie(value: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, value.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

pub fn clear_auth_cookie() -> Cookie<'static> {
    auth_cookie("", 0)
}

/// 请求体解析失败统一返回 400 `{"error": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({ "error": format!("Invalid request body: {}", err) });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// 查询参数解析失败同样返回 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = json!({ "error": format!("Invalid query: {}", err) });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
