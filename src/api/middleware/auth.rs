use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use tracing::{debug, info};

use crate::api::services::helpers::{AUTH_COOKIE, error_response};
use crate::config::AdminConfig;

pub struct AuthMiddleware;

/// 请求中携带的凭据：Cookie `token` 或 `Authorization: Bearer`
pub fn request_is_authenticated(req: &actix_web::HttpRequest, password: &str) -> bool {
    if password.is_empty() {
        return false;
    }

    if let Some(cookie) = req.cookie(AUTH_COOKIE)
        && cookie.value().trim() == password
    {
        return true;
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == password)
}

impl AuthMiddleware {
    /// 管理接口鉴权
    ///
    /// 未配置密码时整个管理接口按不存在处理。
    pub async fn admin_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let password = req
            .app_data::<web::Data<AdminConfig>>()
            .map(|c| c.password.clone())
            .unwrap_or_default();

        if password.is_empty() {
            return Ok(req.into_response(error_response(
                actix_web::http::StatusCode::NOT_FOUND,
                "Not Found",
            )));
        }

        if request_is_authenticated(req.request(), &password) {
            debug!("Admin API authentication succeeded");
            return next.call(req).await;
        }

        info!(
            "Admin API authentication failed for {} {}",
            req.method(),
            req.path()
        );
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(serde_json::json!({ "error": "Unauthorized" })),
        ))
    }
}
