use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use super::pages::{expired_page, wechat_page};
use crate::config::AdminConfig;
use crate::services::{Resolution, Resolver};

pub struct RedirectService {}

impl RedirectService {
    /// `GET /` 跳转到管理页
    pub async fn handle_root(admin: web::Data<AdminConfig>) -> impl Responder {
        HttpResponse::Found()
            .insert_header(("Location", admin.landing_page.clone()))
            .finish()
    }

    /// `GET /{path}` 解析短路径
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<Arc<Resolver>>,
    ) -> impl Responder {
        let captured_path = path.into_inner();

        match resolver.resolve_path(&captured_path).await {
            Ok(Resolution::Redirect { target }) => {
                trace!("Redirecting '{}' -> '{}'", captured_path, target);
                HttpResponse::Found()
                    .insert_header(("Location", target))
                    .insert_header(("Cache-Control", "no-store"))
                    .finish()
            }
            Ok(Resolution::ShowEmbeddedContent { qr_code_data, name }) => {
                Self::html_response(StatusCode::OK, wechat_page(name.as_deref(), &qr_code_data))
            }
            Ok(Resolution::Expired { name, expiry }) => {
                debug!("Expired mapping requested: {}", captured_path);
                Self::html_response(
                    StatusCode::NOT_FOUND,
                    expired_page(name.as_deref(), expiry),
                )
            }
            Ok(Resolution::NotFound) => Self::not_found_response(),
            Err(e) => {
                error!("Storage error while resolving '{}': {}", captured_path, e);
                Self::error_response()
            }
        }
    }

    fn html_response(status: StatusCode, body: String) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body(body)
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body("Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }
}
