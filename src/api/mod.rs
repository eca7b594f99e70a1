//! HTTP 接口
//!
//! 调用方需要注册以下 app_data：
//! `web::Data<AdminConfig>`、`web::Data<Arc<MappingService>>`、`web::Data<Arc<Resolver>>`。

pub mod middleware;
pub mod services;

use actix_web::middleware::from_fn;
use actix_web::web;

use middleware::AuthMiddleware;
use services::RedirectService;
use services::admin;
use services::helpers::{json_config, query_config};

/// 注册全部路由
///
/// - `/api/login`、`/api/logout` 无需鉴权
/// - 其余 `/api/*` 经过 `AuthMiddleware::admin_auth`
/// - `/` 跳转管理页，`/{path}` 解析短路径
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .route("/login", web::post().to(admin::login))
                .route("/logout", web::post().to(admin::logout))
                .service(
                    web::resource("/shorten")
                        .wrap(from_fn(AuthMiddleware::admin_auth))
                        .route(web::get().to(admin::get_mapping))
                        .route(web::post().to(admin::create_mapping))
                        .route(web::put().to(admin::update_mapping))
                        .route(web::delete().to(admin::delete_mapping)),
                )
                .service(
                    web::resource("/shorten/list")
                        .wrap(from_fn(AuthMiddleware::admin_auth))
                        .route(web::get().to(admin::list_mappings)),
                )
                .service(
                    web::resource("/mappings")
                        .wrap(from_fn(AuthMiddleware::admin_auth))
                        .route(web::get().to(admin::list_mappings)),
                )
                .service(
                    web::resource("/qrcode")
                        .wrap(from_fn(AuthMiddleware::admin_auth))
                        .route(web::get().to(admin::qrcode_info)),
                )
                .default_service(web::to(admin::api_not_found)),
        )
        .route("/", web::get().to(RedirectService::handle_root))
        .route(
            "/{path:.*}",
            web::get().to(RedirectService::handle_redirect),
        );
}
