//! `?c=` 跳转与目录
//!
//! 应用可能挂在子路径下，所以任意路径上的 `c` 参数都会触发解析。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, error, trace};

use super::helpers::{error_response, json_response};
use crate::api::AppState;

#[derive(Debug, Deserialize)]
pub struct RootQuery {
    /// 待解析的路由键
    pub c: Option<String>,
    /// 目录过滤条件
    pub q: Option<String>,
}

impl RootQuery {
    fn route_key(&self) -> Option<&str> {
        self.c.as_deref().filter(|c| !c.trim().is_empty())
    }
}

pub struct RedirectService;

impl RedirectService {
    /// `GET /`：有 `c` 时解析跳转，否则返回目录
    pub async fn handle_root(
        query: web::Query<RootQuery>,
        state: web::Data<Arc<AppState>>,
    ) -> HttpResponse {
        if let Some(code) = query.route_key() {
            return Self::process_redirect(code, "/", &state).await;
        }

        let registry = state.registry.lock().await;
        let links = registry.search(query.q.as_deref().unwrap_or_default());
        trace!("Catalog request returned {} links", links.len());
        json_response(StatusCode::OK, links)
    }

    /// `GET /{path...}`
    ///
    /// `c` 参数优先；没有时把路径本身当作路由键。
    pub async fn handle_path(
        req: HttpRequest,
        path: web::Path<String>,
        query: web::Query<RootQuery>,
        state: web::Data<Arc<AppState>>,
    ) -> HttpResponse {
        match query.route_key() {
            // 未命中时留在当前路径，去掉参数
            Some(code) => Self::process_redirect(code, req.path(), &state).await,
            None => {
                let captured_path = path.into_inner();
                Self::process_redirect(&captured_path, "/", &state).await
            }
        }
    }

    async fn process_redirect(code: &str, miss_location: &str, state: &AppState) -> HttpResponse {
        let resolved = state.registry.lock().await.resolve(code).await;

        match resolved {
            Ok(Some(link)) => {
                debug!("Redirecting '{}' to {}", code, link.original_url);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", link.original_url))
                    .insert_header(("Cache-Control", "no-store"))
                    .finish()
            }
            Ok(None) => {
                debug!("No link for '{}', sending back to {}", code, miss_location);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", miss_location.to_string()))
                    .finish()
            }
            Err(e) => {
                error!("Failed to persist click for '{}': {}", code, e);
                error_response(&e)
            }
        }
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(RedirectService::handle_root))
        .route("/{path:.*}", web::get().to(RedirectService::handle_path))
}
