//! 链接管理 JSON API：新建、查询、删除、别名建议

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use super::helpers::{error_response, json_response};
use crate::api::AppState;
use crate::errors::ReelinkError;
use crate::services::{CreateLinkRequest, LinkRegistry};
use crate::storage::ShortLinkRecord;

#[derive(Debug, Deserialize)]
pub struct PostNewLink {
    pub url: String,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: ShortLinkRecord,
    pub share_url: String,
}

impl LinkResponse {
    fn new(link: ShortLinkRecord, base_url: &str) -> Self {
        let share_url = LinkRegistry::share_url(base_url, &link);
        Self { link, share_url }
    }
}

pub struct LinkService;

impl LinkService {
    /// `POST /api/links`
    ///
    /// 元数据生成期间不持有注册表锁，跳转请求不会被阻塞。
    pub async fn post_link(
        body: web::Json<PostNewLink>,
        state: web::Data<Arc<AppState>>,
    ) -> HttpResponse {
        let PostNewLink { url, alias } = body.into_inner();
        let request = CreateLinkRequest {
            original_url: url,
            alias,
        };

        let (url, describer) = {
            let registry = state.registry.lock().await;
            match registry.check_request(&request) {
                Ok(url) => (url, registry.describer()),
                Err(e) => return error_response(&e),
            }
        };

        let meta = describer.describe(&url).await;

        let created = state.registry.lock().await.insert(request, meta).await;
        match created {
            Ok(link) => {
                let response = LinkResponse::new(link, &state.base_url);
                info!("API: created link {}", response.share_url);
                json_response(StatusCode::CREATED, response)
            }
            Err(e) => error_response(&e),
        }
    }

    /// `GET /api/links/{id}`
    pub async fn get_link(id: web::Path<String>, state: web::Data<Arc<AppState>>) -> HttpResponse {
        let id = id.into_inner();
        let registry = state.registry.lock().await;
        match registry.get(&id) {
            Some(link) => json_response(
                StatusCode::OK,
                LinkResponse::new(link.clone(), &state.base_url),
            ),
            None => error_response(&ReelinkError::not_found(format!(
                "No short link with id '{}'",
                id
            ))),
        }
    }

    /// `DELETE /api/links/{id}`，幂等
    pub async fn delete_link(
        id: web::Path<String>,
        state: web::Data<Arc<AppState>>,
    ) -> HttpResponse {
        let id = id.into_inner();
        match state.registry.lock().await.remove(&id).await {
            Ok(removed) => {
                trace!("API: delete '{}' removed={}", id, removed);
                HttpResponse::NoContent().finish()
            }
            Err(e) => error_response(&e),
        }
    }

    /// `GET /api/suggestions?url=`
    pub async fn get_suggestions(
        query: web::Query<SuggestQuery>,
        state: web::Data<Arc<AppState>>,
    ) -> HttpResponse {
        let describer = state.registry.lock().await.describer();
        let ideas = describer.alias_ideas(&query.url).await;

        // 过滤已占用的别名需要最新状态，重新取锁
        let suggestions = state.registry.lock().await.pick_aliases(ideas);
        json_response(StatusCode::OK, suggestions)
    }
}

pub fn link_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/links", web::post().to(LinkService::post_link))
        .route("/links/{id}", web::get().to(LinkService::get_link))
        .route("/links/{id}", web::delete().to(LinkService::delete_link))
        .route("/suggestions", web::get().to(LinkService::get_suggestions))
}
