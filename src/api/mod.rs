//! HTTP 前端
//!
//! `?c=<key>` 跳转约定，以及链接注册表上的一组 JSON 接口。

pub mod services;

use std::sync::Arc;

use actix_web::web;
use tokio::sync::Mutex;

use crate::services::LinkRegistry;

/// 所有 handler 共享的状态
///
/// 注册表放在一把异步锁后面，同一时刻只有一个写者。
/// 耗时的元数据请求在锁外进行。
pub struct AppState {
    pub registry: Mutex<LinkRegistry>,
    /// 生成分享链接用的前缀，例如 `https://reel.example/`
    pub base_url: String,
}

impl AppState {
    pub fn new(registry: LinkRegistry, base_url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            registry: Mutex::new(registry),
            base_url: base_url.into(),
        })
    }
}

/// 注册全部路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(services::links::link_routes())
        .service(services::redirect::redirect_routes());
}
