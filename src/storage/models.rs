use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 当前持久化格式版本
pub const LINK_TABLE_VERSION: u32 = 1;

/// 一条短链接记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub clicks: u64,
    #[serde(alias = "poster")]
    pub poster_url: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ShortLinkRecord {
    /// 对外展示的路由键：有别名用别名，否则用短码
    pub fn route_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.short_code)
    }
}

/// 槽位中保存的链接表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTableEnvelope {
    pub version: u32,
    pub links: Vec<ShortLinkRecord>,
}

/// 读取时兼容的两种布局：带版本的信封，或早期的裸数组
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredLinkTable {
    Versioned(LinkTableEnvelope),
    Legacy(Vec<ShortLinkRecord>),
}
