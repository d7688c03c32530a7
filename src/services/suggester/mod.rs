//! 元数据生成
//!
//! 给定 URL，生成目录风格的标题、分类，或几个别名建议。
//! 实现可以失败，调用方负责回退到固定值。

mod fallback;
mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SuggesterConfig;
use crate::errors::{ReelinkError, Result};

pub use fallback::FallbackSuggester;
pub use gemini::GeminiSuggester;

/// 生成失败时使用的标题
pub const FALLBACK_TITLE: &str = "Lançamento Exclusivo";
/// 生成失败时使用的分类
pub const FALLBACK_CATEGORY: &str = "Séries Originais";
/// 生成失败时使用的别名建议
pub const FALLBACK_ALIASES: [&str; 3] = ["play-agora", "acesso-premium", "link-vip"];

/// 标题最大字符数
pub const MAX_TITLE_CHARS: usize = 25;
/// 别名建议最多条数
pub const MAX_ALIAS_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub title: String,
    pub category: String,
}

impl LinkMetadata {
    pub fn fallback() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            category: FALLBACK_CATEGORY.to_string(),
        }
    }
}

pub fn fallback_aliases() -> Vec<String> {
    FALLBACK_ALIASES.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
pub trait MetadataSuggester: Send + Sync {
    /// 为 URL 生成标题和分类
    async fn analyze_link(&self, url: &str) -> Result<LinkMetadata>;

    /// 为 URL 生成有序的别名建议
    async fn suggest_aliases(&self, url: &str) -> Result<Vec<String>>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 根据配置选择实现：有 API key 用 Gemini，否则直接用回退值
pub fn create_suggester(config: &SuggesterConfig) -> Arc<dyn MetadataSuggester> {
    let suggester: Arc<dyn MetadataSuggester> = if config.api_key.is_empty() {
        debug!("Suggester: no API key configured");
        Arc::new(FallbackSuggester)
    } else {
        Arc::new(GeminiSuggester::new(config))
    };

    info!("Suggester: Initialized with {} provider", suggester.name());
    suggester
}

/// 去掉模型有时会包上的 markdown 代码块
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // 跳过语言标记，例如 ```json
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

/// 解析 `{title, category}`，任一字段为空视为失败
pub fn parse_metadata(text: &str) -> Result<LinkMetadata> {
    let metadata: LinkMetadata = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ReelinkError::suggester(format!("Malformed metadata response: {}", e)))?;

    let title = metadata.title.trim();
    let category = metadata.category.trim();
    if title.is_empty() || category.is_empty() {
        return Err(ReelinkError::suggester("Metadata response has empty fields"));
    }

    Ok(LinkMetadata {
        title: title.to_string(),
        category: category.to_string(),
    })
}

/// 解析别名建议数组
pub fn parse_aliases(text: &str) -> Result<Vec<String>> {
    let aliases: Vec<String> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ReelinkError::suggester(format!("Malformed alias response: {}", e)))?;

    Ok(aliases
        .into_iter()
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty())
        .collect())
}
