use async_trait::async_trait;

use super::{LinkMetadata, MetadataSuggester, fallback_aliases};
use crate::errors::Result;

/// 不访问网络，总是返回固定值
pub struct FallbackSuggester;

#[async_trait]
impl MetadataSuggester for FallbackSuggester {
    async fn analyze_link(&self, _url: &str) -> Result<LinkMetadata> {
        Ok(LinkMetadata::fallback())
    }

    async fn suggest_aliases(&self, _url: &str) -> Result<Vec<String>> {
        Ok(fallback_aliases())
    }

    fn name(&self) -> &'static str {
        "Fallback"
    }
}
