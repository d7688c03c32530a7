//! 链接注册表
//!
//! 持有按新→旧排列的短链接列表，生成短码，每次变更后整体落盘，
//! 解析路由键时累计点击数。
//!
//! 元数据生成走 [`LinkDescriber`]，它不借用注册表，
//! 调用方可以在不持锁的情况下等待慢速的外部服务。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::{LinksConfig, SuggesterConfig};
use crate::errors::{ReelinkError, Result};
use crate::services::suggester::{
    LinkMetadata, MAX_ALIAS_SUGGESTIONS, MAX_TITLE_CHARS, MetadataSuggester, fallback_aliases,
};
use crate::storage::{KvStore, LinkTable, ShortLinkRecord};
use crate::utils::url_validator::validate_url;
use crate::utils::{CodeGenerator, build_share_url, is_valid_alias, normalize_route_key, truncate_chars};

/// 注册表参数
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub codes: CodeGenerator,
    pub max_code_attempts: usize,
    pub poster_template: String,
    pub suggest_timeout: Duration,
}

impl RegistrySettings {
    pub fn from_config(links: &LinksConfig, suggester: &SuggesterConfig) -> Result<Self> {
        if links.max_code_attempts == 0 {
            return Err(ReelinkError::config("max_code_attempts must be at least 1"));
        }

        Ok(Self {
            codes: CodeGenerator::new(links.code_length, &links.code_charset)?,
            max_code_attempts: links.max_code_attempts,
            poster_template: links.poster_template.clone(),
            suggest_timeout: Duration::from_secs(suggester.timeout_secs.max(1)),
        })
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        let links = LinksConfig::default();
        Self {
            codes: CodeGenerator::default(),
            max_code_attempts: links.max_code_attempts,
            poster_template: links.poster_template,
            suggest_timeout: Duration::from_secs(10),
        }
    }
}

/// 新建链接请求
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// 目标 URL
    pub original_url: String,
    /// 可选别名，与短码共用同一个键空间
    pub alias: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// 带超时的元数据生成，失败一律回退
#[derive(Clone)]
pub struct LinkDescriber {
    suggester: Arc<dyn MetadataSuggester>,
    timeout: Duration,
}

impl LinkDescriber {
    pub fn new(suggester: Arc<dyn MetadataSuggester>, timeout: Duration) -> Self {
        Self { suggester, timeout }
    }

    /// 标题和分类；超时、出错或字段为空时使用回退值
    pub async fn describe(&self, url: &str) -> LinkMetadata {
        let result = tokio::time::timeout(self.timeout, self.suggester.analyze_link(url)).await;

        match result {
            Ok(Ok(meta)) if !meta.title.trim().is_empty() && !meta.category.trim().is_empty() => {
                LinkMetadata {
                    title: truncate_chars(meta.title.trim(), MAX_TITLE_CHARS),
                    category: meta.category.trim().to_string(),
                }
            }
            Ok(Ok(_)) => {
                warn!("Suggester {} returned empty metadata, using fallback", self.suggester.name());
                LinkMetadata::fallback()
            }
            Ok(Err(e)) => {
                warn!("Suggester {} failed, using fallback: {}", self.suggester.name(), e);
                LinkMetadata::fallback()
            }
            Err(_) => {
                warn!(
                    "Suggester {} timed out after {:?}, using fallback",
                    self.suggester.name(),
                    self.timeout
                );
                LinkMetadata::fallback()
            }
        }
    }

    /// 原始别名建议；失败或超时返回 `None`
    pub async fn alias_ideas(&self, url: &str) -> Option<Vec<String>> {
        match tokio::time::timeout(self.timeout, self.suggester.suggest_aliases(url)).await {
            Ok(Ok(list)) => Some(list),
            Ok(Err(e)) => {
                warn!("Alias suggestion failed, using fallback: {}", e);
                None
            }
            Err(_) => {
                warn!("Alias suggestion timed out, using fallback");
                None
            }
        }
    }
}

pub struct LinkRegistry {
    table: LinkTable,
    describer: LinkDescriber,
    settings: RegistrySettings,
    links: Vec<ShortLinkRecord>,
}

impl LinkRegistry {
    /// 创建注册表并读取已持久化的链接表
    pub async fn open(
        store: Arc<dyn KvStore>,
        slot: &str,
        suggester: Arc<dyn MetadataSuggester>,
        settings: RegistrySettings,
    ) -> Self {
        let table = LinkTable::new(store, slot);
        let links = table.load().await;
        info!(
            "LinkRegistry: loaded {} links from {} slot '{}'",
            links.len(),
            table.backend_name(),
            table.slot()
        );

        Self {
            table,
            describer: LinkDescriber::new(suggester, settings.suggest_timeout),
            settings,
            links,
        }
    }

    pub fn records(&self) -> &[ShortLinkRecord] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ShortLinkRecord> {
        self.links.iter().find(|link| link.id == id)
    }

    /// 元数据生成器的句柄，可在释放注册表锁之后使用
    pub fn describer(&self) -> LinkDescriber {
        self.describer.clone()
    }

    /// 读取持久化的链接表，不会失败
    pub async fn load(&self) -> Vec<ShortLinkRecord> {
        self.table.load().await
    }

    /// 用 `records` 整体覆盖持久化的链接表
    pub async fn save(&self, records: &[ShortLinkRecord]) -> Result<()> {
        self.table.save(records).await
    }

    /// 丢弃内存状态，重新读取持久化内容
    pub async fn reload(&mut self) {
        self.links = self.table.load().await;
        debug!("LinkRegistry: reloaded {} links", self.links.len());
    }

    /// 当前占用的全部短码和别名
    fn keyspace(&self) -> HashSet<&str> {
        self.links
            .iter()
            .flat_map(|link| std::iter::once(link.short_code.as_str()).chain(link.alias.as_deref()))
            .collect()
    }

    fn validate_alias(&self, alias: Option<&str>) -> Result<Option<String>> {
        let Some(alias) = alias.map(str::trim).filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        if !is_valid_alias(alias) {
            return Err(ReelinkError::validation(format!(
                "Invalid alias '{}'. Use 1-64 letters, digits, '_', '-' or '.'",
                alias
            )));
        }
        if self.keyspace().contains(alias) {
            return Err(ReelinkError::alias_conflict(format!(
                "Alias '{}' is already taken",
                alias
            )));
        }

        Ok(Some(alias.to_string()))
    }

    /// 在请求元数据之前检查 URL 和别名，返回规范化后的 URL
    pub fn check_request(&self, req: &CreateLinkRequest) -> Result<String> {
        let url = validate_url(&req.original_url)?;
        self.validate_alias(req.alias.as_deref())?;
        Ok(url)
    }

    fn generate_unique_code(&self, alias: Option<&str>) -> Result<String> {
        let mut taken = self.keyspace();
        taken.extend(alias);

        for attempt in 1..=self.settings.max_code_attempts {
            let code = self.settings.codes.generate();
            if !taken.contains(code.as_str()) {
                return Ok(code);
            }
            debug!("Short code collision on attempt {}: {}", attempt, code);
        }

        Err(ReelinkError::code_space_exhausted(format!(
            "No free short code after {} attempts (length {})",
            self.settings.max_code_attempts,
            self.settings.codes.length()
        )))
    }

    fn poster_url(&self) -> String {
        let seed: u64 = rand::random();
        self.settings
            .poster_template
            .replace("{seed}", &seed.to_string())
    }

    /// 新建短链接并写到表头
    ///
    /// 元数据生成失败不阻塞创建。
    pub async fn create(&mut self, req: CreateLinkRequest) -> Result<ShortLinkRecord> {
        let url = self.check_request(&req)?;
        let meta = self.describer.describe(&url).await;
        self.insert(req, meta).await
    }

    /// 用已生成的元数据落盘一条新链接
    ///
    /// 元数据可能是在锁外生成的，这里重新校验别名并在当前状态下挑选短码。
    pub async fn insert(
        &mut self,
        req: CreateLinkRequest,
        meta: LinkMetadata,
    ) -> Result<ShortLinkRecord> {
        let original_url = validate_url(&req.original_url)?;
        let alias = self.validate_alias(req.alias.as_deref())?;
        let short_code = self.generate_unique_code(alias.as_deref())?;

        let record = ShortLinkRecord {
            id: uuid::Uuid::new_v4().to_string(),
            original_url,
            short_code,
            alias,
            title: meta.title,
            category: meta.category,
            clicks: 0,
            poster_url: self.poster_url(),
            created_at: Utc::now(),
        };

        let mut next = Vec::with_capacity(self.links.len() + 1);
        next.push(record.clone());
        next.extend(self.links.iter().cloned());
        self.table.save(&next).await?;
        self.links = next;

        info!(
            "LinkRegistry: created '{}' -> '{}'",
            record.route_key(),
            record.original_url
        );
        Ok(record)
    }

    /// 解析路由键并累计一次点击
    ///
    /// 未命中返回 `Ok(None)`，不写存储。
    pub async fn resolve(&mut self, code: &str) -> Result<Option<ShortLinkRecord>> {
        let key = normalize_route_key(code);
        if key.is_empty() {
            return Ok(None);
        }

        // 短码优先于别名
        let index = self
            .links
            .iter()
            .position(|link| link.short_code == key)
            .or_else(|| {
                self.links
                    .iter()
                    .position(|link| link.alias.as_deref() == Some(key))
            });

        let Some(index) = index else {
            debug!("LinkRegistry: no link for key '{}'", key);
            return Ok(None);
        };

        let mut next = self.links.clone();
        next[index].clicks = next[index].clicks.saturating_add(1);
        self.table.save(&next).await?;
        self.links = next;

        let record = self.links[index].clone();
        debug!(
            "LinkRegistry: resolved '{}' -> '{}' (clicks {})",
            key, record.original_url, record.clicks
        );
        Ok(Some(record))
    }

    /// 按 id 删除；没有匹配时返回 `false`
    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.links.iter().position(|link| link.id == id) else {
            debug!("LinkRegistry: remove of unknown id '{}' ignored", id);
            return Ok(false);
        };

        let mut next = self.links.clone();
        let removed = next.remove(index);
        self.table.save(&next).await?;
        self.links = next;

        info!("LinkRegistry: deleted '{}'", removed.route_key());
        Ok(true)
    }

    /// 标题、别名、短码的大小写不敏感子串匹配
    pub fn search(&self, query: &str) -> Vec<ShortLinkRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.links.clone();
        }

        self.links
            .iter()
            .filter(|link| {
                link.title.to_lowercase().contains(&needle)
                    || link.short_code.to_lowercase().contains(&needle)
                    || link
                        .alias
                        .as_deref()
                        .is_some_and(|alias| alias.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// 别名建议，外部服务不可用时使用固定列表
    pub async fn suggest_aliases(&self, url: &str) -> Vec<String> {
        let ideas = self.describer.alias_ideas(url).await;
        self.pick_aliases(ideas)
    }

    /// 从原始建议中挑出格式合法且未被占用的别名
    pub fn pick_aliases(&self, ideas: Option<Vec<String>>) -> Vec<String> {
        let taken = self.keyspace();
        let free = |alias: &String| is_valid_alias(alias) && !taken.contains(alias.as_str());

        let picked: Vec<String> = ideas
            .unwrap_or_default()
            .into_iter()
            .filter(free)
            .take(MAX_ALIAS_SUGGESTIONS)
            .collect();

        if !picked.is_empty() {
            return picked;
        }
        fallback_aliases().into_iter().filter(free).collect()
    }

    /// 对外分享链接，有别名时用别名
    pub fn share_url(base: &str, record: &ShortLinkRecord) -> String {
        build_share_url(base, record.route_key())
    }
}
