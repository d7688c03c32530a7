//! LinkRegistry tests
//!
//! Behaviour of the registry over in-memory and failing stores.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use reelink::errors::{ReelinkError, Result};
use reelink::services::suggester::{
    FALLBACK_ALIASES, FALLBACK_CATEGORY, FALLBACK_TITLE, FallbackSuggester, LinkMetadata,
    MetadataSuggester,
};
use reelink::services::{CreateLinkRequest, LinkRegistry, RegistrySettings};
use reelink::storage::{KvStore, MemoryStore};
use reelink::utils::CodeGenerator;

const SLOT: &str = "netflix_links";

// =============================================================================
// Test doubles
// =============================================================================

/// Suggester returning fixed metadata
struct FixedSuggester {
    title: String,
    category: String,
    aliases: Vec<String>,
}

impl FixedSuggester {
    fn new(title: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            category: category.to_string(),
            aliases: vec!["maratona".into(), "bad alias".into(), "serie-nova".into()],
        }
    }
}

#[async_trait]
impl MetadataSuggester for FixedSuggester {
    async fn analyze_link(&self, _url: &str) -> Result<LinkMetadata> {
        Ok(LinkMetadata {
            title: self.title.clone(),
            category: self.category.clone(),
        })
    }

    async fn suggest_aliases(&self, _url: &str) -> Result<Vec<String>> {
        Ok(self.aliases.clone())
    }

    fn name(&self) -> &'static str {
        "Fixed"
    }
}

/// Suggester that always fails
struct BrokenSuggester;

#[async_trait]
impl MetadataSuggester for BrokenSuggester {
    async fn analyze_link(&self, _url: &str) -> Result<LinkMetadata> {
        Err(ReelinkError::suggester("service unavailable"))
    }

    async fn suggest_aliases(&self, _url: &str) -> Result<Vec<String>> {
        Err(ReelinkError::suggester("service unavailable"))
    }

    fn name(&self) -> &'static str {
        "Broken"
    }
}

/// Suggester slower than any reasonable timeout
struct SlowSuggester;

#[async_trait]
impl MetadataSuggester for SlowSuggester {
    async fn analyze_link(&self, _url: &str) -> Result<LinkMetadata> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(LinkMetadata {
            title: "Tarde demais".into(),
            category: "Nunca".into(),
        })
    }

    async fn suggest_aliases(&self, _url: &str) -> Result<Vec<String>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec!["tarde".into()])
    }

    fn name(&self) -> &'static str {
        "Slow"
    }
}

/// Store whose writes can be switched off
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: std::sync::atomic::AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_writes: std::sync::atomic::AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    fn break_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        self.inner.get(slot).await
    }

    async fn set(&self, slot: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ReelinkError::storage_write("quota exceeded"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(slot, value).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn open_with(
    store: Arc<dyn KvStore>,
    suggester: Arc<dyn MetadataSuggester>,
    settings: RegistrySettings,
) -> LinkRegistry {
    LinkRegistry::open(store, SLOT, suggester, settings).await
}

async fn memory_registry() -> (Arc<MemoryStore>, LinkRegistry) {
    let store = Arc::new(MemoryStore::new());
    let registry = open_with(
        store.clone(),
        Arc::new(FallbackSuggester),
        RegistrySettings::default(),
    )
    .await;
    (store, registry)
}

// =============================================================================
// Creation
// =============================================================================

#[tokio::test]
async fn test_create_uses_suggested_metadata() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = open_with(
        store.clone(),
        Arc::new(FixedSuggester::new("A Casa de Papel", "Suspense")),
        RegistrySettings::default(),
    )
    .await;

    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();

    assert_eq!(link.original_url, "https://example.com/a");
    assert_eq!(link.title, "A Casa de Papel");
    assert_eq!(link.category, "Suspense");
    assert_eq!(link.clicks, 0);
    assert_eq!(link.alias, None);
    assert_eq!(link.short_code.len(), 6);
    assert!(
        link.short_code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );

    // 已经落盘
    let persisted = store.snapshot(SLOT).expect("slot should be written");
    assert!(persisted.contains(&link.short_code));
    assert_eq!(registry.records()[0], link);
}

#[tokio::test]
async fn test_create_truncates_long_titles() {
    let mut registry = open_with(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedSuggester::new(
            "Uma Série Com Um Título Bem Comprido Demais",
            "Drama",
        )),
        RegistrySettings::default(),
    )
    .await;

    let link = registry
        .create(CreateLinkRequest::new("https://example.com/long"))
        .await
        .unwrap();
    assert_eq!(link.title.chars().count(), 25);
    assert_eq!(link.title, "Uma Série Com Um Título B");
}

#[tokio::test]
async fn test_failing_suggester_falls_back() {
    let mut registry = open_with(
        Arc::new(MemoryStore::new()),
        Arc::new(BrokenSuggester),
        RegistrySettings::default(),
    )
    .await;

    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();
    assert_eq!(link.title, FALLBACK_TITLE);
    assert_eq!(link.category, FALLBACK_CATEGORY);
}

#[tokio::test]
async fn test_slow_suggester_times_out_to_fallback() {
    let settings = RegistrySettings {
        suggest_timeout: Duration::from_millis(50),
        ..RegistrySettings::default()
    };
    let mut registry = open_with(Arc::new(MemoryStore::new()), Arc::new(SlowSuggester), settings).await;

    let link = registry
        .create(CreateLinkRequest::new("https://example.com/slow"))
        .await
        .unwrap();
    assert_eq!(link.title, FALLBACK_TITLE);
    assert_eq!(link.category, FALLBACK_CATEGORY);

    let aliases = registry.suggest_aliases("https://example.com/slow").await;
    assert_eq!(aliases, FALLBACK_ALIASES.map(String::from).to_vec());
}

#[tokio::test]
async fn test_new_links_go_to_the_head() {
    let (_, mut registry) = memory_registry().await;

    let first = registry
        .create(CreateLinkRequest::new("https://example.com/1"))
        .await
        .unwrap();
    let second = registry
        .create(CreateLinkRequest::new("https://example.com/2"))
        .await
        .unwrap();

    let ids: Vec<&str> = registry.records().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_generated_codes_are_distinct() {
    let (_, mut registry) = memory_registry().await;

    for i in 0..50 {
        registry
            .create(CreateLinkRequest::new(format!("https://example.com/{}", i)))
            .await
            .unwrap();
    }

    let codes: HashSet<&str> = registry
        .records()
        .iter()
        .map(|l| l.short_code.as_str())
        .collect();
    assert_eq!(codes.len(), 50);
}

#[tokio::test]
async fn test_code_space_exhaustion() {
    let settings = RegistrySettings {
        codes: CodeGenerator::new(1, "a").unwrap(),
        max_code_attempts: 4,
        ..RegistrySettings::default()
    };
    let store = Arc::new(MemoryStore::new());
    let mut registry = open_with(store.clone(), Arc::new(FallbackSuggester), settings).await;

    let only = registry
        .create(CreateLinkRequest::new("https://example.com/1"))
        .await
        .unwrap();
    assert_eq!(only.short_code, "a");
    let before = store.snapshot(SLOT);

    let err = registry
        .create(CreateLinkRequest::new("https://example.com/2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelinkError::CodeSpaceExhausted(_)));
    assert_eq!(registry.len(), 1);
    assert_eq!(store.snapshot(SLOT), before);
}

// =============================================================================
// Aliases
// =============================================================================

#[tokio::test]
async fn test_alias_conflicts_are_rejected() {
    let (_, mut registry) = memory_registry().await;

    let first = registry
        .create(CreateLinkRequest::new("https://example.com/1").with_alias("pipoca-play"))
        .await
        .unwrap();
    assert_eq!(first.alias.as_deref(), Some("pipoca-play"));

    let err = registry
        .create(CreateLinkRequest::new("https://example.com/2").with_alias("pipoca-play"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelinkError::AliasConflict(_)));

    // 别名和短码共用同一个键空间
    let err = registry
        .create(CreateLinkRequest::new("https://example.com/3").with_alias(first.short_code.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelinkError::AliasConflict(_)));

    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_invalid_alias_is_rejected() {
    let (store, mut registry) = memory_registry().await;

    let err = registry
        .create(CreateLinkRequest::new("https://example.com/1").with_alias("tem espaço"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelinkError::Validation(_)));
    assert!(registry.is_empty());
    assert_eq!(store.snapshot(SLOT), None);
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let (_, mut registry) = memory_registry().await;

    for url in ["", "javascript:alert(1)", "ftp://example.com"] {
        let err = registry.create(CreateLinkRequest::new(url)).await.unwrap_err();
        assert!(matches!(err, ReelinkError::Validation(_)), "{url}");
    }
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_suggest_aliases_filters_invalid_entries() {
    let registry = open_with(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedSuggester::new("T", "C")),
        RegistrySettings::default(),
    )
    .await;

    let aliases = registry.suggest_aliases("https://example.com").await;
    assert_eq!(aliases, vec!["maratona".to_string(), "serie-nova".to_string()]);
}

#[tokio::test]
async fn test_suggest_aliases_fallback_on_error() {
    let registry = open_with(
        Arc::new(MemoryStore::new()),
        Arc::new(BrokenSuggester),
        RegistrySettings::default(),
    )
    .await;

    let aliases = registry.suggest_aliases("https://example.com").await;
    assert_eq!(aliases, vec!["play-agora", "acesso-premium", "link-vip"]);
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_counts_clicks() {
    let (_, mut registry) = memory_registry().await;
    assert_eq!(registry.len(), 0);
    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(link.clicks, 0);

    let hit = registry.resolve(&link.short_code).await.unwrap().unwrap();
    assert_eq!(hit.original_url, "https://example.com/a");
    assert_eq!(hit.clicks, 1);

    let hit = registry.resolve(&link.short_code).await.unwrap().unwrap();
    assert_eq!(hit.clicks, 2);

    // 重新加载后点击数仍在
    registry.reload().await;
    assert_eq!(registry.get(&link.id).unwrap().clicks, 2);
}

#[tokio::test]
async fn test_resolve_by_alias_and_path_forms() {
    let (_, mut registry) = memory_registry().await;
    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a").with_alias("link-vip"))
        .await
        .unwrap();

    for key in [
        "link-vip",
        "link-vip/",
        "app/sub/link-vip",
        link.short_code.as_str(),
        format!("{}/", link.short_code).as_str(),
        format!("x/y/{}", link.short_code).as_str(),
    ] {
        let hit = registry.resolve(key).await.unwrap();
        assert_eq!(
            hit.map(|l| l.id),
            Some(link.id.clone()),
            "key {key} should resolve"
        );
    }
    assert_eq!(registry.get(&link.id).unwrap().clicks, 6);
}

#[tokio::test]
async fn test_resolve_is_case_sensitive() {
    let (_, mut registry) = memory_registry().await;
    registry
        .create(CreateLinkRequest::new("https://example.com/a").with_alias("link-vip"))
        .await
        .unwrap();

    assert!(registry.resolve("LINK-VIP").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_code_writes_nothing() {
    let (store, mut registry) = memory_registry().await;
    registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();
    let before = store.snapshot(SLOT);

    assert!(registry.resolve("nope42").await.unwrap().is_none());
    assert!(registry.resolve("").await.unwrap().is_none());
    assert!(registry.resolve("/").await.unwrap().is_none());

    assert_eq!(store.snapshot(SLOT), before);
}

#[tokio::test]
async fn test_short_code_wins_over_alias() {
    let (_, mut registry) = memory_registry().await;
    let target = registry
        .create(CreateLinkRequest::new("https://example.com/code"))
        .await
        .unwrap();

    // 手工构造一个别名与另一条短码相同的旧数据
    let mut records = registry.records().to_vec();
    let mut shadow = target.clone();
    shadow.id = "shadow".into();
    shadow.short_code = "zzzzzz".into();
    shadow.alias = Some(target.short_code.clone());
    shadow.original_url = "https://example.com/alias".into();
    records.insert(0, shadow);
    registry.save(&records).await.unwrap();
    registry.reload().await;

    let hit = registry.resolve(&target.short_code).await.unwrap().unwrap();
    assert_eq!(hit.original_url, "https://example.com/code");
}

// =============================================================================
// Removal
// =============================================================================

#[tokio::test]
async fn test_remove_then_resolve_misses() {
    let (_, mut registry) = memory_registry().await;
    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();

    assert!(registry.remove(&link.id).await.unwrap());
    assert!(registry.resolve(&link.short_code).await.unwrap().is_none());
    assert!(registry.is_empty());

    // 再删一次不报错
    assert!(!registry.remove(&link.id).await.unwrap());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_save_of_load_is_byte_identical() {
    let (store, mut registry) = memory_registry().await;
    for i in 0..3 {
        registry
            .create(CreateLinkRequest::new(format!("https://example.com/{}", i)))
            .await
            .unwrap();
    }
    let before = store.snapshot(SLOT).unwrap();

    let loaded = registry.load().await;
    registry.save(&loaded).await.unwrap();

    assert_eq!(store.snapshot(SLOT).unwrap(), before);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let store = Arc::new(MemoryStore::new());
    let link = {
        let mut registry = open_with(
            store.clone(),
            Arc::new(FallbackSuggester),
            RegistrySettings::default(),
        )
        .await;
        let link = registry
            .create(CreateLinkRequest::new("https://example.com/a"))
            .await
            .unwrap();
        registry.resolve(&link.short_code).await.unwrap();
        link
    };

    let registry = open_with(store, Arc::new(FallbackSuggester), RegistrySettings::default()).await;
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.records()[0].id, link.id);
    assert_eq!(registry.records()[0].clicks, 1);
}

#[tokio::test]
async fn test_corrupted_slot_loads_empty() {
    let store = Arc::new(MemoryStore::with_slot(SLOT, "{not json"));
    let registry = open_with(store, Arc::new(FallbackSuggester), RegistrySettings::default()).await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_failed_write_leaves_memory_untouched() {
    let store = Arc::new(FlakyStore::new());
    let mut registry = open_with(
        store.clone(),
        Arc::new(FallbackSuggester),
        RegistrySettings::default(),
    )
    .await;
    let link = registry
        .create(CreateLinkRequest::new("https://example.com/a"))
        .await
        .unwrap();
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);

    store.break_writes();

    let err = registry
        .create(CreateLinkRequest::new("https://example.com/b"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelinkError::StorageWrite(_)));
    assert_eq!(registry.len(), 1);

    let err = registry.resolve(&link.short_code).await.unwrap_err();
    assert!(matches!(err, ReelinkError::StorageWrite(_)));
    assert_eq!(registry.get(&link.id).unwrap().clicks, 0);

    let err = registry.remove(&link.id).await.unwrap_err();
    assert!(matches!(err, ReelinkError::StorageWrite(_)));
    assert_eq!(registry.len(), 1);
}
