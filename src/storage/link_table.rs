//! 链接表的读写
//!
//! 整表读、整表写，没有增量写入。

use std::sync::Arc;

use tracing::{debug, warn};

use super::models::{LINK_TABLE_VERSION, LinkTableEnvelope, StoredLinkTable, ShortLinkRecord};
use super::KvStore;
use crate::errors::{ReelinkError, Result};

pub struct LinkTable {
    store: Arc<dyn KvStore>,
    slot: String,
}

impl LinkTable {
    pub fn new(store: Arc<dyn KvStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// 读取链接表
    ///
    /// 槽位不存在、读取失败或内容无法解析时一律返回空表，不向上报错。
    pub async fn load(&self) -> Vec<ShortLinkRecord> {
        let content = match self.store.get(&self.slot).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("Slot '{}' is empty, starting with no links", self.slot);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read slot '{}', treating as empty: {}", self.slot, e);
                return Vec::new();
            }
        };

        match parse_table(&content) {
            Ok(links) => {
                debug!("Loaded {} links from slot '{}'", links.len(), self.slot);
                links
            }
            Err(e) => {
                warn!("Slot '{}' is unreadable, treating as empty: {}", self.slot, e);
                Vec::new()
            }
        }
    }

    /// 整体覆盖写入；写入失败必须向上返回
    pub async fn save(&self, links: &[ShortLinkRecord]) -> Result<()> {
        let content = encode_table(links)?;
        self.store.set(&self.slot, &content).await.map_err(|e| match e {
            ReelinkError::StorageWrite(_) => e,
            other => ReelinkError::storage_write(other.message().to_string()),
        })
    }
}

fn parse_table(content: &str) -> Result<Vec<ShortLinkRecord>> {
    match serde_json::from_str::<StoredLinkTable>(content)? {
        StoredLinkTable::Versioned(envelope) if envelope.version == LINK_TABLE_VERSION => {
            Ok(envelope.links)
        }
        StoredLinkTable::Versioned(envelope) => Err(ReelinkError::serialization(format!(
            "Unsupported link table version {}",
            envelope.version
        ))),
        StoredLinkTable::Legacy(links) => Ok(links),
    }
}

fn encode_table(links: &[ShortLinkRecord]) -> Result<String> {
    let envelope = LinkTableEnvelope {
        version: LINK_TABLE_VERSION,
        links: links.to_vec(),
    };
    Ok(serde_json::to_string(&envelope)?)
}
