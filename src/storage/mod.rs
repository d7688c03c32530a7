//! 持久化层
//!
//! `KvStore` 是一个只有 get/set 的字符串槽位存储，链接表整体序列化后
//! 写进其中一个槽位。替换后端不需要改动注册表逻辑。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StorageBackendKind, StorageConfig};
use crate::errors::Result;

pub mod backends;
pub mod link_table;
pub mod models;

pub use backends::{FileStore, MemoryStore};
pub use link_table::LinkTable;
pub use models::{LINK_TABLE_VERSION, LinkTableEnvelope, ShortLinkRecord};

#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取槽位内容，不存在时返回 `None`
    async fn get(&self, slot: &str) -> Result<Option<String>>;

    /// 整体覆盖槽位内容
    async fn set(&self, slot: &str, value: &str) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置中的后端名称创建存储
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match config.backend_kind()? {
            StorageBackendKind::File => Arc::new(FileStore::open(&config.data_dir).await?),
            StorageBackendKind::Memory => Arc::new(MemoryStore::new()),
        };

        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
