use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::Result;
use crate::storage::KvStore;

/// 进程内存储，进程退出即丢失
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置槽位内容
    pub fn with_slot(slot: &str, value: &str) -> Self {
        let store = Self::new();
        store.slots.write().insert(slot.to_string(), value.to_string());
        store
    }

    /// 同步读取，测试中用于比对字节
    pub fn snapshot(&self, slot: &str) -> Option<String> {
        self.slots.read().get(slot).cloned()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(slot).cloned())
    }

    async fn set(&self, slot: &str, value: &str) -> Result<()> {
        self.slots.write().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
