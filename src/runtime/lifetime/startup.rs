use std::time::Instant;

use tracing::debug;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{LinkRegistry, RegistrySettings, create_suggester};
use crate::storage::StorageFactory;

/// 按配置组装链接注册表：存储后端、元数据服务、短码设置
pub async fn prepare_registry(config: &AppConfig) -> Result<LinkRegistry> {
    let start_time = Instant::now();
    debug!("Preparing link registry...");

    let settings = RegistrySettings::from_config(&config.links, &config.suggester)?;
    let store = StorageFactory::create(&config.storage).await?;
    let suggester = create_suggester(&config.suggester);

    let registry = LinkRegistry::open(store, &config.storage.slot, suggester, settings).await;

    debug!(
        "Link registry ready in {:.2?} ({} links)",
        start_time.elapsed(),
        registry.len()
    );
    Ok(registry)
}
