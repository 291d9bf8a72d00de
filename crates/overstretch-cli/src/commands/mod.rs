pub mod config;
pub mod defaults;
pub mod overrides;
pub mod simulate;

use std::sync::Arc;

use overstretch_core::{Clock, HostConfig, SettingsCache, SettingsStore, TomlStore};

/// Settings cache over the configured settings file
pub fn open_settings(config: &HostConfig, clock: Arc<dyn Clock>) -> Arc<SettingsCache> {
    let path = config.settings_path();
    let store: Arc<dyn SettingsStore> = Arc::new(TomlStore::load_or_empty(&path));
    tracing::debug!(path = %path.display(), "Using settings file");
    Arc::new(
        SettingsCache::with_namespace(store, clock, config.namespace()).with_ttl(config.cache_ttl()),
    )
}
