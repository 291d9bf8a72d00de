//! Runtime-tunable configuration
//!
//! - `keys` - key names and suffix namespaces
//! - `store` - key-value backends
//! - `snapshot` - one resolved read of every tunable
//! - `cache` - TTL-bounded snapshot cache
//! - `overrides` - per-package override records

pub mod cache;
pub mod keys;
pub mod overrides;
pub mod snapshot;
pub mod store;

pub use cache::SettingsCache;
pub use keys::KeyNamespace;
pub use overrides::{format_overrides, parse_overrides, AppOverride};
pub use snapshot::{write_defaults, ConfigSnapshot, ScaleChannel, ScaleMode};
pub use store::{MemoryStore, SettingsStore, TomlStore};
