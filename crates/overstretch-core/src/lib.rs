pub mod caller;
pub mod clock;
pub mod config;
pub mod effect;
pub mod error;
pub mod physics;
pub mod settings;
pub mod surface;

pub use caller::{CallerContext, CallerKind};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::HostConfig;
pub use effect::{EdgeEffect, EffectBehavior, GestureState};
pub use error::{Error, Result};
pub use settings::{
    AppOverride, ConfigSnapshot, KeyNamespace, MemoryStore, SettingsCache, SettingsStore, TomlStore,
};
pub use surface::{GlowFrame, RecordingSurface, RenderSurface, Transform2D};
