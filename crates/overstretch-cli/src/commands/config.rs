use std::sync::Arc;

use anyhow::Result;

use overstretch_core::{HostConfig, MonotonicClock};

pub fn run(config: &HostConfig) -> Result<()> {
    let settings = super::open_settings(config, Arc::new(MonotonicClock::new()));
    let snapshot = settings.get(true);

    println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    Ok(())
}
