use anyhow::Result;

use overstretch_core::settings::write_defaults;
use overstretch_core::{HostConfig, MemoryStore};

pub fn run(config: &HostConfig, print: bool) -> Result<()> {
    let namespace = config.namespace();
    let store = MemoryStore::new();
    write_defaults(&store, |key| namespace.resolve(key));

    if print {
        print!("{}", store.to_toml_string()?);
        return Ok(());
    }

    let path = config.settings_path();
    store.save_toml(&path)?;
    println!("Wrote {} default settings to {}", store.len(), path.display());
    Ok(())
}
