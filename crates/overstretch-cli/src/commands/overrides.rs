use std::sync::Arc;

use anyhow::Result;

use overstretch_core::settings::{overrides, parse_overrides};
use overstretch_core::{HostConfig, MonotonicClock};

pub fn run(config: &HostConfig, raw: Option<&str>, package: Option<&str>) -> Result<()> {
    let raw = match raw {
        Some(raw) => raw.to_string(),
        None => super::open_settings(config, Arc::new(MonotonicClock::new()))
            .overrides_raw()
            .unwrap_or_default(),
    };

    if let Some(package) = package {
        match overrides::resolve(&raw, package) {
            Some(entry) => {
                println!("{}", entry);
                println!(
                    "  filter: {}  scale: {}  ignore: {}",
                    entry.filter, entry.scale, entry.ignore
                );
            }
            None => println!("No override for {}", package),
        }
        return Ok(());
    }

    let entries = parse_overrides(&raw);
    if entries.is_empty() {
        println!("No overrides configured.");
        return Ok(());
    }

    println!("Overrides ({}):\n", entries.len());
    for entry in &entries {
        let mut flags = Vec::new();
        if entry.filter {
            flags.push("filter");
        }
        if entry.ignore {
            flags.push("ignored");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("  {} - scale {}{}", entry.package, entry.scale, flags);
    }

    Ok(())
}
