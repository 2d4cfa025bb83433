//! Status command handler

use anyhow::Result;

use linkdash_core::{Config, LoadOutcome};

use super::Store;
use crate::output::{Output, OutputFormat};

/// Show where links are stored and how many there are
pub fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let loaded = match store.load_outcome() {
        LoadOutcome::Fresh => "nothing stored yet".to_string(),
        LoadOutcome::Loaded { count } => format!("{} link(s)", count),
        LoadOutcome::Recovered { reason } => format!("unreadable, started empty ({})", reason),
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "backend": config.backend,
                    "data_dir": config.data_dir,
                    "storage_key": store.key(),
                    "links": store.len(),
                    "recovered": matches!(store.load_outcome(), LoadOutcome::Recovered { .. })
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("linkdash Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Backend:  {}", config.backend);
            println!("  Location: {}", config.data_dir.display());
            println!("  Key:      {}", store.key());
            println!("  On load:  {}", loaded);
            println!();
            println!("Links: {}", store.len());
        }
    }

    Ok(())
}
