use std::path::Path;

use anyhow::Context;
use sems_core::StationConfig;

/// Reads and validates the station configuration JSON file.
pub async fn load_station_config(path: &Path) -> anyhow::Result<StationConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let config: StationConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid station configuration in '{}'", path.display()))?;

    Ok(config)
}
