use std::path::Path;

use anyhow::Context;
use wp_config::WaypointConfig;

/// Load `.env` from the project root (or the usual dotenv search) and then
/// the layered configuration.
pub fn load_config(project_root: &Path) -> anyhow::Result<WaypointConfig> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    } else {
        dotenvy::dotenv().ok();
    }

    WaypointConfig::load().context("failed to load waypoint configuration")
}
