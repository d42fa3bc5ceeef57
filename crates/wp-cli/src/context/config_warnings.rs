use wp_config::WaypointConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &WaypointConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &WaypointConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.ai.is_configured() && has_env_prefix(&env_keys, "WAYPOINT_AI") {
        warnings.push(
            "AI config appears default while WAYPOINT_AI* env vars exist. Use double underscores (example: WAYPOINT_AI__API_KEY)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "WAYPOINT_NOTIFY") {
        warnings.push(
            "WAYPOINT_NOTIFY_* env vars use a single underscore and are ignored. Use double underscores (example: WAYPOINT_NOTIFY__OUTBOX_DIR)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&format!("{prefix}__")))
}
