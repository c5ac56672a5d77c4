use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from "config.toml" in the current directory,
/// overlaid with `PV__*` environment variables.
///
/// # Examples
/// ```no_run
/// use properview::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()));
}

/// Initialize the global configuration from an explicit file path
///
/// Used by the CLI `--config` flag. Has no effect if the configuration
/// was already initialized.
pub fn init_config_from(path: &str) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load_from(path)));
}
