//! Process Configuration Module
//!
//! All runtime wiring — server address, corpus path, FHIR base URL, session
//! secret — is resolved exactly once at startup and immutable thereafter.
//! In particular the FHIR base address is no longer lazily memoized at
//! first use: it is part of this config, resolved before the first request.
//!
//! ## Loading Order
//!
//! 1. `OBS_CONFIG` environment variable (path to TOML file)
//! 2. `obstetric.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Env overrides (`OBS_FHIR_BASE_URL`, `OBS_AUTH_SECRET`, `OBS_CORPUS_PATH`)
//! apply on top of whichever file was loaded.
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(AppConfig::load(None));
//!
//! // Anywhere in the codebase:
//! let base = &config::get().fhir.base_url;
//! ```

mod app_config;

pub use app_config::*;

use std::sync::OnceLock;

/// Global application configuration, initialized once at startup.
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: AppConfig) {
    if APP_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called — a missing config is a startup
/// bug, not a recoverable condition.
pub fn get() -> &'static AppConfig {
    APP_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    APP_CONFIG.get().is_some()
}
