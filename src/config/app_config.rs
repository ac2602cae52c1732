//! Application configuration — TOML sections with serde defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/knowledge-chunks.json")
}

fn default_fhir_base_url() -> String {
    "http://localhost:8080/fhir".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

/// Knowledge corpus location (the ingestion pipeline's JSON output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

/// Clinical-records service (FHIR) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    #[serde(default = "default_fhir_base_url")]
    pub base_url: String,
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_fhir_base_url(),
        }
    }
}

/// Session verification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. Must be at least 32 bytes to be
    /// trustworthy; set via `OBS_AUTH_SECRET` in deployments.
    #[serde(default)]
    pub secret: String,
}

/// Root configuration for a deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub fhir: FhirConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order, then apply env
    /// overrides. `explicit` (from `--config`) wins over the search order.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut config = Self::resolve_file(explicit);
        config.apply_env_overrides();
        config
    }

    fn resolve_file(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            match Self::load_from_file(path) {
                Ok(config) => {
                    info!(path = %path.display(), "Loaded config from --config");
                    return config;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load --config file, falling back");
                }
            }
        }

        if let Ok(path) = std::env::var("OBS_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from OBS_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from OBS_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "OBS_CONFIG points to non-existent file, falling back");
            }
        }

        let local = Path::new("obstetric.toml");
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!("Loaded config from ./obstetric.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./obstetric.toml, using defaults");
                }
            }
        }

        info!("Using built-in default configuration");
        Self::default()
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("OBS_FHIR_BASE_URL") {
            self.fhir.base_url = v;
        }
        if let Ok(v) = std::env::var("OBS_AUTH_SECRET") {
            self.auth.secret = v;
        }
        if let Ok(v) = std::env::var("OBS_CORPUS_PATH") {
            self.corpus.path = PathBuf::from(v);
        }
    }

    /// Log configuration problems that are survivable but degrade service.
    pub fn validate(&self) {
        if self.auth.secret.len() < 32 {
            warn!(
                "auth secret is unset or shorter than 32 bytes — session cookies cannot be trusted"
            );
        }
    }
}
