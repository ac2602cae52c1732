//! FHIR Client — HTTP client for the external clinical-records service.
//!
//! The base address is resolved once from process configuration at
//! construction and never re-resolved. Consumed by the dossier endpoints of
//! the wider system; the retrieval core has no dependency on it.

use std::time::Duration;

use serde_json::Value;

/// FHIR client errors.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("FHIR server returned status {0}")]
    Status(reqwest::StatusCode),
}

/// HTTP client for the clinical-records (FHIR) service.
#[derive(Debug, Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    /// Create a client against an explicit base address.
    pub fn new(base_url: &str) -> Result<Self, FhirError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against the configured base address.
    pub fn from_config() -> Result<Self, FhirError> {
        Self::new(&crate::config::get().fhir.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch a single resource, e.g. `Patient/123`.
    pub async fn get(&self, path: &str) -> Result<Value, FhirError> {
        let resp = self
            .http
            .get(self.resource_url(path))
            .header(reqwest::header::ACCEPT, "application/fhir+json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FhirError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// Search a resource type, returning the bundle, e.g.
    /// `search("Observation", &[("patient", "123"), ("code", "8480-6")])`.
    pub async fn search(
        &self,
        resource_type: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, FhirError> {
        let resp = self
            .http
            .get(self.resource_url(resource_type))
            .query(params)
            .header(reqwest::header::ACCEPT, "application/fhir+json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FhirError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }
}
