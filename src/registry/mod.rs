//! Package-registry lookups for dependency licenses and documentation URLs.

pub mod maven;
pub mod npm;
pub mod nuget;
pub mod pypi;

use crate::domain::model::{Ecosystem, RegistryEndpoints};
use crate::utils::error::{AuditError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

const REQUEST_TIMEOUT_SECS: u64 = 15;
/// Small delay before every request so bulk runs stay polite to the public APIs.
const COURTESY_DELAY_MS: u64 = 100;

pub struct RegistryClient {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    endpoints: RegistryEndpoints,
}

impl RegistryClient {
    pub fn new(endpoints: RegistryEndpoints, max_in_flight: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("repo-audit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &RegistryEndpoints {
        &self.endpoints
    }

    /// Resolve (license, documentation URL) for one dependency. Lookups never
    /// fail the pipeline: a missing or undecodable answer resolves to
    /// "Unknown", a transport-level failure to "Lookup Failed".
    pub async fn lookup(&self, ecosystem: Ecosystem, name: &str) -> (String, String) {
        let result = match ecosystem {
            Ecosystem::Python => pypi::lookup(self, name).await,
            Ecosystem::JavaScript => npm::lookup(self, name).await,
            Ecosystem::Java => maven::lookup(self, name).await,
            Ecosystem::DotNet => nuget::lookup(self, name).await,
        };
        match result {
            Ok(Some((license, url))) => (license, url),
            Ok(None) => ("Unknown".to_string(), String::new()),
            Err(e) => {
                tracing::warn!("Registry lookup failed for {} ({}): {}", name, ecosystem, e);
                ("Lookup Failed".to_string(), String::new())
            }
        }
    }

    /// GET a JSON document. Non-2xx statuses and decode failures are logged
    /// and yield `None`; only transport errors bubble up.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let _permit =
            self.semaphore
                .acquire()
                .await
                .map_err(|_| AuditError::ProcessingError {
                    message: "registry request semaphore closed".to_string(),
                })?;
        tokio::time::sleep(Duration::from_millis(COURTESY_DELAY_MS)).await;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(
                "Registry request for {} returned status {}",
                url,
                response.status()
            );
            return Ok(None);
        }
        match response.json::<T>().await {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Could not decode response from {}: {}", url, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> RegistryClient {
        let endpoints = RegistryEndpoints {
            pypi: server.base_url(),
            npm: server.base_url(),
            maven: server.base_url(),
            nuget: server.base_url(),
        };
        RegistryClient::new(endpoints, 4).unwrap()
    }

    #[tokio::test]
    async fn test_non_success_status_resolves_to_unknown() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing-package");
            then.status(404);
        });

        let client = client_for(&server);
        let (license, url) = client.lookup(Ecosystem::JavaScript, "missing-package").await;

        mock.assert();
        assert_eq!(license, "Unknown");
        assert!(url.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_resolves_to_lookup_failed() {
        // Nothing listens on this port.
        let endpoints = RegistryEndpoints {
            pypi: "http://127.0.0.1:1".to_string(),
            npm: "http://127.0.0.1:1".to_string(),
            maven: "http://127.0.0.1:1".to_string(),
            nuget: "http://127.0.0.1:1".to_string(),
        };
        let client = RegistryClient::new(endpoints, 2).unwrap();

        let (license, url) = client.lookup(Ecosystem::Python, "requests").await;
        assert_eq!(license, "Lookup Failed");
        assert!(url.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_body_resolves_to_unknown() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/weird");
            then.status(200).body("<html>not json</html>");
        });

        let client = client_for(&server);
        let (license, _) = client.lookup(Ecosystem::JavaScript, "weird").await;
        assert_eq!(license, "Unknown");
    }
}
