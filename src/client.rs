//! HTTP client for the per-service JSON routes and artwork downloads.

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::{DashError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    config: Arc<Config>,
}

impl ServiceClient {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("media-dashboard/", env!("MDASH_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET a service route and decode its JSON body.
    ///
    /// A `null` or empty body decodes to `None`; loaders treat that as the
    /// "no data" case rather than an error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &str,
        route: &str,
    ) -> Result<Option<T>> {
        let url = self.config.service_url(service, route)?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| DashError::decode(e, trimmed))
    }

    /// Download raw bytes, with the service's credentials and extra headers
    /// when it has any configured.
    pub async fn get_bytes(&self, url: &Url, service: Option<&str>) -> Result<Vec<u8>> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        if let Some(svc) = service.and_then(|s| self.config.service(s)) {
            if let (Some(user), Some(pass)) = (&svc.username, &svc.password) {
                let token = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", user, pass));
                if let Ok(value) = HeaderValue::from_str(&format!("Basic {}", token)) {
                    headers.insert(AUTHORIZATION, value);
                }
            }
            for (name, value) in &svc.headers {
                match (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    (Ok(name), Ok(value)) => {
                        headers.insert(name, value);
                    }
                    _ => tracing::warn!("Skipping invalid header {} for {:?}", name, service),
                }
            }
        }

        let response = self.http.get(url.clone()).headers(headers).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
