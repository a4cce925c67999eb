//! Registration endpoint client.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::EndpointError;
use crate::record::VisitorRecord;

/// Path appended to the base URL when none is configured.
pub const DEFAULT_REGISTRATION_PATH: &str = "/api/visitors/register";

/// Request timeout used by [`HttpEndpoint::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body the endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Something that accepts visitor registrations.
pub trait RegistrationEndpoint: Send + Sync + 'static {
    fn register(
        &self,
        record: &VisitorRecord,
    ) -> impl Future<Output = Result<RegistrationReply, EndpointError>> + Send;
}

/// JSON-over-HTTP endpoint: `POST <base_url><path>` with the record as body.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(base_url: &str) -> Result<Self, EndpointError> {
        Self::with_options(base_url, DEFAULT_REGISTRATION_PATH, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        base_url: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<Self, EndpointError> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let url = Url::parse(&raw).map_err(|e| EndpointError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EndpointError::Http)?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl RegistrationEndpoint for HttpEndpoint {
    #[instrument(skip(self, record), fields(url = %self.url))]
    async fn register(&self, record: &VisitorRecord) -> Result<RegistrationReply, EndpointError> {
        let response = self.client.post(self.url.clone()).json(record).send().await?;

        let status = response.status();
        debug!(%status, "registration endpoint answered");
        if !status.is_success() {
            return Err(EndpointError::Status(status));
        }

        Ok(response.json::<RegistrationReply>().await?)
    }
}
