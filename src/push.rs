//! A minimal blocking client for the Prometheus Pushgateway.
//! The API is described here: <https://github.com/prometheus/pushgateway#api>
use reqwest::{
    blocking::Client,
    header::CONTENT_TYPE,
    StatusCode,
};
use tracing::{
    debug,
    warn,
};

/// The Pushgateway address used when none is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9091";

/// The possible failures of a push.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum PushError {
    /// The client could not be built, the request could not be sent, or no response was
    /// received
    #[display(fmt = "error sending request to Pushgateway: {_0}")]
    Network(reqwest::Error),
    /// The gateway answered with a non success status
    #[display(fmt = "failed to push to Pushgateway: {status}: {body}")]
    #[from(ignore)]
    Rejected { status: StatusCode, body: String },
}

impl std::error::Error for PushError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            Self::Rejected { .. } => None,
        }
    }
}

/// Pushes exposition text to a single Pushgateway.
#[derive(Debug, Clone)]
pub struct Pushgateway {
    base_url: String,
    client: Client,
}

impl Pushgateway {
    /// Fails when the HTTP client (its TLS backend) cannot be set up.
    pub fn new(base_url: &str) -> Result<Self, PushError> {
        let client = Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// The grouping URL of `job`.
    ///
    /// `job` is used verbatim as a path segment, it is not escaped. A job holding `/`, `?`
    /// or `#` ends up under another grouping key than intended.
    pub fn job_url(&self, job: &str) -> String {
        format!("{}/metrics/job/{job}", self.base_url)
    }

    /// POST `payload` under `job`. Metrics with the same name in the group are replaced,
    /// the rest of the group is kept.
    pub fn push(&self, job: &str, payload: &str) -> Result<(), PushError> {
        let url = self.job_url(job);
        debug!(%url, "Pushing metrics");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(payload.to_owned())
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        warn!(%status, "Pushgateway rejected the push");
        Err(PushError::Rejected { status, body })
    }
}
