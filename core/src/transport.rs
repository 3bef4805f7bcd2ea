//! Default `HttpTransport` backed by ureq.
//!
//! ureq is blocking, so each call runs on tokio's blocking pool. The agent is
//! configured to hand back 4xx/5xx responses as data rather than `Err`,
//! leaving status interpretation to `MenuClient`.

use tracing::debug;
use ureq::Agent;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || call(&agent, request))
            .await
            .map_err(|e| TransportError::new(format!("transport task failed: {e}")))?
    }
}

fn call(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = agent.get(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = request.timeout {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }

    let mut response = builder
        .call()
        .map_err(|e| TransportError::new(format!("GET {}: {e}", request.url)))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::new(format!("reading body of {}: {e}", request.url)))?;

    debug!(url = %request.url, status, bytes = body.len(), "GET completed");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
