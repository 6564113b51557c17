//! Executing an `HttpRequest` over the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. It must hand back every status
//! code as data: deciding what a 400 or 403 means is `parse_response`'s job.
//! `UreqTransport` is the blocking default; tests substitute their own.

use std::time::Duration;

use ureq::Agent;

use crate::error::RootError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, RootError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, RootError> {
        (**self).execute(base_url, request)
    }
}

/// Blocking transport on a shared `ureq::Agent`.
///
/// No global timeout is set unless `with_timeout` is used; ureq's own
/// defaults apply otherwise.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
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

impl Transport for UreqTransport {
    fn execute(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, RootError> {
        let url = request.url(base_url);
        let body = request.body.as_deref().unwrap_or_default();

        let result = match request.method {
            HttpMethod::Get => decorate(self.agent.get(&url), request).call(),
            HttpMethod::Post => decorate(self.agent.post(&url), request).send(body.as_bytes()),
            HttpMethod::Put => decorate(self.agent.put(&url), request).send(body.as_bytes()),
            HttpMethod::Patch => decorate(self.agent.patch(&url), request).send(body.as_bytes()),
        };
        let mut response = result.map_err(|e| RootError::Transport(e.to_string()))?;

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
            .map_err(|e| RootError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
