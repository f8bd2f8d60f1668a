//! Default `Transport` backed by a reusable `ureq::Agent`.
//!
//! The agent is built with `http_status_as_error(false)` so 4xx/5xx responses
//! come back as data for the envelope protocol to interpret. Only failures
//! that produce no response at all surface as `TransportError`.

use tracing::debug;
use ureq::typestate::WithoutBody;
use ureq::RequestBuilder;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an agent the caller configured. It should not treat HTTP status
    /// codes as errors.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn send(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let url = request.path.as_str();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();
        let headers = &request.headers;

        match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), headers).send(body),
            HttpMethod::Patch => with_headers(self.agent.patch(url), headers).send(body),
            HttpMethod::Delete => send_delete(with_headers(self.agent.delete(url), headers), request),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");

        let mut response = self
            .send(request)
            .map_err(|e| TransportError(e.to_string()))?;

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
            .map_err(|e| TransportError(e.to_string()))?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// DELETE carries a form body on this service, which ureq only sends when
/// asked to explicitly.
fn send_delete(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match &request.body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://{addr}/v1/translate"),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(err.to_string().starts_with("transport error:"));
    }
}
