//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `MenuClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; an `HttpTransport` implementation performs
//! the actual round-trip. Retrieval code only ever sees the trait, so tests
//! can swap in a stub that counts or fails calls.
//!
//! Only GET is ever issued against the menus API, so requests carry no method
//! or body.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A GET request described as plain data.
///
/// Built by `MenuClient::build_*` methods. The transport is responsible for
/// executing it and returning the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Bounds this one call only. `None` means no timeout.
    pub timeout: Option<Duration>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete a round-trip at all (DNS, connect, timeout, I/O).
///
/// Non-2xx statuses are not transport errors; they come back as an
/// `HttpResponse` and are classified by the client.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The HTTP collaborator used by every retrieval operation.
///
/// Implementations are shared between concurrently running fan-out tasks,
/// hence `Send + Sync + 'static`. Retry policy, if any, belongs here.
pub trait HttpTransport: Send + Sync + 'static {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
