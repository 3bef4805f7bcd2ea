//! Stateless HTTP request builder and response parser for the menus API.
//!
//! # Design
//! `MenuClient` holds only the base URL and an optional per-request timeout.
//! Each upstream call is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Dates become strings here and nowhere else.

use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use crate::error::DiningError;
use crate::http::{HttpRequest, HttpResponse};
use crate::payload::{map_day, RawDay, RawLocations};
use crate::registry::LocationRegistry;
use crate::types::DiningInfo;

/// Public menus API root.
pub const DEFAULT_BASE_URL: &str = "https://api.hfs.purdue.edu/menus/v2";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct MenuClient {
    base_url: Url,
    timeout: Option<Duration>,
}

impl MenuClient {
    pub fn new(base_url: &str) -> Result<Self, DiningError> {
        let invalid = |reason: String| DiningError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("url cannot carry path segments".to_string()));
        }
        Ok(Self {
            base_url: parsed,
            timeout: None,
        })
    }

    /// Attach `timeout` to every request built from now on.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_locations(&self) -> HttpRequest {
        self.get(&["locations"])
    }

    pub fn build_day(&self, location: &str, date: NaiveDate) -> HttpRequest {
        let date = date.format(DATE_FORMAT).to_string();
        self.get(&[location, &date])
    }

    pub fn parse_locations(&self, response: HttpResponse) -> Result<LocationRegistry, DiningError> {
        check_status(&response)?;
        let raw: RawLocations = serde_json::from_str(&response.body)?;
        Ok(LocationRegistry::new(
            raw.locations.into_iter().map(|location| location.name),
        ))
    }

    /// Parse one day's payload. `location` is the name that was requested and
    /// is only used to report an upstream rejection.
    pub fn parse_day(
        &self,
        response: HttpResponse,
        location: &str,
        date: NaiveDate,
    ) -> Result<DiningInfo, DiningError> {
        check_status(&response)?;
        let raw: RawDay = serde_json::from_str(&response.body)?;
        if raw.location.is_empty() {
            return Err(DiningError::UnknownLocation(location.to_string()));
        }
        Ok(map_day(&raw, date))
    }

    /// Segments are percent-encoded individually, so names with spaces or
    /// slashes stay a single segment.
    fn get(&self, segments: &[&str]) -> HttpRequest {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            timeout: self.timeout,
        }
    }
}

/// Any status outside 2xx is a request failure.
fn check_status(response: &HttpResponse) -> Result<(), DiningError> {
    if response.is_success() {
        return Ok(());
    }
    Err(DiningError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
