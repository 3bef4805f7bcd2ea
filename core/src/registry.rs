//! Valid location names and the immutable client configuration.
//!
//! # Design
//! The registry is late-bound: it is fetched from upstream once when a
//! `Config` is built, because the set of locations changes over time. Names
//! are kept exactly as upstream returned them and matched case-sensitively.

use std::num::NonZeroUsize;

use tracing::info;

use crate::client::MenuClient;
use crate::error::DiningError;
use crate::http::HttpTransport;

/// Ordered set of location names recognised by upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRegistry {
    names: Vec<String>,
}

impl LocationRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-sensitive exact membership.
    pub fn contains(&self, location: &str) -> bool {
        self.names.iter().any(|name| name == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Concurrency limit plus the resolved location registry.
///
/// Immutable once built and safe to share between tasks. An empty registry
/// is representable but every retrieval operation rejects it.
#[derive(Debug, Clone)]
pub struct Config {
    concurrent: NonZeroUsize,
    registry: LocationRegistry,
}

impl Config {
    pub fn new(concurrent: usize, registry: LocationRegistry) -> Result<Self, DiningError> {
        let concurrent = NonZeroUsize::new(concurrent).ok_or(DiningError::InvalidConcurrency)?;
        Ok(Self {
            concurrent,
            registry,
        })
    }

    /// Query upstream for the location list and build a `Config` from it.
    ///
    /// Performs exactly one network call.
    pub async fn fetch<T: HttpTransport>(
        client: &MenuClient,
        transport: &T,
        concurrent: usize,
    ) -> Result<Self, DiningError> {
        let concurrent = NonZeroUsize::new(concurrent).ok_or(DiningError::InvalidConcurrency)?;
        let response = transport.execute(client.build_locations()).await?;
        let registry = client.parse_locations(response)?;
        info!(locations = registry.len(), concurrent, "location registry fetched");
        Ok(Self {
            concurrent,
            registry,
        })
    }

    pub fn concurrent(&self) -> usize {
        self.concurrent.get()
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    /// Reject an empty registry.
    pub fn ensure_initialized(&self) -> Result<(), DiningError> {
        if self.registry.is_empty() {
            return Err(DiningError::UninitializedConfig);
        }
        Ok(())
    }

    /// Check that `location` is usable, without touching the network.
    pub fn validate_location(&self, location: &str) -> Result<(), DiningError> {
        self.ensure_initialized()?;
        if !self.registry.contains(location) {
            return Err(DiningError::InvalidLocation(location.to_string()));
        }
        Ok(())
    }
}
