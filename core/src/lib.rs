//! Client core for the university dining menus API.
//!
//! # Overview
//! Fetches per-location, per-day menu JSON, normalizes the upstream shapes
//! into one domain model, and retrieves date ranges or every location at once
//! with a bounded number of requests in flight.
//!
//! # Design
//! - `MenuClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values (host-does-IO pattern).
//! - `HttpTransport` is the only seam that touches the network; `UreqTransport`
//!   is the default, tests substitute stubs.
//! - `DiningClient` owns the immutable `Config` (concurrency limit plus the
//!   location registry fetched at construction) and runs the retrievals.
//! - Raw upstream DTOs live in `payload` and never leak past the mapper.

pub mod client;
pub mod dining;
pub mod error;
pub mod http;
pub mod payload;
pub mod registry;
pub mod settings;
pub mod transport;
pub mod types;

pub use client::{MenuClient, DEFAULT_BASE_URL};
pub use dining::DiningClient;
pub use error::{DiningError, ErrorKind};
pub use http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use registry::{Config, LocationRegistry};
pub use settings::Settings;
pub use transport::UreqTransport;
pub use types::{DiningInfo, Item, Meal, MealStatus, Station};
