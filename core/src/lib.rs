//! Blocking client for the remote translation service.
//!
//! # Overview
//! Fetches single translations or whole stores, and creates, updates or
//! deletes user-editable translations, over the service's REST API.
//!
//! # Design
//! - `TranslationApi` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` interprets an `HttpResponse`. All envelope and sub-code rules
//!   live there and are testable without a network.
//! - `TranslationClient` owns one `Transport` (by default a reusable
//!   `ureq::Agent`) and runs build → execute → parse.
//! - `Config` is passed in explicitly; `Config::from_env` is the only place
//!   that reads process environment.
//! - An unreadable body is `Lookup::Unparsable`, not an error, so callers can
//!   tell it apart from the service saying "not found".

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::TranslationApi;
pub use client::TranslationClient;
pub use config::{Config, UnmappedCodePolicy, UpdateRoute};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use transport::UreqTransport;
pub use types::{Lookup, Source, TranslationRequest, DEFAULT_LANGUAGE};
