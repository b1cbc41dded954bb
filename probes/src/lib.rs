//! HTTP probes for pacebench
//!
//! [`HttpProbe`] is the [`pacebench_core::Probe`] behind `pacebench run`:
//! a [`RequestTemplate`] replayed on a pooled `reqwest` client.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod http;
mod request;

pub use client::{HttpClientPool, HttpConfig};
pub use http::HttpProbe;
pub use request::{normalize_url, parse_header, RequestTemplate};
