//! # HTTP Bridge
//!
//! `reqwest`-backed implementation of [`HttpClient`](bridge_traits::HttpClient).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_http::ReqwestHttpClient;
//! use std::time::Duration;
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
