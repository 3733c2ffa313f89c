//! # Glean Provider
//!
//! Implements the `CollectionsApi` contract over Glean's client REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Search with facet filters (single page, up to 1000 results)
//! - Collection creation with name-collision detection
//! - Collection listing and membership reads
//! - Per-document item additions and removals
//!
//! Every request is a JSON `POST` carrying a bearer token and the
//! on-behalf-of user header. Collection mutations are never retried.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GleanConnector;
pub use error::{GleanError, Result};
