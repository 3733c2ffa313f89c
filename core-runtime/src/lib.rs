//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the sync crates:
//! - Logging and tracing setup
//! - Sync settings and API credentials
//!
//! Nothing here talks to the remote platform; the settings are handed to the
//! provider and orchestrator by whoever assembles the application.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ApiCredentials, FailureMode, SyncSettings, SyncSettingsBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
