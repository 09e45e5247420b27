//! Ambient infrastructure for Lineage.
//!
//! The engine crates only emit events through the [`tracing`] facade. This
//! crate installs a subscriber for binaries and tests that want to see them:
//!
//! - [`TracingConfig`] - Subscriber configuration and installation
//! - [`TracingFormat`] - Output format
//! - [`TracingInitError`] - Installation failures
//!
//! # Example
//!
//! ```
//! use lineage_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("lineage_class=trace")
//!     .init_or_ignore();
//! ```

mod subscriber;

pub use subscriber::{TracingConfig, TracingFormat, TracingInitError};
