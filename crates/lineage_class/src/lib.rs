//! Class wrapping and deferred construction for Lineage (Layer 2).
//!
//! `lineage_class` lets a hierarchy of classes drive a legacy,
//! prototype-style object framework that expects to construct and
//! initialize objects itself:
//!
//! - [`registry`] - Class descriptors and the arena that owns them
//! - [`config`] - Per-class options and configuration records
//! - [`mixin`] - Mixin sources and the `#[derive(Mixin)]` macro
//! - [`merge`] - Attribute auto-merging between a class and its parent
//! - [`base`] - Base wrapper factory and legacy `extend`
//! - [`wrap`] - Subclass wrapper factory
//! - [`construct`] - Deferred construction protocol
//! - [`error`] - Error taxonomy
//!
//! # Architecture
//!
//! - **Layer 1** (`lineage_object`): object model
//! - **Layer 2** (`lineage_class`): class registry, wrapper factories and
//!   the construction protocol (this crate)
//!
//! # Example
//!
//! ```
//! use lineage_class::prelude::*;
//! use serde_json::json;
//!
//! let mut registry = ClassRegistry::new();
//!
//! // A legacy record type with a static `defaults` map.
//! let legacy = registry
//!     .define(
//!         ClassDef::new("LegacyRecord")
//!             .legacy(Function::noop())
//!             .with_static("defaults", json!({"active": true})),
//!     )
//!     .unwrap();
//! let record = registry
//!     .wrap_as_base(
//!         legacy,
//!         ClassConfig::new()
//!             .with_name("Record")
//!             .with_automerge_attrs(["defaults"])
//!             .with_prototype_attrs(["defaults"]),
//!     )
//!     .unwrap();
//!
//! // A subclass adds its own defaults; the parent's are merged in.
//! let body = registry
//!     .define(
//!         ClassDef::new("User")
//!             .extends(record)
//!             .with_static("defaults", json!({"role": "guest"})),
//!     )
//!     .unwrap();
//! let user = registry.wrap(body).unwrap();
//!
//! assert_eq!(
//!     registry.static_value(user, "defaults"),
//!     Some(json!({"role": "guest", "active": true}))
//! );
//! let instance = registry.construct(user, &[]).unwrap();
//! assert_eq!(instance.class_id(), user);
//! ```

// Self-reference so `#[derive(Mixin)]` output can use `lineage_class::` paths
// within this crate.
extern crate self as lineage_class;

/// Base wrapper factory.
pub mod base;

/// Class options and configuration records.
pub mod config;

/// Deferred construction protocol.
pub mod construct;

/// Error types.
pub mod error;

/// Attribute auto-merging.
pub mod merge;

/// Mixin sources.
pub mod mixin;

/// Subclass preparation.
mod prepare;

/// Class descriptors.
pub mod registry;

/// Subclass wrapper factory.
pub mod wrap;

pub use config::{ClassConfig, SkipParent};
pub use error::ClassError;
pub use merge::{MergeOutcome, defaults_union};
pub use mixin::{Mixin, MixinSource};
pub use registry::{ClassDef, ClassInfo, ClassRegistry, ClassRole};
pub use wrap::Wrapper;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::to_value;
}

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{ClassConfig, SkipParent};
    pub use crate::error::ClassError;
    pub use crate::merge::{MergeOutcome, defaults_union};
    pub use crate::mixin::{Mixin, MixinSource};
    pub use crate::registry::{ClassDef, ClassInfo, ClassRegistry, ClassRole};
    pub use crate::wrap::Wrapper;
    pub use lineage_object::prelude::*;
}
