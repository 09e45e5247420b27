//! # Lineage Internal Library
//!
//! Re-exports the core Lineage crates for convenience.

/// Layer 1: dynamic object model (surfaces, members, instances).
pub use lineage_object;

/// Layer 2: class registry, wrapper factories and construction protocol.
pub use lineage_class;

/// Ambient infrastructure (tracing setup).
pub use lineage_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use lineage_class::prelude::*;
    pub use lineage_core::{TracingConfig, TracingFormat};
    pub use lineage_object::prelude::*;
}
