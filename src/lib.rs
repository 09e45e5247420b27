//! Class-chain construction engine for legacy prototype-based object frameworks.
//!

pub use lineage_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use lineage_internal::prelude::*;
}
