//! Error types for class definition and construction.

use lineage_object::ClassId;

/// Errors raised by the registry, the wrapper factories and construction.
///
/// Every variant except [`InvalidConfig`](Self::InvalidConfig) and
/// [`CapacityExceeded`](Self::CapacityExceeded) is an integration mistake
/// rather than a steady-state failure; none of them leave
/// a partially constructed object behind.
#[derive(Debug, thiserror::Error)]
pub enum ClassError {
    /// A base wrapper was constructed directly instead of through a
    /// subclass wrapper.
    #[error("cannot instantiate abstract base class `{class}`; wrap a subclass and construct that")]
    AbstractInstantiation {
        /// Name of the base wrapper.
        class: String,
    },

    /// The class being constructed extends a wrapper but was never wrapped
    /// itself.
    #[error("class `{class}` was never wrapped; pass it through the subclass wrapper before constructing it")]
    UninitializedSubclass {
        /// Name of the unwrapped class.
        class: String,
    },

    /// The class does not descend from a base wrapper.
    #[error("class `{class}` does not descend from a wrapped base class")]
    MissingBase {
        /// Name of the offending class.
        class: String,
    },

    /// The handle was not issued by this registry.
    #[error("unknown class: {0}")]
    UnknownClass(ClassId),

    /// The registry already holds as many classes as a [`ClassId`] can
    /// address.
    #[error("class registry is full ({0} classes)")]
    CapacityExceeded(usize),

    /// Class options could not be parsed.
    #[error("invalid class options: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl ClassError {
    /// Creates an [`AbstractInstantiation`](Self::AbstractInstantiation).
    pub fn abstract_instantiation(class: impl Into<String>) -> Self {
        Self::AbstractInstantiation {
            class: class.into(),
        }
    }

    /// Creates an [`UninitializedSubclass`](Self::UninitializedSubclass).
    pub fn uninitialized_subclass(class: impl Into<String>) -> Self {
        Self::UninitializedSubclass {
            class: class.into(),
        }
    }

    /// Creates a [`MissingBase`](Self::MissingBase).
    pub fn missing_base(class: impl Into<String>) -> Self {
        Self::MissingBase {
            class: class.into(),
        }
    }
}
