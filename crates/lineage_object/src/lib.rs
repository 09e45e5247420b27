//! The dynamic object model for Lineage (Layer 1).
//!
//! `lineage_object` provides the primitives classes and instances are made of:
//!
//! - [`id`] - Class handles and wrapper identity tokens
//! - [`function`] - Shared callables invoked with a receiver
//! - [`member`] - Data and function members, member tables
//! - [`surface`] - Shared member tables with prototype-style inheritance
//! - [`instance`] - Constructed objects
//!
//! # Architecture
//!
//! - **Layer 1** (`lineage_object`): object model (this crate)
//! - **Layer 2** (`lineage_class`): class registry, wrapper factories and
//!   the construction protocol
//!
//! # Example
//!
//! ```
//! use lineage_object::prelude::*;
//! use serde_json::json;
//!
//! let prototype = Surface::root();
//! prototype.set("kind", json!("record"));
//!
//! let instance = Instance::new(ClassId::new(0), Surface::derive(&prototype));
//! assert_eq!(instance.get_value("kind"), Some(json!("record")));
//! ```

/// Shared callables.
pub mod function;

/// Class handles and identity tokens.
pub mod id;

/// Constructed objects.
pub mod instance;

/// Members and member tables.
pub mod member;

/// Shared member tables.
pub mod surface;

pub use function::Function;
pub use id::{ClassId, ObjectId};
pub use instance::Instance;
pub use member::{INIT_OBJECT_KEY, Map, Member, Members, OBJECT_ID_KEY, Value, members};
pub use surface::Surface;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::function::*;
    pub use crate::id::*;
    pub use crate::instance::*;
    pub use crate::member::*;
    pub use crate::surface::*;
}
