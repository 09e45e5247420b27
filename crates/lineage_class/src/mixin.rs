//! Mixin sources and the applicator.
//!
//! A mixin copies members onto a target class when the class is prepared.
//! Sources come in three shapes:
//!
//! - [`MixinSource::Object`] - a plain member table, copied onto the target's
//!   instance-facing surface
//! - [`MixinSource::Class`] - a registered class; its own instance-facing
//!   members go onto the target's instance-facing surface and its own static
//!   members onto the target's static surface
//! - [`MixinSource::Capability`] - a named capability struct implementing
//!   [`Mixin`], copied like a class
//!
//! Sources are applied in list order and the last writer wins: a later mixin
//! overwrites members of earlier mixins and members the target declared
//! itself. Identity tokens are never copied.
//!
//! # Derive Macro
//!
//! `#[derive(Mixin)]` implements [`Mixin`] for a struct whose fields become
//! data members:
//!
//! ```
//! use lineage_class::mixin::{Mixin, Members};
//!
//! #[derive(Mixin)]
//! #[mixin(name = "Timestamps")]
//! struct Timestamps {
//!     created_at: u64,
//!     #[mixin(rename = "touch_interval")]
//!     interval: u32,
//!     #[mixin(static_member)]
//!     schema: String,
//!     #[mixin(skip)]
//!     _scratch: Vec<u8>,
//! }
//!
//! let mixin = Timestamps { created_at: 0, interval: 30, schema: "v1".into(), _scratch: vec![] };
//! assert_eq!(mixin.mixin_name(), "Timestamps");
//! assert!(mixin.instance_members().contains_key("touch_interval"));
//! assert!(mixin.static_members().contains_key("schema"));
//! ```

use crate::error::ClassError;
use crate::registry::ClassRegistry;
use lineage_object::{ClassId, OBJECT_ID_KEY};
use std::sync::Arc;

pub use lineage_mixin_macros::Mixin;
pub use lineage_object::{Member, Members};

/// A named capability that can be mixed into classes.
///
/// Can be derived via `#[derive(Mixin)]`, or implemented by hand when the
/// capability contributes methods:
///
/// ```
/// use lineage_class::mixin::{Mixin, Members};
/// use lineage_object::{Function, Member};
/// use serde_json::json;
///
/// struct Greets;
///
/// impl Mixin for Greets {
///     fn mixin_name(&self) -> &str {
///         "Greets"
///     }
///
///     fn instance_members(&self) -> Members {
///         let mut members = Members::new();
///         members.insert(
///             "greet".into(),
///             Member::Function(Function::new(|_, _| json!("hello"))),
///         );
///         members
///     }
/// }
/// ```
pub trait Mixin: Send + Sync + 'static {
    /// Name used in logs and debug output.
    fn mixin_name(&self) -> &str;

    /// Members copied onto the target's instance-facing surface.
    fn instance_members(&self) -> Members;

    /// Members copied onto the target's static surface.
    fn static_members(&self) -> Members {
        Members::new()
    }
}

/// Something whose members can be copied onto a class.
#[derive(Clone)]
pub enum MixinSource {
    /// A plain member table.
    Object(Members),
    /// A registered class.
    Class(ClassId),
    /// A named capability.
    Capability(Arc<dyn Mixin>),
}

impl MixinSource {
    /// Wraps a capability.
    pub fn capability(mixin: impl Mixin) -> Self {
        Self::Capability(Arc::new(mixin))
    }
}

impl From<Members> for MixinSource {
    fn from(members: Members) -> Self {
        Self::Object(members)
    }
}

impl From<ClassId> for MixinSource {
    fn from(class: ClassId) -> Self {
        Self::Class(class)
    }
}

impl core::fmt::Debug for MixinSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Object(members) => f
                .debug_tuple("Object")
                .field(&members.keys().collect::<Vec<_>>())
                .finish(),
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Capability(mixin) => f
                .debug_tuple("Capability")
                .field(&mixin.mixin_name())
                .finish(),
        }
    }
}

/// Copies every source in `mixins` onto `target`, in order.
///
/// # Errors
///
/// Returns [`ClassError::UnknownClass`] if `target` or a class source is not
/// registered.
pub(crate) fn apply_mixins(
    registry: &ClassRegistry,
    target: ClassId,
    mixins: &[MixinSource],
) -> Result<(), ClassError> {
    let target_entry = registry.entry(target)?;
    for mixin in mixins {
        let (instance_members, static_members) = match mixin {
            MixinSource::Object(members) => (members.clone(), Members::new()),
            MixinSource::Class(source) => {
                let source = registry.entry(*source)?;
                (source.prototype.own_members(), source.statics.own_members())
            }
            MixinSource::Capability(capability) => {
                (capability.instance_members(), capability.static_members())
            }
        };
        tracing::trace!(
            target = %registry.display_name(target),
            mixin = ?mixin,
            "applying mixin"
        );
        target_entry.prototype.assign(without_identity(instance_members));
        target_entry.statics.assign(without_identity(static_members));
    }
    Ok(())
}

fn without_identity(mut members: Members) -> Members {
    members.shift_remove(OBJECT_ID_KEY);
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassDef;
    use lineage_object::{Function, members};
    use serde_json::json;

    #[test]
    fn object_mixin_only_touches_instance_surface() {
        let mut registry = ClassRegistry::new();
        let target = registry.define(ClassDef::new("Target")).unwrap();
        let source = MixinSource::from(members([("m", json!(1))]));

        apply_mixins(&registry, target, &[source]).unwrap();

        assert_eq!(registry.prototype(target).unwrap().get_value("m"), Some(json!(1)));
        assert!(registry.statics(target).unwrap().own_keys().is_empty());
    }

    #[test]
    fn class_mixin_copies_own_members_only() {
        let mut registry = ClassRegistry::new();
        let grand = registry
            .define(ClassDef::new("Grand").with_member("inherited", json!(0)))
            .unwrap();
        let source = registry
            .define(
                ClassDef::new("Source")
                    .extends(grand)
                    .with_member("method", Function::noop())
                    .with_static("count", json!(3))
                    .with_static(OBJECT_ID_KEY, json!(99)),
            )
            .unwrap();
        let target = registry.define(ClassDef::new("Target")).unwrap();

        apply_mixins(&registry, target, &[MixinSource::Class(source)]).unwrap();

        let prototype = registry.prototype(target).unwrap();
        let statics = registry.statics(target).unwrap();
        assert!(prototype.has_own("method"));
        assert!(!prototype.has("inherited"));
        assert_eq!(statics.get_value("count"), Some(json!(3)));
        assert!(!statics.has(OBJECT_ID_KEY));
    }

    #[test]
    fn later_mixins_win() {
        let mut registry = ClassRegistry::new();
        let target = registry
            .define(ClassDef::new("Target").with_member("shared", json!("own")))
            .unwrap();
        let first = MixinSource::from(members([("shared", json!("first")), ("a", json!(1))]));
        let second = MixinSource::from(members([("shared", json!("second"))]));

        apply_mixins(&registry, target, &[first, second]).unwrap();

        let prototype = registry.prototype(target).unwrap();
        assert_eq!(prototype.get_value("shared"), Some(json!("second")));
        assert_eq!(prototype.get_value("a"), Some(json!(1)));
    }

    #[test]
    fn unknown_class_source_fails() {
        let mut registry = ClassRegistry::new();
        let target = registry.define(ClassDef::new("Target")).unwrap();
        let err = apply_mixins(&registry, target, &[MixinSource::Class(ClassId::new(77))])
            .unwrap_err();
        assert!(matches!(err, ClassError::UnknownClass(_)));
    }
}
