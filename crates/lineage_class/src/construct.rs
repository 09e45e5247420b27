//! Deferred construction.
//!
//! Constructing a wrapped class walks the class chain twice. The first,
//! externally-invoked wrapper re-enters its own chain in sentinel mode; every
//! class above forwards the call unchanged until the base wrapper allocates a
//! bare instance for the requested class. On the way back nothing runs, and
//! only then does the requested wrapper call `init_object` exactly once with
//! the caller's arguments.
//!
//! ```text
//! construct(Leaf) ─▶ Leaf ──sentinel──▶ Body ─▶ Mid ─▶ ... ─▶ Base
//!                                                              │ allocate
//!       init_object(args) ◀── Leaf ◀──────── unwind (no-op) ◀──┘
//! ```
//!
//! Direct construction of a base wrapper fails with
//! [`ClassError::AbstractInstantiation`]. Constructing a class that extends a
//! wrapper without being wrapped itself fails with
//! [`ClassError::UninitializedSubclass`]. Neither failure leaves an instance
//! behind.

use crate::error::ClassError;
use crate::registry::{ClassKind, ClassRegistry};
use lineage_object::{ClassId, INIT_OBJECT_KEY, Instance, Member, Value};

/// How a class in the chain is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// User-facing construction.
    External,
    /// Engine-internal re-entry; never observable outside this module.
    Sentinel,
}

impl ClassRegistry {
    /// Constructs an instance of `class`, passing `args` to its
    /// initialization hook.
    ///
    /// Classes defined outside the engine with no base wrapper above them are
    /// allocated directly and their legacy constructors run root-to-leaf.
    ///
    /// # Errors
    ///
    /// - [`ClassError::AbstractInstantiation`] if `class` is a base wrapper
    /// - [`ClassError::UninitializedSubclass`] if `class` extends a wrapper
    ///   but was never wrapped itself
    /// - [`ClassError::UnknownClass`] if `class` is not registered
    pub fn construct(&self, class: ClassId, args: &[Value]) -> Result<Instance, ClassError> {
        self.entry(class)?;
        self.invoke(class, class, args, Mode::External)
    }

    fn invoke(
        &self,
        current: ClassId,
        target: ClassId,
        args: &[Value],
        mode: Mode,
    ) -> Result<Instance, ClassError> {
        let entry = self.entry(current)?;
        tracing::trace!(
            class = %self.display_name(current),
            target = %self.display_name(target),
            ?mode,
            "construction step"
        );

        match (&entry.kind, mode) {
            (ClassKind::Base { object_id }, Mode::Sentinel) => {
                if self.object_id(target) == Some(*object_id) {
                    return Err(ClassError::uninitialized_subclass(
                        self.display_name(target),
                    ));
                }
                Ok(Instance::new(target, self.prototype(target)?))
            }
            (ClassKind::Base { .. }, Mode::External) => Err(ClassError::abstract_instantiation(
                self.display_name(current),
            )),

            (ClassKind::Wrapper { .. }, Mode::Sentinel) => {
                self.forward(entry.parent, current, target, args, mode)
            }
            (ClassKind::Wrapper { .. }, Mode::External) if current == target => {
                let mut instance = self.forward(entry.parent, current, target, args, Mode::Sentinel)?;
                match instance.get(INIT_OBJECT_KEY) {
                    Some(Member::Function(init_object)) => {
                        init_object.call(&mut instance, args);
                    }
                    _ => tracing::trace!(
                        class = %self.display_name(target),
                        "no init_object to call"
                    ),
                }
                Ok(instance)
            }
            (ClassKind::Wrapper { object_id, .. }, Mode::External) => {
                if self.object_id(target) == Some(*object_id) {
                    return Err(ClassError::uninitialized_subclass(
                        self.display_name(target),
                    ));
                }
                self.forward(entry.parent, current, target, args, mode)
            }

            (ClassKind::Existing { constructor }, _) => {
                let mut instance = match (entry.parent, mode) {
                    (Some(parent), _) => self.invoke(parent, target, args, mode)?,
                    (None, Mode::External) => Instance::new(target, self.prototype(target)?),
                    (None, Mode::Sentinel) => {
                        return Err(ClassError::missing_base(self.display_name(target)));
                    }
                };
                if mode == Mode::External
                    && let Some(constructor) = constructor
                {
                    constructor.call(&mut instance, args);
                }
                Ok(instance)
            }
        }
    }

    fn forward(
        &self,
        parent: Option<ClassId>,
        current: ClassId,
        target: ClassId,
        args: &[Value],
        mode: Mode,
    ) -> Result<Instance, ClassError> {
        match parent {
            Some(parent) => self.invoke(parent, target, args, mode),
            None => Err(ClassError::missing_base(self.display_name(current))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::json;

    #[test]
    fn plain_existing_chain_runs_legacy_constructors_root_to_leaf() {
        let mut registry = ClassRegistry::new();
        let root = registry
            .define(ClassDef::new("Root").legacy(Function::new(|this, _| {
                this.set("trail", json!(["root"]));
                Value::Null
            })))
            .unwrap();
        let leaf = registry
            .define(ClassDef::new("Leaf").extends(root).legacy(Function::new(|this, args| {
                let mut trail = this.get_value("trail").unwrap_or_else(|| json!([]));
                if let Some(trail) = trail.as_array_mut() {
                    trail.push(json!("leaf"));
                }
                this.set("trail", trail);
                this.set("arg", args.first().cloned().unwrap_or_default());
                Value::Null
            })))
            .unwrap();

        let instance = registry.construct(leaf, &[json!(5)]).unwrap();
        assert_eq!(instance.class_id(), leaf);
        assert_eq!(instance.get_value("trail"), Some(json!(["root", "leaf"])));
        assert_eq!(instance.get_value("arg"), Some(json!(5)));
    }

    #[test]
    fn base_is_abstract() {
        let mut registry = ClassRegistry::new();
        let root = registry.define(ClassDef::new("Root")).unwrap();
        let base = registry
            .wrap_as_base(root, ClassConfig::new().with_name("Base"))
            .unwrap();
        let err = registry.construct(base, &[]).unwrap_err();
        assert!(matches!(err, ClassError::AbstractInstantiation { class } if class == "Base"));
    }

    #[test]
    fn unknown_class_is_rejected() {
        let registry = ClassRegistry::new();
        let err = registry.construct(ClassId::new(3), &[]).unwrap_err();
        assert!(matches!(err, ClassError::UnknownClass(_)));
    }
}
