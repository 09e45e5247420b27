//! Example legacy MVC framework driven by Lineage class chains.
//!
//! The framework's own classes are legacy constructors; every class an
//! application defines on top of them is a wrapped subclass.
//!
//! ```text
//! LegacyModel ─▶ Model (base) ─▶ User ─▶ [User] ─▶ Admin ─▶ [Admin]
//!                     │                                        ▲
//!                     └ defaults merged at every level ────────┘
//! ```
//!
//! - `Model`: auto-merges `defaults`, exposes `defaults` and `id_attribute`
//!   on instances
//! - `Collection`: exposes `model` on instances
//! - `View`: class-like root with an explicit initialization hook and
//!   auto-merged `events`

mod legacy;
pub mod mixins;

pub use mixins::{SortOrder, Sortable, Validates};

use lineage_class::prelude::*;

/// Reads `key` off `instance`, calling it when it is a function.
pub fn result_of(instance: &mut Instance, key: &str) -> Value {
    match instance.get(key) {
        Some(Member::Function(function)) => function.call(instance, &[]),
        Some(Member::Data(value)) => value,
        None => Value::Null,
    }
}

/// The framework's base classes, registered and wrapped.
#[derive(Debug)]
pub struct Framework {
    registry: ClassRegistry,
    model: ClassId,
    collection: ClassId,
    view: ClassId,
}

impl Framework {
    /// Registers the legacy classes and wraps each as a base.
    ///
    /// # Errors
    ///
    /// Propagates registry errors; none occur with a fresh registry.
    pub fn new() -> Result<Self, ClassError> {
        let mut registry = ClassRegistry::new();

        let legacy_model = legacy::legacy_model(&mut registry)?;
        let model = registry.wrap_as_base(
            legacy_model,
            ClassConfig::new()
                .with_name("Model")
                .with_automerge_attrs(["defaults"])
                .with_prototype_attrs(["defaults", "id_attribute"]),
        )?;

        let legacy_collection = legacy::legacy_collection(&mut registry)?;
        let collection = registry.wrap_as_base(
            legacy_collection,
            ClassConfig::new()
                .with_name("Collection")
                .with_prototype_attrs(["model"]),
        )?;

        let view_root = legacy::view_root(&mut registry)?;
        let view = registry.wrap_as_base(
            view_root,
            ClassConfig::new()
                .with_name("View")
                .with_automerge_attrs(["events"])
                .with_prototype_attrs(["tag_name"])
                .with_init_object(legacy::view_init()),
        )?;

        tracing::debug!(classes = registry.len(), "framework ready");
        Ok(Self {
            registry,
            model,
            collection,
            view,
        })
    }

    /// The registry holding every framework and application class.
    #[must_use]
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Mutable access for defining classes directly.
    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    /// The `Model` base.
    #[must_use]
    pub fn model(&self) -> ClassId {
        self.model
    }

    /// The `Collection` base.
    #[must_use]
    pub fn collection(&self) -> ClassId {
        self.collection
    }

    /// The `View` base.
    #[must_use]
    pub fn view(&self) -> ClassId {
        self.view
    }

    /// Defines `def` and wraps it with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::MissingBase`] if `def` does not extend one of the
    /// framework's classes.
    pub fn define(&mut self, def: ClassDef, options: ClassConfig) -> Result<ClassId, ClassError> {
        let body = self.registry.define(def)?;
        self.registry.wrap_with(body, options)
    }

    /// Defines a model subclass of `parent` contributing `defaults`.
    ///
    /// # Errors
    ///
    /// See [`Framework::define`].
    pub fn define_model(
        &mut self,
        name: &str,
        parent: ClassId,
        defaults: Value,
    ) -> Result<ClassId, ClassError> {
        self.define(
            ClassDef::new(name)
                .extends(parent)
                .with_static("defaults", defaults),
            ClassConfig::new(),
        )
    }

    /// Constructs an instance.
    ///
    /// # Errors
    ///
    /// See [`ClassRegistry::construct`].
    pub fn create(&self, class: ClassId, args: &[Value]) -> Result<Instance, ClassError> {
        self.registry.construct(class, args)
    }
}
