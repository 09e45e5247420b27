//! Subclass wrapper factory.
//!
//! Every class defined on top of a base wrapper must itself be wrapped before
//! it is constructed. The wrapper gets its own identity token, which is how
//! construction tells a wrapped class apart from the raw body it extends.

use crate::config::ClassConfig;
use crate::error::ClassError;
use crate::prepare::prepare_subclass;
use crate::registry::{ClassEntry, ClassKind, ClassRegistry};
use lineage_object::{ClassId, Member, Members, OBJECT_ID_KEY};

impl ClassRegistry {
    /// Wraps a subclass body with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::MissingBase`] if `cls` does not descend from a
    /// base wrapper, or [`ClassError::UnknownClass`] if it is not registered.
    pub fn wrap(&mut self, cls: ClassId) -> Result<ClassId, ClassError> {
        self.wrap_with(cls, ClassConfig::default())
    }

    /// Wraps a subclass body, preparing it with `options` first.
    ///
    /// The returned class extends `cls` and is named by `options.name`, or
    /// carries `cls`'s name when none is given. It keeps a
    /// back-reference to the instance-facing surface `cls` extends, readable
    /// through [`ClassRegistry::legacy_super`].
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::MissingBase`] if `cls` does not descend from a
    /// base wrapper, [`ClassError::UnknownClass`] if `cls` or a class mixin
    /// is not registered, or [`ClassError::CapacityExceeded`] if the registry
    /// is full.
    pub fn wrap_with(&mut self, cls: ClassId, options: ClassConfig) -> Result<ClassId, ClassError> {
        let name = match &options.name {
            Some(name) => Some(name.clone()),
            None => self.entry(cls)?.name.clone(),
        };
        if self.base_of(cls).is_none() {
            return Err(ClassError::missing_base(self.display_name(cls)));
        }

        let legacy_super = prepare_subclass(self, cls, options)?;

        let object_id = self.mint_object_id();
        let (statics, prototype) = self.derive_surfaces(Some(cls))?;
        let mut identity = Members::new();
        identity.insert(OBJECT_ID_KEY.into(), Member::Data(object_id.get().into()));
        statics.assign(identity.clone());
        prototype.assign(identity);

        let wrapper = self.insert(ClassEntry {
            name,
            parent: Some(cls),
            kind: ClassKind::Wrapper {
                object_id,
                legacy_super,
            },
            statics,
            prototype,
            prototype_writable: false,
            config: None,
        })?;

        tracing::debug!(
            class = %self.display_name(wrapper),
            body = %cls,
            %object_id,
            "wrapped subclass"
        );
        Ok(wrapper)
    }
}

/// A reusable subclass wrapper carrying fixed options.
///
/// Handy when several sibling subclasses share the same mixins or merge
/// lists.
///
/// ```
/// use lineage_class::prelude::*;
/// use serde_json::json;
///
/// let mut registry = ClassRegistry::new();
/// let root = registry.define(ClassDef::new("Root")).unwrap();
/// let base = registry.wrap_as_base(root, ClassConfig::new()).unwrap();
///
/// let timestamped = Wrapper::new(
///     ClassConfig::new().with_mixin(lineage_object::members([("stamped", json!(true))])),
/// );
/// let body = registry.define(ClassDef::new("Post").extends(base)).unwrap();
/// let post = timestamped.apply(&mut registry, body).unwrap();
///
/// let instance = registry.construct(post, &[]).unwrap();
/// assert_eq!(instance.get_value("stamped"), Some(json!(true)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Wrapper {
    options: ClassConfig,
}

impl Wrapper {
    /// Creates a wrapper applying `options` to every class it wraps.
    #[must_use]
    pub fn new(options: ClassConfig) -> Self {
        Self { options }
    }

    /// Returns the options applied by this wrapper.
    #[must_use]
    pub fn options(&self) -> &ClassConfig {
        &self.options
    }

    /// Wraps `cls` in `registry`.
    ///
    /// # Errors
    ///
    /// See [`ClassRegistry::wrap_with`].
    pub fn apply(&self, registry: &mut ClassRegistry, cls: ClassId) -> Result<ClassId, ClassError> {
        registry.wrap_with(cls, self.options.clone())
    }
}

impl From<ClassConfig> for Wrapper {
    fn from(options: ClassConfig) -> Self {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::json;

    fn hierarchy() -> (ClassRegistry, ClassId) {
        let mut registry = ClassRegistry::new();
        let root = registry.define(ClassDef::new("Root")).unwrap();
        let base = registry.wrap_as_base(root, ClassConfig::new()).unwrap();
        (registry, base)
    }

    #[test]
    fn wrapper_extends_body_and_keeps_its_name() {
        let (mut registry, base) = hierarchy();
        let body = registry
            .define(ClassDef::new("Body").extends(base).with_static("kind", json!("body")))
            .unwrap();
        let wrapped = registry.wrap(body).unwrap();

        assert_eq!(registry.parent(wrapped), Some(body));
        assert_eq!(registry.name(wrapped), Some("Body"));
        assert_eq!(registry.find("Body"), Some(wrapped));
        assert_eq!(registry.static_value(wrapped, "kind"), Some(json!("body")));
        assert_eq!(registry.describe(wrapped).unwrap().role, ClassRole::Wrapper);
    }

    #[test]
    fn explicit_name_overrides_body_name() {
        let (mut registry, base) = hierarchy();
        let body = registry.define(ClassDef::new("Body").extends(base)).unwrap();
        let wrapped = registry
            .wrap_with(body, ClassConfig::new().with_name("Explicit"))
            .unwrap();

        assert_eq!(registry.name(wrapped), Some("Explicit"));
        assert_eq!(registry.name(body), Some("Body"));
        assert_eq!(registry.find("Explicit"), Some(wrapped));
    }

    #[test]
    fn wrapper_token_differs_from_body_token() {
        let (mut registry, base) = hierarchy();
        let body = registry.define(ClassDef::new("Body").extends(base)).unwrap();
        let wrapped = registry.wrap(body).unwrap();

        let body_token = registry.object_id(body);
        let wrapper_token = registry.object_id(wrapped);
        assert_eq!(body_token, registry.object_id(base));
        assert_ne!(wrapper_token, body_token);
        assert_eq!(
            registry.static_value(wrapped, OBJECT_ID_KEY),
            wrapper_token.map(|id| json!(id.get()))
        );
    }

    #[test]
    fn legacy_super_points_at_parent_surface() {
        let (mut registry, base) = hierarchy();
        let body = registry.define(ClassDef::new("Body").extends(base)).unwrap();
        let wrapped = registry.wrap(body).unwrap();

        let legacy_super = registry.legacy_super(wrapped).unwrap();
        assert!(legacy_super.ptr_eq(&registry.prototype(base).unwrap()));
        assert!(registry.legacy_super(body).is_none());
    }

    #[test]
    fn wrapping_outside_a_base_fails() {
        let mut registry = ClassRegistry::new();
        let loose = registry.define(ClassDef::new("Loose")).unwrap();
        let err = registry.wrap(loose).unwrap_err();
        assert!(matches!(err, ClassError::MissingBase { class } if class == "Loose"));
    }

    #[test]
    fn reusable_wrapper_applies_same_options() {
        let (mut registry, base) = hierarchy();
        let wrapper = Wrapper::from(ClassConfig::new().with_automerge_attrs(["events"]));
        let a = registry.define(ClassDef::new("A").extends(base)).unwrap();
        let b = registry.define(ClassDef::new("B").extends(base)).unwrap();
        let a = wrapper.apply(&mut registry, a).unwrap();
        let b = wrapper.apply(&mut registry, b).unwrap();

        for class in [a, b] {
            let config = registry.config(class).unwrap();
            assert_eq!(config.automerge_attrs.as_deref(), Some(&["events".to_string()][..]));
        }
    }
}
