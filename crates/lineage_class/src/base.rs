//! Base wrapper factory.
//!
//! [`ClassRegistry::wrap_as_base`] inserts an abstract class between an
//! existing class and every subclass that will be defined on top of it. The
//! base wrapper owns the resolved initialization hook and is where the
//! construction chain bottoms out: it allocates the instance for whichever
//! class the caller actually asked for.

use crate::config::ClassConfig;
use crate::error::ClassError;
use crate::prepare::prepare_subclass;
use crate::registry::{ClassDef, ClassEntry, ClassKind, ClassRegistry};
use lineage_object::{ClassId, Function, INIT_OBJECT_KEY, Member, Members, OBJECT_ID_KEY};

impl ClassRegistry {
    /// Wraps an existing class so it can root a hierarchy of wrapped
    /// subclasses.
    ///
    /// The initialization hook is resolved in this order:
    ///
    /// 1. `options.init_object`
    /// 2. an `init_object` function found on the existing class's
    ///    instance-facing surface
    /// 3. for a prototype-like (legacy) class, its constructor
    /// 4. a no-op
    ///
    /// A class-like existing class without an `init_object` must be given
    /// one through `options`, or construction will not initialize anything.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `existing` or a class mixin is
    /// not registered.
    ///
    /// # Example
    ///
    /// ```
    /// use lineage_class::prelude::*;
    /// use serde_json::json;
    ///
    /// let mut registry = ClassRegistry::new();
    /// let legacy = registry
    ///     .define(ClassDef::new("LegacyView").legacy(Function::new(|this, args| {
    ///         this.set("options", args.first().cloned().unwrap_or_default());
    ///         Value::Null
    ///     })))
    ///     .unwrap();
    ///
    /// let view = registry.wrap_as_base(legacy, ClassConfig::new().with_name("View")).unwrap();
    /// assert_eq!(registry.name(view), Some("View"));
    ///
    /// // Abstract: only wrapped subclasses can be constructed.
    /// assert!(registry.construct(view, &[]).is_err());
    ///
    /// let body = registry.define(ClassDef::new("Panel").extends(view)).unwrap();
    /// let panel = registry.wrap(body).unwrap();
    /// let instance = registry.construct(panel, &[json!({"el": "#main"})]).unwrap();
    /// assert_eq!(instance.get_value("options"), Some(json!({"el": "#main"})));
    /// ```
    pub fn wrap_as_base(
        &mut self,
        existing: ClassId,
        options: ClassConfig,
    ) -> Result<ClassId, ClassError> {
        let entry = self.entry(existing)?;
        let class_like = !entry.prototype_writable;
        let name = options.name.clone().or_else(|| entry.name.clone());

        let inherited_init = entry
            .prototype
            .get(INIT_OBJECT_KEY)
            .and_then(|member| member.as_function().cloned());
        let legacy_constructor = match &entry.kind {
            ClassKind::Existing { constructor } if !class_like => constructor.clone(),
            _ => None,
        };
        let init_object = match (options.init_object.clone(), inherited_init, legacy_constructor) {
            (Some(explicit), _, _) => explicit,
            (None, Some(inherited), _) => inherited,
            (None, None, Some(constructor)) => {
                Function::named("legacy_constructor", move |this, args| {
                    constructor.call(this, args)
                })
            }
            (None, None, None) => {
                tracing::debug!(
                    class = %self.display_name(existing),
                    "no init_object found; base wrapper initializes nothing"
                );
                Function::noop()
            }
        };

        let object_id = self.mint_object_id();
        let (statics, prototype) = self.derive_surfaces(Some(existing))?;
        let mut identity = Members::new();
        identity.insert(OBJECT_ID_KEY.into(), Member::Data(object_id.get().into()));
        statics.assign(identity.clone());
        prototype.assign(identity);
        prototype.set(INIT_OBJECT_KEY, init_object);

        let base = self.insert(ClassEntry {
            name,
            parent: Some(existing),
            kind: ClassKind::Base { object_id },
            statics,
            prototype,
            prototype_writable: false,
            config: None,
        })?;
        prepare_subclass(self, base, options)?;

        tracing::debug!(
            class = %self.display_name(base),
            %object_id,
            class_like,
            "wrapped base class"
        );
        Ok(base)
    }

    /// Legacy-style subclassing of a base wrapper or any class below one.
    ///
    /// Defines an anonymous subclass of `parent`, assigns `instance_props`
    /// and `static_props` onto it as-is (no auto-merging of these values
    /// against each other), then wraps the result with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::MissingBase`] if `parent` does not descend from
    /// a base wrapper, or [`ClassError::UnknownClass`] if it is not
    /// registered.
    ///
    /// # Example
    ///
    /// ```
    /// use lineage_class::prelude::*;
    /// use serde_json::json;
    ///
    /// let mut registry = ClassRegistry::new();
    /// let legacy = registry.define(ClassDef::new("LegacyRouter").legacy(Function::noop())).unwrap();
    /// let router = registry.wrap_as_base(legacy, ClassConfig::new()).unwrap();
    ///
    /// let app_router = registry
    ///     .extend(
    ///         router,
    ///         lineage_object::members([("routes", json!({"": "home"}))]),
    ///         Members::new(),
    ///         None,
    ///     )
    ///     .unwrap();
    /// let instance = registry.construct(app_router, &[]).unwrap();
    /// assert_eq!(instance.get_value("routes"), Some(json!({"": "home"})));
    /// ```
    pub fn extend(
        &mut self,
        parent: ClassId,
        instance_props: Members,
        static_props: Members,
        options: Option<ClassConfig>,
    ) -> Result<ClassId, ClassError> {
        self.entry(parent)?;
        if self.base_of(parent).is_none() {
            return Err(ClassError::missing_base(self.display_name(parent)));
        }

        let body = self.define(ClassDef::anonymous().extends(parent))?;
        let entry = self.entry(body)?;
        entry.prototype.assign(instance_props);
        entry.statics.assign(static_props);

        tracing::trace!(parent = %self.display_name(parent), %body, "legacy extend");
        self.wrap_with(body, options.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::json;

    #[test]
    fn base_gets_fresh_identity_on_both_surfaces() {
        let mut registry = ClassRegistry::new();
        let existing = registry.define(ClassDef::new("Existing")).unwrap();
        let first = registry.wrap_as_base(existing, ClassConfig::new()).unwrap();
        let second = registry.wrap_as_base(existing, ClassConfig::new()).unwrap();

        let id = registry.object_id(first).unwrap();
        assert_ne!(Some(id), registry.object_id(second));
        assert_eq!(registry.static_value(first, OBJECT_ID_KEY), Some(json!(id.get())));
        assert_eq!(
            registry.prototype(first).unwrap().get_value(OBJECT_ID_KEY),
            Some(json!(id.get()))
        );
        assert_eq!(registry.object_id(existing), None);
        assert_eq!(registry.describe(first).unwrap().role, ClassRole::Base);
    }

    #[test]
    fn explicit_init_object_wins() {
        let mut registry = ClassRegistry::new();
        let existing = registry
            .define(ClassDef::new("Existing").with_method(INIT_OBJECT_KEY, |_, _| json!("inherited")))
            .unwrap();
        let explicit = Function::new(|_, _| json!("explicit"));
        let base = registry
            .wrap_as_base(existing, ClassConfig::new().with_init_object(explicit.clone()))
            .unwrap();
        let init = registry.prototype(base).unwrap().get(INIT_OBJECT_KEY).unwrap();
        assert_eq!(init, Member::Function(explicit));
    }

    #[test]
    fn inherited_init_object_is_reused() {
        let mut registry = ClassRegistry::new();
        let existing = registry
            .define(ClassDef::new("Existing").with_method(INIT_OBJECT_KEY, |_, _| json!("inherited")))
            .unwrap();
        let inherited = registry.prototype(existing).unwrap().get(INIT_OBJECT_KEY).unwrap();
        let base = registry.wrap_as_base(existing, ClassConfig::new()).unwrap();
        assert_eq!(
            registry.prototype(base).unwrap().get_own(INIT_OBJECT_KEY),
            Some(inherited)
        );
    }

    #[test]
    fn class_like_without_hook_falls_back_to_noop() {
        let mut registry = ClassRegistry::new();
        let existing = registry.define(ClassDef::new("Plain")).unwrap();
        let base = registry.wrap_as_base(existing, ClassConfig::new()).unwrap();
        let init = registry.prototype(base).unwrap().get(INIT_OBJECT_KEY).unwrap();
        assert_eq!(init.as_function().and_then(Function::name), Some("noop"));
    }

    #[test]
    fn name_defaults_to_existing_class() {
        let mut registry = ClassRegistry::new();
        let existing = registry.define(ClassDef::new("Collection")).unwrap();
        let base = registry.wrap_as_base(existing, ClassConfig::new()).unwrap();
        assert_eq!(registry.name(base), Some("Collection"));
        assert_eq!(registry.find("Collection"), Some(base));
    }

    #[test]
    fn base_prototype_attrs_are_promoted() {
        let mut registry = ClassRegistry::new();
        let existing = registry
            .define(ClassDef::new("R").with_static("n", json!(123)))
            .unwrap();
        let base = registry
            .wrap_as_base(existing, ClassConfig::new().with_prototype_attrs(["n"]))
            .unwrap();
        let prototype = registry.prototype(base).unwrap();
        assert!(prototype.has_own("n"));
        assert_eq!(prototype.get_value("n"), Some(json!(123)));
    }

    #[test]
    fn extend_assigns_raw_props_and_wraps() {
        let mut registry = ClassRegistry::new();
        let existing = registry
            .define(ClassDef::new("R").with_static("h", json!({"k1": 1})))
            .unwrap();
        let base = registry
            .wrap_as_base(
                existing,
                ClassConfig::new()
                    .with_automerge_attrs(["h"])
                    .with_prototype_attrs(["h"]),
            )
            .unwrap();

        let extended = registry
            .extend(
                base,
                lineage_object::members([("greeting", json!("hi"))]),
                lineage_object::members([("h", json!({"a": 1}))]),
                None,
            )
            .unwrap();

        let body = registry.parent(extended).unwrap();
        assert_eq!(registry.name(body), None);
        assert_eq!(registry.parent(body), Some(base));
        assert_eq!(registry.describe(extended).unwrap().role, ClassRole::Wrapper);
        assert_eq!(
            registry.prototype(extended).unwrap().get_value("greeting"),
            Some(json!("hi"))
        );
        assert_eq!(
            registry.static_value(extended, "h"),
            Some(json!({"a": 1, "k1": 1}))
        );
    }

    #[test]
    fn extend_requires_a_base() {
        let mut registry = ClassRegistry::new();
        let loose = registry.define(ClassDef::new("Loose")).unwrap();
        let err = registry
            .extend(loose, Members::new(), Members::new(), None)
            .unwrap_err();
        assert!(matches!(err, ClassError::MissingBase { .. }));
    }
}
