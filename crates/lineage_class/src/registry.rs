//! Class descriptor arena.
//!
//! Classes are not language-level types here: each one is a descriptor stored
//! in a [`ClassRegistry`] and addressed by a [`ClassId`]. A descriptor holds
//! the class's parent, its static surface, its instance-facing surface and,
//! once prepared, its configuration record.
//!
//! Three roles exist:
//!
//! | Role | Produced by | Constructible |
//! |------|-------------|---------------|
//! | [`ClassRole::Existing`] | [`ClassRegistry::define`] | directly, outside the engine |
//! | [`ClassRole::Base`] | [`ClassRegistry::wrap_as_base`] | never directly |
//! | [`ClassRole::Wrapper`] | [`ClassRegistry::wrap`], [`Wrapper::apply`](crate::wrap::Wrapper::apply) | yes |
//!
//! # Example
//!
//! ```
//! use lineage_class::prelude::*;
//! use serde_json::json;
//!
//! let mut registry = ClassRegistry::new();
//! let record = registry
//!     .define(ClassDef::new("Record").with_static("kind", json!("record")))
//!     .unwrap();
//!
//! assert_eq!(registry.name(record), Some("Record"));
//! assert_eq!(registry.static_value(record, "kind"), Some(json!("record")));
//! assert_eq!(registry.find("Record"), Some(record));
//! ```

use crate::config::ClassConfig;
use crate::error::ClassError;
use hashbrown::HashMap;
use lineage_object::{ClassId, Function, Instance, Member, Members, ObjectId, Surface, Value};
use serde::Serialize;
use std::sync::Arc;

const ANONYMOUS: &str = "<anonymous>";

// ─────────────────────────────────────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// What produced a class, and therefore how it constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassRole {
    /// A class defined outside the engine (a legacy constructor, a plain
    /// class, or a user-authored subclass body).
    Existing,
    /// An abstract root inserted above an existing class.
    Base,
    /// A constructible wrapper around a subclass body.
    Wrapper,
}

pub(crate) enum ClassKind {
    Existing {
        constructor: Option<Function>,
    },
    Base {
        object_id: ObjectId,
    },
    Wrapper {
        object_id: ObjectId,
        legacy_super: Option<Surface>,
    },
}

impl ClassKind {
    fn role(&self) -> ClassRole {
        match self {
            Self::Existing { .. } => ClassRole::Existing,
            Self::Base { .. } => ClassRole::Base,
            Self::Wrapper { .. } => ClassRole::Wrapper,
        }
    }

    fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Existing { .. } => None,
            Self::Base { object_id } | Self::Wrapper { object_id, .. } => Some(*object_id),
        }
    }
}

pub(crate) struct ClassEntry {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ClassId>,
    pub(crate) kind: ClassKind,
    pub(crate) statics: Surface,
    pub(crate) prototype: Surface,
    /// Legacy constructors expose a writable prototype; classes do not.
    pub(crate) prototype_writable: bool,
    pub(crate) config: Option<Arc<ClassConfig>>,
}

/// Serializable summary of a class descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ClassInfo {
    /// The class handle.
    pub id: ClassId,
    /// Display name.
    pub name: String,
    /// What produced the class.
    pub role: ClassRole,
    /// Direct parent.
    pub parent: Option<ClassId>,
    /// Identity token, own or inherited.
    pub object_id: Option<ObjectId>,
    /// Whether the class counts as class-like rather than prototype-like.
    pub class_like: bool,
    /// Effective configuration record, own or inherited.
    pub config: Option<ClassConfig>,
}

// ─────────────────────────────────────────────────────────────────────────────
// ClassDef
// ─────────────────────────────────────────────────────────────────────────────

/// Definition of a class that exists outside the engine.
///
/// Use this for the legacy framework's own classes and for the subclass
/// bodies that are later passed to [`ClassRegistry::wrap`].
///
/// # Example
///
/// ```
/// use lineage_class::prelude::*;
/// use serde_json::json;
///
/// // A legacy, prototype-style constructor.
/// let legacy = ClassDef::new("LegacyModel")
///     .legacy(Function::new(|this, args| {
///         this.set("attributes", args.first().cloned().unwrap_or_default());
///         Value::Null
///     }))
///     .with_member("id_attribute", json!("id"));
///
/// let mut registry = ClassRegistry::new();
/// let id = registry.define(legacy).unwrap();
/// assert!(!registry.is_class_like(id).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct ClassDef {
    name: Option<String>,
    parent: Option<ClassId>,
    statics: Members,
    members: Members,
    constructor: Option<Function>,
}

impl ClassDef {
    /// Starts a named class definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Starts an unnamed class definition.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the parent class.
    #[must_use]
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declares a static member.
    #[must_use]
    pub fn with_static(mut self, key: impl Into<String>, member: impl Into<Member>) -> Self {
        self.statics.insert(key.into(), member.into());
        self
    }

    /// Declares a member on the instance-facing surface.
    #[must_use]
    pub fn with_member(mut self, key: impl Into<String>, member: impl Into<Member>) -> Self {
        self.members.insert(key.into(), member.into());
        self
    }

    /// Declares a method on the instance-facing surface.
    #[must_use]
    pub fn with_method<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        let key = key.into();
        let function = Function::named(key.as_str(), f);
        self.with_member(key, function)
    }

    /// Marks the class as a legacy, prototype-style constructor.
    ///
    /// The constructor runs when the class is constructed directly, and
    /// becomes the initialization hook of a base wrapper around it when no
    /// explicit hook is available.
    #[must_use]
    pub fn legacy(mut self, constructor: Function) -> Self {
        self.constructor = Some(constructor);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ClassRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Arena owning every class descriptor and the identity-token counter.
///
/// Defining classes needs `&mut ClassRegistry`; constructing instances only
/// needs `&ClassRegistry`. Preparation of a class always completes before the
/// call that defines it returns, so a class is fully configured before it can
/// be extended or constructed.
#[derive(Default)]
pub struct ClassRegistry {
    classes: Vec<ClassEntry>,
    names: HashMap<String, ClassId>,
    next_object_id: u64,
}

impl core::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self
            .classes
            .iter()
            .map(|entry| entry.name.as_deref().unwrap_or(ANONYMOUS))
            .collect();
        f.debug_struct("ClassRegistry")
            .field("classes", &names)
            .field("next_object_id", &self.next_object_id)
            .finish()
    }
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class defined outside the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if the parent is not registered,
    /// or [`ClassError::CapacityExceeded`] once `u32::MAX` classes exist.
    pub fn define(&mut self, def: ClassDef) -> Result<ClassId, ClassError> {
        let (statics, prototype) = self.derive_surfaces(def.parent)?;
        statics.assign(def.statics);
        prototype.assign(def.members);

        let prototype_writable = def.constructor.is_some();
        self.insert(ClassEntry {
            name: def.name,
            parent: def.parent,
            kind: ClassKind::Existing {
                constructor: def.constructor,
            },
            statics,
            prototype,
            prototype_writable,
            config: None,
        })
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the most recently registered class with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    /// Returns the class name, if it has one.
    #[must_use]
    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.classes.get(id.index())?.name.as_deref()
    }

    /// Returns the class name for messages, falling back to a placeholder.
    #[must_use]
    pub fn display_name(&self, id: ClassId) -> String {
        match self.classes.get(id.index()) {
            Some(entry) => entry.name.clone().unwrap_or_else(|| ANONYMOUS.to_string()),
            None => id.to_string(),
        }
    }

    /// Renames a class. The old name no longer resolves through
    /// [`find`](Self::find) unless a later class still holds it.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `id` is not registered.
    pub fn set_name(&mut self, id: ClassId, name: impl Into<String>) -> Result<(), ClassError> {
        let name = name.into();
        let previous = self.entry_mut(id)?.name.replace(name.clone());
        if let Some(previous) = previous
            && self.names.get(&previous) == Some(&id)
        {
            self.names.remove(&previous);
        }
        self.names.insert(name, id);
        Ok(())
    }

    /// Returns the direct parent of a class.
    #[must_use]
    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.classes.get(id.index())?.parent
    }

    /// Returns the class's static surface.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `id` is not registered.
    pub fn statics(&self, id: ClassId) -> Result<Surface, ClassError> {
        Ok(self.entry(id)?.statics.clone())
    }

    /// Returns the class's instance-facing surface.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `id` is not registered.
    pub fn prototype(&self, id: ClassId) -> Result<Surface, ClassError> {
        Ok(self.entry(id)?.prototype.clone())
    }

    /// Reads a static data member, own or inherited.
    #[must_use]
    pub fn static_value(&self, id: ClassId, key: &str) -> Option<Value> {
        self.classes.get(id.index())?.statics.get_value(key)
    }

    /// Returns the identity token of the nearest engine-produced class on
    /// the chain starting at `id`.
    #[must_use]
    pub fn object_id(&self, id: ClassId) -> Option<ObjectId> {
        self.chain(id).find_map(|entry| entry.kind.object_id())
    }

    /// Returns the configuration record governing `id`, own or inherited.
    #[must_use]
    pub fn config(&self, id: ClassId) -> Option<Arc<ClassConfig>> {
        self.chain(id).find_map(|entry| entry.config.clone())
    }

    /// Returns the instance-facing surface a subclass wrapper's body extends.
    ///
    /// Legacy code reads this to call overridden methods of the parent.
    #[must_use]
    pub fn legacy_super(&self, id: ClassId) -> Option<Surface> {
        match &self.classes.get(id.index())?.kind {
            ClassKind::Wrapper { legacy_super, .. } => legacy_super.clone(),
            _ => None,
        }
    }

    /// Returns `true` if the class has a non-writable prototype.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `id` is not registered.
    pub fn is_class_like(&self, id: ClassId) -> Result<bool, ClassError> {
        Ok(!self.entry(id)?.prototype_writable)
    }

    /// Returns `id` followed by each of its ancestors, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: ClassId) -> Vec<ClassId> {
        let mut ids = Vec::new();
        let mut current = self.classes.get(id.index()).map(|_| id);
        while let Some(class) = current {
            ids.push(class);
            current = self.parent(class);
        }
        ids
    }

    /// Returns `true` if `id` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_subclass_of(&self, id: ClassId, ancestor: ClassId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Returns `true` if `instance` was allocated for `class` or a subclass.
    #[must_use]
    pub fn is_instance_of(&self, instance: &Instance, class: ClassId) -> bool {
        self.is_subclass_of(instance.class_id(), class)
    }

    /// Returns the nearest base wrapper on the chain starting at `id`.
    #[must_use]
    pub fn base_of(&self, id: ClassId) -> Option<ClassId> {
        self.ancestors(id).into_iter().find(|class| {
            matches!(
                self.classes[class.index()].kind,
                ClassKind::Base { .. }
            )
        })
    }

    /// Summarizes a class descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::UnknownClass`] if `id` is not registered.
    pub fn describe(&self, id: ClassId) -> Result<ClassInfo, ClassError> {
        let entry = self.entry(id)?;
        Ok(ClassInfo {
            id,
            name: self.display_name(id),
            role: entry.kind.role(),
            parent: entry.parent,
            object_id: self.object_id(id),
            class_like: !entry.prototype_writable,
            config: self.config(id).map(|config| config.as_ref().clone()),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Crate internals
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn entry(&self, id: ClassId) -> Result<&ClassEntry, ClassError> {
        self.classes
            .get(id.index())
            .ok_or(ClassError::UnknownClass(id))
    }

    pub(crate) fn entry_mut(&mut self, id: ClassId) -> Result<&mut ClassEntry, ClassError> {
        self.classes
            .get_mut(id.index())
            .ok_or(ClassError::UnknownClass(id))
    }

    /// Stores `entry` under the next handle. Handles are `u32` indices, so the
    /// arena holds at most `u32::MAX` classes.
    pub(crate) fn insert(&mut self, entry: ClassEntry) -> Result<ClassId, ClassError> {
        let raw = u32::try_from(self.classes.len())
            .ok()
            .filter(|raw| *raw < u32::MAX)
            .ok_or(ClassError::CapacityExceeded(self.classes.len()))?;
        let id = ClassId::new(raw);
        if let Some(name) = &entry.name {
            self.names.insert(name.clone(), id);
        }
        self.classes.push(entry);
        Ok(id)
    }

    /// Mints the next identity token. Tokens start at 1 and are never reused.
    pub(crate) fn mint_object_id(&mut self) -> ObjectId {
        self.next_object_id += 1;
        ObjectId::new(self.next_object_id)
    }

    /// Creates fresh static and instance-facing surfaces inheriting from
    /// `parent`'s.
    pub(crate) fn derive_surfaces(
        &self,
        parent: Option<ClassId>,
    ) -> Result<(Surface, Surface), ClassError> {
        match parent {
            Some(parent) => {
                let entry = self.entry(parent)?;
                Ok((
                    Surface::derive(&entry.statics),
                    Surface::derive(&entry.prototype),
                ))
            }
            None => Ok((Surface::root(), Surface::root())),
        }
    }

    fn chain(&self, id: ClassId) -> impl Iterator<Item = &ClassEntry> {
        let mut current = self.classes.get(id.index());
        core::iter::from_fn(move || {
            let entry = current?;
            current = entry.parent.and_then(|parent| self.classes.get(parent.index()));
            Some(entry)
        })
    }
}
