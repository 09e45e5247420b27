//! Shared member tables with prototype-style inheritance.
//!
//! A [`Surface`] is a handle to a member table plus an optional parent
//! surface. Lookups that miss locally continue up the parent chain, which is
//! how both instance-facing surfaces (what instances inherit) and static
//! surfaces (what subclasses inherit from their parent class) behave.
//!
//! Surfaces are shared and mutable through `&self`: a class's surface keeps
//! receiving members (mixins, promoted attributes, merged values) after
//! descendants already point at it, and descendants observe those writes.

use crate::member::{Member, Members, Value};
use core::fmt;
use parking_lot::RwLock;
use std::sync::Arc;

struct SurfaceInner {
    members: RwLock<Members>,
    parent: Option<Surface>,
}

/// Handle to a shared member table.
///
/// Cloning is cheap and yields a handle to the same table; use
/// [`Surface::ptr_eq`] to compare identity.
///
/// # Example
///
/// ```
/// use lineage_object::Surface;
/// use serde_json::json;
///
/// let base = Surface::root();
/// base.set("greeting", json!("hi"));
///
/// let derived = Surface::derive(&base);
/// assert_eq!(derived.get_value("greeting"), Some(json!("hi")));
/// assert!(!derived.has_own("greeting"));
///
/// derived.set("greeting", json!("hey"));
/// assert_eq!(derived.get_value("greeting"), Some(json!("hey")));
/// assert_eq!(base.get_value("greeting"), Some(json!("hi")));
/// ```
#[derive(Clone)]
pub struct Surface(Arc<SurfaceInner>);

impl Surface {
    /// Creates a surface with no parent.
    #[must_use]
    pub fn root() -> Self {
        Self::with_parent(None)
    }

    /// Creates an empty surface inheriting from `parent`.
    #[must_use]
    pub fn derive(parent: &Surface) -> Self {
        Self::with_parent(Some(parent.clone()))
    }

    /// Creates an empty surface with an optional parent.
    #[must_use]
    pub fn with_parent(parent: Option<Surface>) -> Self {
        Self(Arc::new(SurfaceInner {
            members: RwLock::new(Members::new()),
            parent,
        }))
    }

    /// Returns the parent surface.
    #[must_use]
    pub fn parent(&self) -> Option<&Surface> {
        self.0.parent.as_ref()
    }

    /// Returns a member declared directly on this surface.
    #[must_use]
    pub fn get_own(&self, key: &str) -> Option<Member> {
        self.0.members.read().get(key).cloned()
    }

    /// Returns `true` if `key` is declared directly on this surface.
    #[must_use]
    pub fn has_own(&self, key: &str) -> bool {
        self.0.members.read().contains_key(key)
    }

    /// Looks `key` up on this surface, then on each ancestor.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Member> {
        let mut current = Some(self);
        while let Some(surface) = current {
            if let Some(member) = surface.get_own(key) {
                return Some(member);
            }
            current = surface.parent();
        }
        None
    }

    /// Looks up a data member through the chain.
    ///
    /// Returns `None` if the key is missing or resolves to a function.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).and_then(Member::into_data)
    }

    /// Returns `true` if `key` resolves anywhere on the chain.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Declares `key` on this surface, shadowing any inherited member.
    pub fn set(&self, key: impl Into<String>, member: impl Into<Member>) {
        self.0.members.write().insert(key.into(), member.into());
    }

    /// Removes a member declared directly on this surface.
    pub fn remove(&self, key: &str) -> Option<Member> {
        self.0.members.write().shift_remove(key)
    }

    /// Copies every entry of `members` onto this surface, overwriting
    /// existing keys.
    pub fn assign(&self, members: Members) {
        self.0.members.write().extend(members);
    }

    /// Returns a snapshot of the members declared directly on this surface.
    #[must_use]
    pub fn own_members(&self) -> Members {
        self.0.members.read().clone()
    }

    /// Returns the keys declared directly on this surface, in insertion order.
    #[must_use]
    pub fn own_keys(&self) -> Vec<String> {
        self.0.members.read().keys().cloned().collect()
    }

    /// Returns `true` if both handles refer to the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &Surface) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns `true` if `ancestor` appears on this surface's parent chain.
    #[must_use]
    pub fn inherits_from(&self, ancestor: &Surface) -> bool {
        let mut current = self.parent();
        while let Some(surface) = current {
            if surface.ptr_eq(ancestor) {
                return true;
            }
            current = surface.parent();
        }
        false
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("own", &self.own_keys())
            .field("has_parent", &self.parent().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_the_chain() {
        let a = Surface::root();
        let b = Surface::derive(&a);
        let c = Surface::derive(&b);
        a.set("x", json!(1));
        b.set("y", json!(2));

        assert_eq!(c.get_value("x"), Some(json!(1)));
        assert_eq!(c.get_value("y"), Some(json!(2)));
        assert!(c.get("z").is_none());
        assert!(c.inherits_from(&a));
        assert!(!a.inherits_from(&c));
    }

    #[test]
    fn late_writes_are_visible_to_descendants() {
        let parent = Surface::root();
        let child = Surface::derive(&parent);
        parent.set("late", json!(true));
        assert!(child.has("late"));
        assert!(!child.has_own("late"));
    }

    #[test]
    fn assign_overwrites_and_keeps_order() {
        let surface = Surface::root();
        surface.set("a", json!(1));
        surface.assign(crate::members([("b", json!(2)), ("a", json!(3))]));
        assert_eq!(surface.own_keys(), ["a", "b"]);
        assert_eq!(surface.get_value("a"), Some(json!(3)));
    }

    #[test]
    fn remove_reveals_inherited_member() {
        let parent = Surface::root();
        parent.set("k", json!("parent"));
        let child = Surface::derive(&parent);
        child.set("k", json!("child"));
        assert_eq!(child.remove("k"), Some(Member::Data(json!("child"))));
        assert_eq!(child.get_value("k"), Some(json!("parent")));
    }

    #[test]
    fn clones_share_the_table() {
        let surface = Surface::root();
        let alias = surface.clone();
        alias.set("k", json!(1));
        assert!(surface.ptr_eq(&alias));
        assert!(surface.has_own("k"));
        assert!(!surface.ptr_eq(&Surface::root()));
    }
}
