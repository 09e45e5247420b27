//! Constructed objects.

use crate::id::{ClassId, ObjectId};
use crate::member::{Member, Members, OBJECT_ID_KEY, Value};
use crate::surface::Surface;

/// An object allocated from a class's instance-facing surface.
///
/// Reads check the instance's own fields first and then fall through to the
/// surface chain; writes always land on the instance's own fields.
#[derive(Debug, Clone)]
pub struct Instance {
    class: ClassId,
    surface: Surface,
    fields: Members,
}

impl Instance {
    /// Allocates a bare instance of `class` inheriting from `surface`.
    #[must_use]
    pub fn new(class: ClassId, surface: Surface) -> Self {
        Self {
            class,
            surface,
            fields: Members::new(),
        }
    }

    /// Returns the class this instance was allocated for.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class
    }

    /// Returns the instance-facing surface the instance inherits from.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the instance's own fields.
    #[must_use]
    pub fn fields(&self) -> &Members {
        &self.fields
    }

    /// Looks up a member on the instance, then on its surface chain.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Member> {
        match self.fields.get(key) {
            Some(member) => Some(member.clone()),
            None => self.surface.get(key),
        }
    }

    /// Looks up a data member on the instance, then on its surface chain.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).and_then(Member::into_data)
    }

    /// Sets an own field.
    pub fn set(&mut self, key: impl Into<String>, member: impl Into<Member>) {
        self.fields.insert(key.into(), member.into());
    }

    /// Returns `true` if `key` is an own field.
    #[must_use]
    pub fn has_own(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Invokes the function member `name` with this instance as receiver.
    ///
    /// Returns `None` if `name` is missing or is not a function.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Option<Value> {
        let function = match self.get(name)? {
            Member::Function(function) => function,
            Member::Data(_) => return None,
        };
        Some(function.call(self, args))
    }

    /// Returns the identity token of the wrapper this instance inherits from.
    #[must_use]
    pub fn object_id(&self) -> Option<ObjectId> {
        self.get_value(OBJECT_ID_KEY)
            .and_then(|value| value.as_u64())
            .map(ObjectId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Function;
    use serde_json::json;

    fn instance() -> Instance {
        let surface = Surface::root();
        surface.set("shared", json!("from surface"));
        surface.set(
            "bump",
            Function::new(|this, args| {
                let by = args.first().and_then(Value::as_i64).unwrap_or(1);
                let count = this.get_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
                this.set("count", json!(count + by));
                json!(count + by)
            }),
        );
        Instance::new(ClassId::new(3), surface)
    }

    #[test]
    fn own_fields_shadow_surface() {
        let mut obj = instance();
        assert_eq!(obj.get_value("shared"), Some(json!("from surface")));
        obj.set("shared", json!("own"));
        assert_eq!(obj.get_value("shared"), Some(json!("own")));
        assert_eq!(obj.surface().get_value("shared"), Some(json!("from surface")));
    }

    #[test]
    fn call_passes_receiver_and_args() {
        let mut obj = instance();
        assert_eq!(obj.call("bump", &[json!(2)]), Some(json!(2)));
        assert_eq!(obj.call("bump", &[]), Some(json!(3)));
        assert_eq!(obj.get_value("count"), Some(json!(3)));
    }

    #[test]
    fn call_on_data_or_missing_is_none() {
        let mut obj = instance();
        assert_eq!(obj.call("shared", &[]), None);
        assert_eq!(obj.call("missing", &[]), None);
    }

    #[test]
    fn object_id_reads_through_surface() {
        let obj = instance();
        assert_eq!(obj.object_id(), None);
        obj.surface().set(OBJECT_ID_KEY, json!(7));
        assert_eq!(obj.object_id(), Some(ObjectId::new(7)));
        assert_eq!(obj.class_id(), ClassId::new(3));
    }
}
