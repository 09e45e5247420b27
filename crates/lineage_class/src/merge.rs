//! Attribute auto-merging.
//!
//! When a subclass and its parent both define an attribute listed in
//! `automerge_attrs`, the subclass's value is combined with the parent's
//! instead of shadowing it. The combination depends on the shape of both
//! sides:
//!
//! | Subclass | Parent | Result |
//! |----------|--------|--------|
//! | identical to parent | | unchanged, not merged |
//! | any | blank | subclass value kept, not merged |
//! | blank | non-blank | parent value adopted |
//! | function | function | function unioning both results |
//! | function | map | function unioning its result with the map |
//! | map | function | function unioning the map with the function's result |
//! | map | map | map union, computed now |
//! | anything else | | unchanged, not merged |
//!
//! Unions are [`defaults_union`]s: the subclass side always wins on key
//! conflicts. A value is *blank* when it is absent, `null`, or an empty map,
//! list or string. Functions are never blank; their results are not inspected
//! until they are called.

use lineage_object::{Function, Member, Surface, Value};

/// What [`merge_attr`] did with an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Both sides resolve to the same member.
    Identical,
    /// The parent side is blank; the subclass value stands.
    KeptOwn,
    /// The subclass side is blank; the parent value was adopted.
    AdoptedParent,
    /// At least one side is a function; a combining function was installed.
    Composed,
    /// Both sides are maps; their union was installed.
    Unioned,
    /// The shapes cannot be combined; nothing changed.
    Incompatible,
}

impl MergeOutcome {
    /// Returns `true` if a new value was written.
    #[must_use]
    pub fn merged(self) -> bool {
        matches!(self, Self::AdoptedParent | Self::Composed | Self::Unioned)
    }
}

/// Returns every entry of `primary`, plus every entry of `secondary` whose
/// key `primary` lacks.
///
/// Values that are not maps contribute no entries.
///
/// ```
/// use lineage_class::merge::defaults_union;
/// use serde_json::json;
///
/// let merged = defaults_union(&json!({"a": 1, "b": 2}), &json!({"b": 20, "c": 30}));
/// assert_eq!(merged, json!({"a": 1, "b": 2, "c": 30}));
/// ```
#[must_use]
pub fn defaults_union(primary: &Value, secondary: &Value) -> Value {
    let mut merged = primary.as_object().cloned().unwrap_or_default();
    if let Some(secondary) = secondary.as_object() {
        for (key, value) in secondary {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}

/// Combines the subclass's and the parent's values of `attr`.
///
/// The subclass candidate is, in order of preference: declared directly on
/// `prototype`; declared on or inherited by `statics`; inherited through
/// `prototype`. The parent candidate is resolved through `parent_prototype`.
///
/// A merged value is written to `statics`, and also to `prototype` when the
/// candidate came from there, so both access paths observe it.
pub fn merge_attr(
    statics: &Surface,
    prototype: &Surface,
    parent_prototype: Option<&Surface>,
    attr: &str,
) -> MergeOutcome {
    let (own, from_prototype) = match prototype.get_own(attr) {
        Some(member) => (Some(member), true),
        None => match statics.get(attr) {
            Some(member) => (Some(member), false),
            None => (prototype.get(attr), true),
        },
    };
    let inherited = parent_prototype.and_then(|surface| surface.get(attr));

    let (outcome, merged) = combine(own, inherited);
    tracing::trace!(attr, ?outcome, "merge decision");

    if let Some(merged) = merged {
        if from_prototype {
            prototype.set(attr, merged.clone());
        }
        statics.set(attr, merged);
    }
    outcome
}

fn combine(own: Option<Member>, inherited: Option<Member>) -> (MergeOutcome, Option<Member>) {
    if own == inherited {
        return (MergeOutcome::Identical, None);
    }
    if is_blank(inherited.as_ref()) {
        return (MergeOutcome::KeptOwn, None);
    }
    if is_blank(own.as_ref()) {
        return (MergeOutcome::AdoptedParent, inherited);
    }

    match (own, inherited) {
        (Some(Member::Function(own)), Some(Member::Function(inherited))) => {
            let merged = Function::named("merged", move |this, args| {
                let primary = own.call(this, args);
                let secondary = inherited.call(this, args);
                defaults_union(&primary, &secondary)
            });
            (MergeOutcome::Composed, Some(merged.into()))
        }
        (Some(Member::Function(own)), Some(Member::Data(Value::Object(inherited)))) => {
            let inherited = Value::Object(inherited);
            let merged = Function::named("merged", move |this, args| {
                defaults_union(&own.call(this, args), &inherited)
            });
            (MergeOutcome::Composed, Some(merged.into()))
        }
        (Some(Member::Data(Value::Object(own))), Some(Member::Function(inherited))) => {
            let own = Value::Object(own);
            let merged = Function::named("merged", move |this, args| {
                defaults_union(&own, &inherited.call(this, args))
            });
            (MergeOutcome::Composed, Some(merged.into()))
        }
        (Some(Member::Data(own @ Value::Object(_))), Some(Member::Data(inherited @ Value::Object(_)))) => {
            let merged = defaults_union(&own, &inherited);
            (MergeOutcome::Unioned, Some(merged.into()))
        }
        _ => (MergeOutcome::Incompatible, None),
    }
}

fn is_blank(member: Option<&Member>) -> bool {
    match member {
        None => true,
        Some(Member::Function(_)) => false,
        Some(Member::Data(value)) => match value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(text) => text.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        },
    }
}
