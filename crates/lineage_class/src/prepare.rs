//! Subclass preparation.
//!
//! Both wrapper factories run [`prepare_subclass`] before handing a class
//! back. Preparation, in order:
//!
//! 1. applies the mixins named in the options;
//! 2. promotes `prototype_attrs` (inherited names first, then this class's
//!    own) from the static surface onto the instance-facing surface;
//! 3. auto-merges `automerge_attrs` with the parent, honouring
//!    `skip_parent_automerge_attrs`;
//! 4. stores the configuration record for the class.
//!
//! A class that brings no options of its own shares its parent's record
//! instead of copying it.

use crate::config::ClassConfig;
use crate::error::ClassError;
use crate::merge::merge_attr;
use crate::mixin::apply_mixins;
use crate::registry::ClassRegistry;
use indexmap::IndexSet;
use lineage_object::{ClassId, Surface};
use std::sync::Arc;

/// Prepares `cls` with `options` and records its configuration.
///
/// Returns the instance-facing surface of `cls`'s parent, which callers keep
/// as the legacy back-reference.
///
/// # Errors
///
/// Returns [`ClassError::UnknownClass`] if `cls` or a class mixin is not
/// registered.
pub(crate) fn prepare_subclass(
    registry: &mut ClassRegistry,
    cls: ClassId,
    options: ClassConfig,
) -> Result<Option<Surface>, ClassError> {
    apply_mixins(registry, cls, &options.mixins)?;

    let entry = registry.entry(cls)?;
    let statics = entry.statics.clone();
    let prototype = entry.prototype.clone();
    let parent_prototype = prototype.parent().cloned();
    let parent_config = entry.parent.and_then(|parent| registry.config(parent));

    let empty = ClassConfig::default();
    let inherited = parent_config.as_deref().unwrap_or(&empty);

    let prototype_attrs = promote_prototype_attrs(
        &statics,
        &prototype,
        inherited.prototype_attrs.as_deref().unwrap_or_default(),
        options.prototype_attrs.as_deref().unwrap_or_default(),
    );

    let skip = options
        .skip_parent_automerge_attrs
        .as_ref()
        .or(inherited.skip_parent_automerge_attrs.as_ref());
    let parent_automerge = inherited.automerge_attrs.as_deref().unwrap_or_default();
    let own_automerge = options.automerge_attrs.as_deref().unwrap_or_default();

    let mut parent_seen = Vec::with_capacity(parent_automerge.len());
    for attr in parent_automerge {
        parent_seen.push(attr.clone());
        if skip.is_some_and(|skip| skip.skips(attr)) {
            continue;
        }
        merge_attr(&statics, &prototype, parent_prototype.as_ref(), attr);
    }
    let mut class_seen = Vec::with_capacity(own_automerge.len());
    for attr in own_automerge {
        if parent_seen.contains(attr) || class_seen.contains(attr) {
            continue;
        }
        class_seen.push(attr.clone());
        if skip.is_some_and(|skip| skip.skips(attr)) {
            continue;
        }
        merge_attr(&statics, &prototype, parent_prototype.as_ref(), attr);
    }
    let automerge_attrs = (skip.is_some()
        || (!parent_automerge.is_empty() && !own_automerge.is_empty()))
    .then(|| {
        parent_seen.extend(class_seen);
        parent_seen
    });

    let parent_has_config = parent_config.as_ref().is_some_and(|config| !config.is_empty());
    let record = match parent_config {
        Some(parent) if parent_has_config && !options.is_empty() => {
            let mut record = options.layered_over(&parent);
            if prototype_attrs.is_some() {
                record.prototype_attrs = prototype_attrs;
            }
            if automerge_attrs.is_some() {
                record.automerge_attrs = automerge_attrs;
            }
            if record.automerge_attrs.as_ref().is_some_and(Vec::is_empty) {
                record.automerge_attrs = None;
            }
            Arc::new(record)
        }
        Some(parent) if parent_has_config => parent,
        _ => Arc::new(options),
    };

    tracing::trace!(
        class = %registry.display_name(cls),
        shared = Arc::strong_count(&record) > 1,
        "prepared class configuration"
    );
    registry.entry_mut(cls)?.config = Some(record);

    Ok(parent_prototype)
}

/// Copies each promoted attribute's static value onto `prototype` unless the
/// prototype already declares it.
///
/// Returns the combined name list when both the parent and the class
/// contributed names; otherwise the record inherits whichever list exists.
fn promote_prototype_attrs(
    statics: &Surface,
    prototype: &Surface,
    inherited: &[String],
    own: &[String],
) -> Option<Vec<String>> {
    let mut seen: IndexSet<&String> = IndexSet::new();
    for attr in inherited.iter().chain(own) {
        if !seen.insert(attr) {
            continue;
        }
        if prototype.has_own(attr) {
            continue;
        }
        if let Some(member) = statics.get(attr) {
            prototype.set(attr.clone(), member);
        }
    }

    (!inherited.is_empty() && !own.is_empty())
        .then(|| seen.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassDef;
    use serde_json::json;

    #[test]
    fn promotion_skips_members_the_prototype_declares() {
        let statics = Surface::root();
        let prototype = Surface::root();
        statics.set("a", json!("static"));
        statics.set("b", json!("static"));
        prototype.set("b", json!("own"));

        let combined = promote_prototype_attrs(
            &statics,
            &prototype,
            &["a".to_string()],
            &["b".to_string(), "a".to_string()],
        );

        assert_eq!(prototype.get_value("a"), Some(json!("static")));
        assert_eq!(prototype.get_value("b"), Some(json!("own")));
        assert_eq!(combined, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn promotion_of_absent_static_is_a_noop() {
        let statics = Surface::root();
        let prototype = Surface::root();
        let combined = promote_prototype_attrs(&statics, &prototype, &[], &["x".to_string()]);
        assert!(!prototype.has_own("x"));
        assert_eq!(combined, None);
    }

    #[test]
    fn class_without_options_or_parent_record_gets_its_options() {
        let mut registry = ClassRegistry::new();
        let cls = registry.define(ClassDef::new("Lonely")).unwrap();
        let parent_surface = prepare_subclass(&mut registry, cls, ClassConfig::new()).unwrap();
        assert!(parent_surface.is_none());
        assert!(registry.config(cls).unwrap().is_empty());
    }

    #[test]
    fn parent_record_is_shared_without_options() {
        let mut registry = ClassRegistry::new();
        let parent = registry.define(ClassDef::new("Parent")).unwrap();
        prepare_subclass(
            &mut registry,
            parent,
            ClassConfig::new().with_automerge_attrs(["h"]),
        )
        .unwrap();
        let child = registry.define(ClassDef::new("Child").extends(parent)).unwrap();
        let parent_surface = prepare_subclass(&mut registry, child, ClassConfig::new()).unwrap();

        assert!(Arc::ptr_eq(
            &registry.config(parent).unwrap(),
            &registry.config(child).unwrap()
        ));
        assert!(parent_surface.unwrap().ptr_eq(&registry.prototype(parent).unwrap()));
    }

    #[test]
    fn empty_automerge_list_is_dropped_from_layered_record() {
        let mut registry = ClassRegistry::new();
        let parent = registry.define(ClassDef::new("Parent")).unwrap();
        prepare_subclass(&mut registry, parent, ClassConfig::new().with_name("P")).unwrap();
        let child = registry.define(ClassDef::new("Child").extends(parent)).unwrap();
        prepare_subclass(
            &mut registry,
            child,
            ClassConfig::new().with_skip_all_parent_automerge_attrs(),
        )
        .unwrap();

        let record = registry.config(child).unwrap();
        assert!(record.automerge_attrs.is_none());
        assert_eq!(record.name.as_deref(), Some("P"));
    }
}
