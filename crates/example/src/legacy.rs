//! The legacy, prototype-style classes the framework started from.
//!
//! These know nothing about wrappers: they are defined with
//! [`ClassDef::legacy`] constructors (or as plain class-like roots) exactly as
//! the framework shipped them.

use crate::result_of;
use lineage_class::prelude::*;
use serde_json::json;

/// Record with `attributes` built from the constructor argument over
/// `defaults`.
pub(crate) fn legacy_model(registry: &mut ClassRegistry) -> Result<ClassId, ClassError> {
    registry.define(
        ClassDef::new("LegacyModel")
            .legacy(Function::named("LegacyModel", |this, args| {
                let defaults = result_of(this, "defaults");
                let given = args.first().cloned().unwrap_or(Value::Null);
                let attributes = defaults_union(&given, &defaults);

                let id = this
                    .get_value("id_attribute")
                    .and_then(|key| key.as_str().and_then(|key| attributes.get(key).cloned()));
                if let Some(id) = id {
                    this.set("id", id);
                }
                this.set("attributes", attributes);
                Value::Null
            }))
            .with_static("defaults", json!({}))
            .with_static("id_attribute", json!("id"))
            .with_method("get", |this, args| {
                let key = args.first().and_then(Value::as_str).unwrap_or_default();
                this.get_value("attributes")
                    .and_then(|attributes| attributes.get(key).cloned())
                    .unwrap_or(Value::Null)
            })
            .with_method("set", |this, args| {
                let mut attributes = this.get_value("attributes").unwrap_or_else(|| json!({}));
                if let (Some(key), Some(map)) = (
                    args.first().and_then(Value::as_str),
                    attributes.as_object_mut(),
                ) {
                    map.insert(key.to_string(), args.get(1).cloned().unwrap_or(Value::Null));
                }
                this.set("attributes", attributes);
                Value::Null
            })
            .with_method("to_json", |this, _| {
                this.get_value("attributes").unwrap_or_else(|| json!({}))
            }),
    )
}

/// Ordered list of model attribute maps.
pub(crate) fn legacy_collection(registry: &mut ClassRegistry) -> Result<ClassId, ClassError> {
    registry.define(
        ClassDef::new("LegacyCollection")
            .legacy(Function::named("LegacyCollection", |this, args| {
                let models = match args.first() {
                    Some(Value::Array(models)) => Value::Array(models.clone()),
                    _ => json!([]),
                };
                this.set("models", models);
                Value::Null
            }))
            .with_static("model", Value::Null)
            .with_method("length", |this, _| {
                let len = this
                    .get_value("models")
                    .and_then(|models| models.as_array().map(Vec::len))
                    .unwrap_or(0);
                json!(len)
            })
            .with_method("pluck", |this, args| {
                let key = args.first().and_then(Value::as_str).unwrap_or_default();
                let values = this
                    .get_value("models")
                    .and_then(|models| models.as_array().cloned())
                    .unwrap_or_default()
                    .iter()
                    .map(|model| model.get(key).cloned().unwrap_or(Value::Null))
                    .collect();
                Value::Array(values)
            }),
    )
}

/// Class-like view root. It has no legacy constructor, so the wrapper must be
/// given its `init_object`.
pub(crate) fn view_root(registry: &mut ClassRegistry) -> Result<ClassId, ClassError> {
    registry.define(
        ClassDef::new("ViewRoot")
            .with_static("tag_name", json!("div"))
            .with_method("render", |this, _| {
                json!(format!(
                    "<{tag}></{tag}>",
                    tag = this
                        .get_value("tag_name")
                        .and_then(|tag| tag.as_str().map(str::to_owned))
                        .unwrap_or_else(|| "div".to_string())
                ))
            }),
    )
}

/// Initialization hook for views: stores `options`, resolves `el` and binds
/// every entry of `events`.
pub(crate) fn view_init() -> Function {
    Function::named("init_view", |this, args| {
        let options = args.first().cloned().unwrap_or_else(|| json!({}));
        let el = options
            .get("el")
            .cloned()
            .or_else(|| this.get_value("tag_name"))
            .unwrap_or_else(|| json!("div"));

        let bound: Vec<Value> = result_of(this, "events")
            .as_object()
            .map(|events| {
                events
                    .iter()
                    .map(|(event, handler)| json!(format!("{event} -> {}", handler.as_str().unwrap_or("?"))))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(el = %el, bound = bound.len(), "view initialized");
        this.set("options", options);
        this.set("el", el);
        this.set("bound_events", Value::Array(bound));
        Value::Null
    })
}
