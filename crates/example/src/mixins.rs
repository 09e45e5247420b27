//! Capabilities shared by several framework classes.

use lineage_class::mixin::{Member, Members, Mixin};
use lineage_object::{Function, Value};
use serde::Serialize;
use serde_json::json;

/// Sort direction for [`Sortable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Keeps collection models ordered by one attribute.
#[derive(Debug, Clone, Mixin)]
#[mixin(methods = "Sortable::methods")]
pub struct Sortable {
    /// Attribute the models are ordered by.
    pub comparator: String,
    /// Direction, shared by every instance of the class.
    #[mixin(static_member)]
    pub order: SortOrder,
}

impl Sortable {
    fn methods(&self, members: &mut Members) {
        let descending = self.order == SortOrder::Descending;
        members.insert(
            "sort".into(),
            Member::Function(Function::named("sort", move |this, _| {
                let key = this
                    .get_value("comparator")
                    .and_then(|key| key.as_str().map(str::to_owned))
                    .unwrap_or_default();
                let mut models = this
                    .get_value("models")
                    .and_then(|models| models.as_array().cloned())
                    .unwrap_or_default();
                models.sort_by(|a, b| compare(a.get(&key), b.get(&key)));
                if descending {
                    models.reverse();
                }
                let models = Value::Array(models);
                this.set("models", models.clone());
                models
            })),
        );
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> core::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(core::cmp::Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Lists attributes every model must carry.
#[derive(Debug, Clone, Mixin)]
#[mixin(name = "Validates", methods = "Validates::methods")]
pub struct Validates {
    /// Attribute names that must be present and non-null.
    pub required: Vec<String>,
}

impl Validates {
    fn methods(&self, members: &mut Members) {
        members.insert(
            "validate".into(),
            Member::Function(Function::named("validate", |this, _| {
                let attributes = this.get_value("attributes").unwrap_or_else(|| json!({}));
                let missing: Vec<Value> = this
                    .get_value("required")
                    .and_then(|required| required.as_array().cloned())
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|key| {
                        key.as_str()
                            .is_none_or(|key| attributes.get(key).is_none_or(Value::is_null))
                    })
                    .collect();
                Value::Array(missing)
            })),
        );
    }
}
