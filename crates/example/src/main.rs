//! Demo of the example framework.
//!
//! Defines a small application on top of the framework's wrapped bases,
//! constructs a few instances and logs what each level contributed.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug demo
//! ```

use example::{Framework, SortOrder, Sortable, Validates};
use lineage_class::prelude::*;
use lineage_core::{TracingConfig, TracingFormat};
use serde_json::json;

fn main() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    TracingConfig::new()
        .with_format(TracingFormat::Compact)
        .with_env_filter(filter)
        .init_or_ignore();

    if let Err(err) = run() {
        tracing::error!(%err, "demo failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ClassError> {
    let mut framework = Framework::new()?;

    // Models: defaults accumulate down the chain.
    let user = framework.define_model(
        "User",
        framework.model(),
        json!({"role": "guest", "active": true}),
    )?;
    let admin = framework.define(
        ClassDef::new("Admin")
            .extends(user)
            .with_static("defaults", json!({"role": "admin", "permissions": ["all"]})),
        ClassConfig::new().with_mixin(MixinSource::capability(Validates {
            required: vec!["name".into(), "email".into()],
        })),
    )?;

    let mut ada = framework.create(admin, &[json!({"id": 1, "name": "Ada"})])?;
    tracing::info!(
        attributes = %ada.call("to_json", &[]).unwrap_or_default(),
        id = %ada.get_value("id").unwrap_or_default(),
        missing = %ada.call("validate", &[]).unwrap_or_default(),
        "constructed admin"
    );

    // Collections: a capability mixin contributes a method and a static.
    let users = framework.define(
        ClassDef::new("Users")
            .extends(framework.collection())
            .with_static("model", json!("User")),
        ClassConfig::new().with_mixin(MixinSource::capability(Sortable {
            comparator: "name".into(),
            order: SortOrder::Ascending,
        })),
    )?;
    let mut roster = framework.create(
        users,
        &[json!([{"name": "Grace"}, {"name": "Ada"}, {"name": "Barbara"}])],
    )?;
    roster.call("sort", &[]);
    tracing::info!(
        model = %roster.get_value("model").unwrap_or_default(),
        names = %roster.call("pluck", &[json!("name")]).unwrap_or_default(),
        "sorted collection"
    );

    // Views: the parent's events map is merged into a subclass's events
    // function.
    let list_view = framework.define(
        ClassDef::new("ListView")
            .extends(framework.view())
            .with_static("tag_name", json!("ul"))
            .with_member("events", json!({"click .item": "select"})),
        ClassConfig::new().with_automerge_attrs(["events"]),
    )?;
    let editable = framework.define(
        ClassDef::new("EditableListView")
            .extends(list_view)
            .with_method("events", |_, _| json!({"dblclick .item": "edit"})),
        ClassConfig::new(),
    )?;
    let mut view = framework.create(editable, &[json!({"el": "#todos"})])?;
    tracing::info!(
        el = %view.get_value("el").unwrap_or_default(),
        bound = %view.get_value("bound_events").unwrap_or_default(),
        html = %view.call("render", &[]).unwrap_or_default(),
        "rendered view"
    );

    // Legacy-style subclassing still works against a wrapped base.
    let model = framework.model();
    let router = framework.registry_mut().extend(
        model,
        lineage_object::members([("url_root", json!("/api/routes"))]),
        Members::new(),
        None,
    )?;
    let route = framework.create(router, &[json!({"id": "home"})])?;
    tracing::info!(url_root = %route.get_value("url_root").unwrap_or_default(), "legacy extend");

    // Integration mistakes are reported, not silently tolerated.
    if let Err(err) = framework.create(framework.model(), &[]) {
        tracing::warn!(%err, "expected failure");
    }
    let forgotten = framework
        .registry_mut()
        .define(ClassDef::new("Forgotten").extends(admin))?;
    if let Err(err) = framework.create(forgotten, &[]) {
        tracing::warn!(%err, "expected failure");
    }

    for class in [user, admin, users, editable] {
        let info = framework.registry().describe(class)?;
        match serde_json::to_string(&info) {
            Ok(json) => tracing::info!(class = %info.name, %json, "class summary"),
            Err(err) => tracing::warn!(%err, "could not serialize class summary"),
        }
    }
    Ok(())
}
