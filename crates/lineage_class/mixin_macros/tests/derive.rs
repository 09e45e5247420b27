//! Tests for `#[derive(Mixin)]`.

use lineage_class::mixin::{Member, Members, Mixin};
use lineage_class::prelude::*;
use serde_json::json;

#[derive(Mixin)]
struct Plain {
    label: String,
    count: u32,
}

#[derive(Mixin)]
#[mixin(name = "Paging", methods = "Paging::methods")]
struct Paging {
    #[mixin(rename = "per_page")]
    size: usize,
    #[mixin(static_member)]
    max_size: usize,
    #[mixin(skip)]
    #[expect(dead_code, reason = "skipped fields are never read")]
    cursor: Option<String>,
}

impl Paging {
    fn methods(&self, members: &mut Members) {
        let size = self.size;
        members.insert(
            "page_of".into(),
            Member::Function(Function::named("page_of", move |_, args| {
                let index = args.first().and_then(Value::as_u64).unwrap_or(0);
                json!(index / size as u64)
            })),
        );
    }
}

#[test]
fn name_defaults_to_struct_name() {
    let plain = Plain {
        label: "x".into(),
        count: 2,
    };
    assert_eq!(plain.mixin_name(), "Plain");

    let members = plain.instance_members();
    assert_eq!(members.keys().collect::<Vec<_>>(), ["label", "count"]);
    assert_eq!(members["label"], Member::Data(json!("x")));
    assert!(plain.static_members().is_empty());
}

#[test]
fn field_attributes_are_honoured() {
    let paging = Paging {
        size: 20,
        max_size: 100,
        cursor: None,
    };
    assert_eq!(paging.mixin_name(), "Paging");

    let instance = paging.instance_members();
    assert_eq!(instance.get("per_page"), Some(&Member::Data(json!(20))));
    assert!(!instance.contains_key("size"));
    assert!(!instance.contains_key("cursor"));
    assert!(instance.get("page_of").is_some_and(Member::is_function));

    let statics = paging.static_members();
    assert_eq!(statics.get("max_size"), Some(&Member::Data(json!(100))));
}

#[test]
fn derived_mixin_applies_to_a_class() {
    let mut registry = ClassRegistry::new();
    let root = registry.define(ClassDef::new("Root")).unwrap();
    let base = registry.wrap_as_base(root, ClassConfig::new()).unwrap();
    let body = registry.define(ClassDef::new("Feed").extends(base)).unwrap();
    let feed = registry
        .wrap_with(
            body,
            ClassConfig::new().with_mixin(MixinSource::capability(Paging {
                size: 10,
                max_size: 50,
                cursor: None,
            })),
        )
        .unwrap();

    assert_eq!(registry.static_value(feed, "max_size"), Some(json!(50)));
    let mut instance = registry.construct(feed, &[]).unwrap();
    assert_eq!(instance.get_value("per_page"), Some(json!(10)));
    assert_eq!(instance.call("page_of", &[json!(25)]), Some(json!(2)));
}
