//! Per-class configuration.
//!
//! [`ClassConfig`] plays two roles. Passed to a wrapper factory it is the
//! caller's *options*; once a class has been prepared, the registry stores
//! the resolved *record* as an `Arc<ClassConfig>`. Records are never mutated
//! after they are stored. A subclass that introduces no options shares its
//! parent's record by reference.
//!
//! Name lists round-trip through JSON, so class options can live in
//! configuration files:
//!
//! ```
//! use lineage_class::config::ClassConfig;
//!
//! let options = ClassConfig::from_json(r#"{
//!     "automerge_attrs": ["defaults"],
//!     "skip_parent_automerge_attrs": ["events"],
//!     "prototype_attrs": ["id_attribute"]
//! }"#).unwrap();
//!
//! assert_eq!(options.automerge_attrs.as_deref(), Some(&["defaults".to_string()][..]));
//! ```

use crate::error::ClassError;
use crate::mixin::MixinSource;
use lineage_object::{Function, Value};
use serde::{Deserialize, Serialize};

/// Which of the parent's auto-merge attributes a subclass opts out of.
///
/// In JSON, `true` means [`All`](Self::All), a list of names means
/// [`Attrs`](Self::Attrs) and `false` means an empty list, which clears a
/// skip inherited from an ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SkipParentRepr", into = "SkipParentRepr")]
pub enum SkipParent {
    /// Merge none of the parent's attributes.
    All,
    /// Merge every parent attribute except these.
    Attrs(Vec<String>),
}

impl SkipParent {
    /// Returns `true` if `attr` must not be merged with the parent's value.
    #[must_use]
    pub fn skips(&self, attr: &str) -> bool {
        match self {
            Self::All => true,
            Self::Attrs(attrs) => attrs.iter().any(|name| name == attr),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SkipParentRepr {
    Flag(bool),
    Attrs(Vec<String>),
}

impl From<SkipParentRepr> for SkipParent {
    fn from(repr: SkipParentRepr) -> Self {
        match repr {
            SkipParentRepr::Flag(true) => Self::All,
            SkipParentRepr::Flag(false) => Self::Attrs(Vec::new()),
            SkipParentRepr::Attrs(attrs) => Self::Attrs(attrs),
        }
    }
}

impl From<SkipParent> for SkipParentRepr {
    fn from(skip: SkipParent) -> Self {
        match skip {
            SkipParent::All => Self::Flag(true),
            SkipParent::Attrs(attrs) => Self::Attrs(attrs),
        }
    }
}

/// Options for a wrapper factory, and the resolved record stored per class.
///
/// # Fields
///
/// - `automerge_attrs` - attributes combined with the parent's same-named
///   attribute instead of shadowing it
/// - `skip_parent_automerge_attrs` - inherited auto-merge attributes this
///   class (and its descendants) keep unmerged
/// - `prototype_attrs` - static attributes also exposed on the
///   instance-facing surface
/// - `mixins` - sources applied once, when the declaring class is prepared
/// - `name` - display name of the produced wrapper
/// - `init_object` - initialization hook (base wrappers only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// Attribute names eligible for auto-merging with the parent's values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automerge_attrs: Option<Vec<String>>,

    /// Parent auto-merge attributes to leave unmerged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_parent_automerge_attrs: Option<SkipParent>,

    /// Static attribute names promoted onto the instance-facing surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prototype_attrs: Option<Vec<String>>,

    /// Mixin sources, applied in order.
    #[serde(skip)]
    pub mixins: Vec<MixinSource>,

    /// Explicit display name for the produced wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Explicit initialization hook.
    #[serde(skip)]
    pub init_object: Option<Function>,
}

impl ClassConfig {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::InvalidConfig`] if the document does not match
    /// the options schema.
    pub fn from_json(json: &str) -> Result<Self, ClassError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the name lists and display name to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::InvalidConfig`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, ClassError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Sets the auto-merge attributes.
    #[must_use]
    pub fn with_automerge_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.automerge_attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    /// Opts out of merging the named parent attributes.
    #[must_use]
    pub fn with_skip_parent_automerge_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_parent_automerge_attrs = Some(SkipParent::Attrs(
            attrs.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Opts out of merging any parent attribute.
    #[must_use]
    pub fn with_skip_all_parent_automerge_attrs(mut self) -> Self {
        self.skip_parent_automerge_attrs = Some(SkipParent::All);
        self
    }

    /// Sets the attributes promoted onto the instance-facing surface.
    #[must_use]
    pub fn with_prototype_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prototype_attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a mixin source.
    #[must_use]
    pub fn with_mixin(mut self, mixin: impl Into<MixinSource>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    /// Sets the display name of the produced wrapper.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the initialization hook.
    #[must_use]
    pub fn with_init_object(mut self, init_object: Function) -> Self {
        self.init_object = Some(init_object);
        self
    }

    /// Returns `true` when no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.automerge_attrs.is_none()
            && self.skip_parent_automerge_attrs.is_none()
            && self.prototype_attrs.is_none()
            && self.mixins.is_empty()
            && self.name.is_none()
            && self.init_object.is_none()
    }

    /// Returns `parent` with every option set on `self` taking precedence.
    #[must_use]
    pub fn layered_over(&self, parent: &ClassConfig) -> ClassConfig {
        let mut layered = parent.clone();
        if self.automerge_attrs.is_some() {
            layered.automerge_attrs.clone_from(&self.automerge_attrs);
        }
        if self.skip_parent_automerge_attrs.is_some() {
            layered
                .skip_parent_automerge_attrs
                .clone_from(&self.skip_parent_automerge_attrs);
        }
        if self.prototype_attrs.is_some() {
            layered.prototype_attrs.clone_from(&self.prototype_attrs);
        }
        if !self.mixins.is_empty() {
            layered.mixins.clone_from(&self.mixins);
        }
        if self.name.is_some() {
            layered.name.clone_from(&self.name);
        }
        if self.init_object.is_some() {
            layered.init_object.clone_from(&self.init_object);
        }
        layered
    }
}
