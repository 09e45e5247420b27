//! Members stored on surfaces and instances.

use crate::function::Function;
use indexmap::IndexMap;

/// Plain dynamic data.
pub type Value = serde_json::Value;

/// A plain keyed structure.
pub type Map = serde_json::Map<String, Value>;

/// An ordered member table.
pub type Members = IndexMap<String, Member>;

/// Member key under which the engine stores a wrapper's identity token.
pub const OBJECT_ID_KEY: &str = "object_id";

/// Member key of the single initialization hook run after construction.
pub const INIT_OBJECT_KEY: &str = "init_object";

/// A single named member: either data or a callable.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// A plain value.
    Data(Value),
    /// A callable computing a value from a receiver and arguments.
    Function(Function),
}

impl Member {
    /// Returns the value if this is a data member.
    #[must_use]
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Function(_) => None,
        }
    }

    /// Returns the function if this is a callable member.
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            Self::Data(_) => None,
        }
    }

    /// Consumes the member and returns its value if it is data.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Function(_) => None,
        }
    }

    /// Returns `true` for callable members.
    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<Function> for Member {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

/// Builds a [`Members`] table from key/member pairs.
///
/// ```
/// use lineage_object::{members, Member};
/// use serde_json::json;
///
/// let table = members([("a", json!(1)), ("b", json!("two"))]);
/// assert_eq!(table.get("a"), Some(&Member::Data(json!(1))));
/// ```
pub fn members<K, M>(pairs: impl IntoIterator<Item = (K, M)>) -> Members
where
    K: Into<String>,
    M: Into<Member>,
{
    pairs
        .into_iter()
        .map(|(key, member)| (key.into(), member.into()))
        .collect()
}
