//! Shared callables.
//!
//! A [`Function`] is the dynamic arm of a member: instead of holding a value,
//! it computes one when invoked with a receiver and arguments. Whether a
//! member is a function is decided by whoever declares it, so code that
//! combines members can match on [`Member`](crate::Member) rather than probe
//! the shape of a result at run time.

use crate::instance::Instance;
use crate::member::Value;
use core::fmt;
use std::sync::Arc;

type RawFunction = dyn Fn(&mut Instance, &[Value]) -> Value + Send + Sync;

/// A shared, reference-counted callable.
///
/// Cloning a `Function` clones the handle, not the closure. Two functions are
/// equal only when they are the same allocation.
///
/// # Example
///
/// ```
/// use lineage_object::{Function, Instance, Surface, ClassId};
/// use serde_json::json;
///
/// let greet = Function::new(|this, args| {
///     this.set("greeted", args.first().cloned().unwrap_or_default());
///     json!("hello")
/// });
///
/// let mut instance = Instance::new(ClassId::new(0), Surface::root());
/// assert_eq!(greet.call(&mut instance, &[json!("bob")]), json!("hello"));
/// assert_eq!(instance.get_value("greeted"), Some(json!("bob")));
/// ```
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    inner: Arc<RawFunction>,
}

impl Function {
    /// Wraps a closure as a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: None,
            inner: Arc::new(f),
        }
    }

    /// Wraps a closure as a function with a debug name.
    pub fn named<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            inner: Arc::new(f),
        }
    }

    /// A function that ignores its receiver and arguments and returns `null`.
    #[must_use]
    pub fn noop() -> Self {
        Self::named("noop", |_, _| Value::Null)
    }

    /// Returns the debug name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invokes the function with `receiver` as `this`.
    pub fn call(&self, receiver: &mut Instance, args: &[Value]) -> Value {
        (self.inner)(receiver, args)
    }

    /// Returns `true` if both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Function({name})"),
            None => f.write_str("Function(<anonymous>)"),
        }
    }
}
