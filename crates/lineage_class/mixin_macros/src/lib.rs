//! Procedural macros for `lineage_class` mixins.
//!
//! This crate provides `#[derive(Mixin)]` for turning a named capability
//! struct into a mixin source.

mod crate_path;
mod mixin;

use proc_macro::TokenStream;

/// Derive macro for the `Mixin` trait.
///
/// Generates an implementation of `lineage_class::mixin::Mixin` whose members
/// are the struct's fields, converted with `serde_json::to_value`. A field
/// that fails to convert contributes `null`.
///
/// # Attributes
///
/// On the struct:
///
/// - `name` (optional): The mixin name. Defaults to the struct name.
/// - `methods` (optional): Path to a `fn(&Self, &mut Members)` that adds
///   function members to the instance-facing members.
///
/// On fields:
///
/// - `rename = "..."`: Member key. Defaults to the field name.
/// - `static_member`: Copy onto the static surface instead.
/// - `skip`: Do not copy this field.
///
/// # Example
///
/// ```ignore
/// use lineage_class::mixin::{Members, Mixin};
///
/// #[derive(Mixin)]
/// #[mixin(name = "Sortable", methods = "Sortable::methods")]
/// struct Sortable {
///     comparator: String,
/// }
///
/// impl Sortable {
///     fn methods(&self, members: &mut Members) {
///         // insert function members
///     }
/// }
/// ```
#[proc_macro_derive(Mixin, attributes(mixin))]
pub fn derive_mixin(input: TokenStream) -> TokenStream {
    mixin::derive_mixin(input)
}
