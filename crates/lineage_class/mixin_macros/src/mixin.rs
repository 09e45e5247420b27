//! Derive macro for the `Mixin` trait.

use crate::crate_path::lineage_class_path;
use darling::ast::Data;
use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Parsed struct-level attributes.
#[derive(FromDeriveInput)]
#[darling(attributes(mixin), supports(struct_named))]
struct MixinArgs {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<(), MixinField>,

    /// Mixin name. Defaults to the struct name.
    #[darling(default)]
    name: Option<String>,

    /// Contributes function members.
    #[darling(default)]
    methods: Option<syn::Path>,
}

/// Parsed field-level attributes.
#[derive(FromField)]
#[darling(attributes(mixin))]
struct MixinField {
    ident: Option<syn::Ident>,

    #[darling(default)]
    rename: Option<String>,

    #[darling(default)]
    skip: bool,

    #[darling(default)]
    static_member: bool,
}

/// Implementation of the `#[derive(Mixin)]` macro.
pub(crate) fn derive_mixin(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match MixinArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();
    let mixin_name = args.name.clone().unwrap_or_else(|| name.to_string());
    let krate = lineage_class_path();

    let fields = match &args.data {
        Data::Struct(fields) => fields.fields.iter().collect::<Vec<_>>(),
        Data::Enum(_) => Vec::new(),
    };

    let pair = |field: &&MixinField| {
        let ident = field.ident.as_ref()?;
        let key = field.rename.clone().unwrap_or_else(|| ident.to_string());
        Some(quote! {
            (
                ::std::string::String::from(#key),
                #krate::mixin::Member::Data(
                    #krate::__private::to_value(&self.#ident).unwrap_or_default(),
                ),
            )
        })
    };
    let instance_pairs: Vec<_> = fields
        .iter()
        .filter(|field| !field.skip && !field.static_member)
        .filter_map(pair)
        .collect();
    let static_pairs: Vec<_> = fields
        .iter()
        .filter(|field| !field.skip && field.static_member)
        .filter_map(pair)
        .collect();

    let members = |pairs: &[proc_macro2::TokenStream]| {
        let len = pairs.len();
        quote! {
            {
                let pairs: [(::std::string::String, #krate::mixin::Member); #len] = [#(#pairs),*];
                pairs.into_iter().collect::<#krate::mixin::Members>()
            }
        }
    };
    let instance_members = members(&instance_pairs);
    let static_members = members(&static_pairs);

    let instance_body = match &args.methods {
        Some(path) => quote! {
            let mut members = #instance_members;
            #path(self, &mut members);
            members
        },
        None => instance_members,
    };

    let expanded = quote! {
        impl #impl_generics #krate::mixin::Mixin for #name #ty_generics #where_clause {
            fn mixin_name(&self) -> &str {
                #mixin_name
            }

            fn instance_members(&self) -> #krate::mixin::Members {
                #instance_body
            }

            fn static_members(&self) -> #krate::mixin::Members {
                #static_members
            }
        }
    };

    expanded.into()
}
