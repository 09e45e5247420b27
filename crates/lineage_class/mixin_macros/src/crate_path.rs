//! Locates `lineage_class` from the crate invoking `#[derive(Mixin)]`.
//!
//! A consumer reaches the class layer either directly (under any rename in
//! its `Cargo.toml`) or through the `lineage` umbrella's re-export. The
//! derive resolves which one applies once per expansion and emits paths
//! from there.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::Ident;

const CLASS_CRATE: &str = "lineage_class";
const UMBRELLA_CRATE: &str = "lineage";

/// Where generated code finds `lineage_class`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassCrate {
    /// `lineage_class` itself, or a dependency on it under `name`.
    Direct(String),
    /// The umbrella crate, reached as `name`.
    Umbrella(String),
    /// Code inside the umbrella crate.
    UmbrellaItself,
}

impl ClassCrate {
    fn locate() -> Self {
        let direct = crate_name(CLASS_CRATE).ok().map(|found| match found {
            FoundCrate::Itself => Self::Direct(CLASS_CRATE.to_string()),
            FoundCrate::Name(name) => Self::Direct(name),
        });
        let umbrella = || {
            crate_name(UMBRELLA_CRATE).ok().map(|found| match found {
                FoundCrate::Itself => Self::UmbrellaItself,
                FoundCrate::Name(name) => Self::Umbrella(name),
            })
        };
        direct
            .or_else(umbrella)
            .unwrap_or_else(|| Self::Direct(CLASS_CRATE.to_string()))
    }
}

impl ToTokens for ClassCrate {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let class_crate = Ident::new(CLASS_CRATE, Span::call_site());
        tokens.extend(match self {
            Self::Direct(name) => {
                let name = Ident::new(name, Span::call_site());
                quote!(#name)
            }
            Self::Umbrella(name) => {
                let name = Ident::new(name, Span::call_site());
                quote!(#name::#class_crate)
            }
            Self::UmbrellaItself => quote!(crate::#class_crate),
        });
    }
}

/// Path prefix for `lineage_class` items in generated code.
pub(crate) fn lineage_class_path() -> TokenStream {
    ClassCrate::locate().into_token_stream()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(location: &ClassCrate) -> String {
        location.to_token_stream().to_string()
    }

    #[test]
    fn renders_each_location() {
        assert_eq!(render(&ClassCrate::Direct("classes".into())), "classes");
        assert_eq!(
            render(&ClassCrate::Umbrella("lineage".into())),
            "lineage :: lineage_class"
        );
        assert_eq!(render(&ClassCrate::UmbrellaItself), "crate :: lineage_class");
    }
}
