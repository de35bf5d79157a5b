//! Derive macros for the Pocket Todo state container
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `pocket_todo_core::action::Action` for an
//!   action enum, naming each variant for tracing and metrics
//!
//! # Example
//!
//! ```ignore
//! use pocket_todo_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TaskAction {
//!     Create { title: String },
//!     Wipe,
//! }
//!
//! #[derive(Action, Clone, Debug)]
//! enum AppAction {
//!     #[nested]
//!     Tasks(TaskAction),
//! }
//!
//! // Generated:
//! assert_eq!(TaskAction::Wipe.name(), "Wipe");
//! assert_eq!(AppAction::Tasks(TaskAction::Wipe).name(), "Wipe");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Implements `pocket_todo_core::action::Action`, whose `name()` returns the
/// variant name as a `&'static str`.
///
/// # Attributes
///
/// - `#[nested]` - On a single-field tuple variant wrapping another action
///   enum: `name()` delegates to the wrapped action, so a routed action is
///   reported by the operation it performs rather than by its route.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type or an enum without variants
/// - `#[nested]` is placed on a variant that does not have exactly one
///   unnamed field
#[proc_macro_derive(Action, attributes(nested))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_action(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Builds the `Action` impl, or the error to report at the offending span
fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    if data_enum.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] needs at least one variant",
        ));
    }

    let arms = data_enum
        .variants
        .iter()
        .map(name_arm)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::pocket_todo_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }
    })
}

/// One `match` arm of `name()` for `variant`
fn name_arm(variant: &Variant) -> syn::Result<TokenStream2> {
    let variant_name = &variant.ident;
    let label = variant_name.to_string();

    if has_attribute(&variant.attrs, "nested") {
        return match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Ok(quote! {
                Self::#variant_name(inner) => ::pocket_todo_core::action::Action::name(inner),
            }),
            _ => Err(syn::Error::new_spanned(
                variant,
                "#[nested] requires a tuple variant with exactly one field",
            )),
        };
    }

    Ok(match &variant.fields {
        Fields::Named(_) => quote! { Self::#variant_name { .. } => #label, },
        Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #label, },
        Fields::Unit => quote! { Self::#variant_name => #label, },
    })
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use syn::parse_quote;

    fn error_of(input: &DeriveInput) -> String {
        expand_action(input).unwrap_err().to_string()
    }

    #[test]
    fn expands_plain_and_nested_variants() {
        let input: DeriveInput = parse_quote! {
            enum AppAction {
                Tasks(TaskAction),
                #[nested]
                Ui(UiAction),
                Submit { title: String },
                Reset,
            }
        };

        let expanded = expand_action(&input).unwrap().to_string();

        assert!(expanded.contains("\"Tasks\""));
        assert!(expanded.contains("\"Submit\""));
        assert!(expanded.contains("\"Reset\""));
        assert!(!expanded.contains("\"Ui\""));
        assert!(expanded.contains("Action :: name (inner)"));
    }

    #[test]
    fn rejects_structs() {
        let input: DeriveInput = parse_quote! { struct NotAnAction { id: u32 } };
        assert_eq!(error_of(&input), "#[derive(Action)] can only be used on enums");
    }

    #[test]
    fn rejects_empty_enums() {
        let input: DeriveInput = parse_quote! { enum Never {} };
        assert_eq!(error_of(&input), "#[derive(Action)] needs at least one variant");
    }

    #[test]
    fn rejects_nested_without_single_field() {
        let input: DeriveInput = parse_quote! {
            enum AppAction {
                #[nested]
                Both(TaskAction, UiAction),
            }
        };
        assert_eq!(
            error_of(&input),
            "#[nested] requires a tuple variant with exactly one field"
        );
    }
}
