//! Derive macro for `redlog`.
//!
//! This crate generates the shape metadata behind `#[derive(Structured)]`. It:
//! - reads `#[sensitive(...)]` and `#[log(...)]` attributes
//! - emits `static` descriptor tables and an index-addressed accessor
//! - emits `LogField` so derived types nest inside each other
//! - emits a `Debug` impl that never prints classified fields
//!
//! It does **not** define classifications or redactors. Those live in the
//! main `redlog` crate and are applied at runtime.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_struct;
mod generics;
mod naming;
mod strategy;
use container::parse_container_options;
use derive_struct::{derive_struct, StructDeriveOutput};
use generics::{add_debug_bounds, add_log_field_bounds};

/// Derives `redlog::Structured`, `redlog::LogField` and a redacted `Debug`
/// for structs.
///
/// # Container Attributes
///
/// - `#[log(rename = "Name")]` - Shape name reported to the extractor. Defaults to the type name.
/// - `#[log(rename_all = "PascalCase")]` - Case convention for emitted field names
///   (`"PascalCase"`, `"camelCase"` or `"snake_case"`).
/// - `#[log(skip_debug)]` - Opt out of `Debug` impl generation. Use this when you need a custom
///   `Debug` implementation.
///
/// # Field Attributes
///
/// - **No annotation**: leaf values are emitted unchanged. Nested `Structured` values are not
///   emitted at all.
/// - `#[sensitive]`: the field holds a nested `Structured` value whose own fields are emitted
///   (with a `field.` path prefix) when the call requests transitive traversal.
/// - `#[sensitive(A, B, ...)]`: classifies the field. Each argument is a type implementing
///   `redlog::DataClassification`; redactors run in the order written. A nested value in a
///   classified field is rendered whole and redacted as one value.
/// - `#[log(rename = "Name")]`: emitted field name.
/// - `#[log(skip)]`: the field is neither emitted nor printed by `Debug`. `PhantomData` fields are
///   skipped automatically.
///
/// Every emitted field type must implement `redlog::LogField`.
///
/// Enums and unions are rejected at compile time.
#[proc_macro_derive(Structured, attributes(sensitive, log))]
pub fn derive_structured(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the redlog crate root.
///
/// Handles crate renaming (e.g., `logs = { package = "redlog", ... }`).
/// Inside `redlog` itself, `::redlog` resolves through its
/// `extern crate self as redlog;`.
fn crate_root() -> TokenStream {
    match crate_name("redlog") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::redlog },
    }
}

fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let options = parse_container_options(&attrs)?;

    let data = match data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`Structured` cannot be derived for enums; log a struct wrapping the variant data instead",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`Structured` cannot be derived for unions",
            ));
        }
    };

    let StructDeriveOutput {
        shape_statics,
        field_arms,
        used_generics,
        debug_body,
        debug_generics,
    } = derive_struct(&ident, &data, &generics, &options)?;

    let crate_root = crate_root();
    let shape_name = options
        .rename
        .clone()
        .unwrap_or_else(|| naming::unraw(&ident));

    let log_generics = add_log_field_bounds(generics.clone(), &used_generics);
    let (impl_generics, ty_generics, where_clause) = log_generics.split_for_impl();
    let debug_generics = add_debug_bounds(generics.clone(), &debug_generics);
    let (debug_impl_generics, debug_ty_generics, debug_where_clause) =
        debug_generics.split_for_impl();

    let debug_impl = if options.skip_debug {
        quote! {}
    } else {
        quote! {
            impl #debug_impl_generics ::core::fmt::Debug for #ident #debug_ty_generics #debug_where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_body
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics #crate_root::Structured for #ident #ty_generics #where_clause {
            fn shape(&self) -> &'static #crate_root::Shape {
                #shape_statics
                static __REDLOG_SHAPE: #crate_root::Shape =
                    #crate_root::Shape::new(#shape_name, &__REDLOG_FIELDS);
                &__REDLOG_SHAPE
            }

            fn field(
                &self,
                index: usize,
            ) -> ::core::result::Result<#crate_root::FieldValue<'_>, #crate_root::ExtractError> {
                match index {
                    #field_arms
                    _ => ::core::result::Result::Err(#crate_root::ExtractError::UnknownField {
                        shape: #shape_name,
                        index,
                    }),
                }
            }
        }

        impl #impl_generics #crate_root::LogField for #ident #ty_generics #where_clause {
            fn to_field(&self) -> #crate_root::FieldValue<'_> {
                #crate_root::FieldValue::Nested(self)
            }
        }

        #debug_impl
    })
}
