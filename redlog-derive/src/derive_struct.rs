//! Struct-specific `Structured` derivation.
//!
//! This module builds the static descriptor tables, the index-addressed
//! accessor arms and the redacted `Debug` body, and collects generic
//! parameters that require trait bounds.

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Fields, Member, Result};

use crate::{
    container::ContainerOptions,
    crate_root,
    generics::{collect_generics_from_type, is_phantom},
    naming::unraw,
    strategy::{parse_field_options, Strategy},
};

pub(crate) struct StructDeriveOutput {
    /// `static` items declared inside `Structured::shape`, ending with
    /// `__REDLOG_FIELDS`.
    pub(crate) shape_statics: TokenStream,
    /// `match index { .. }` arms of `Structured::field`.
    pub(crate) field_arms: TokenStream,
    pub(crate) used_generics: Vec<Ident>,
    pub(crate) debug_body: TokenStream,
    pub(crate) debug_generics: Vec<Ident>,
}

struct FieldInfo<'a> {
    member: Member,
    /// Rust name, used by `Debug`.
    rust_name: String,
    ty: &'a syn::Type,
    span: Span,
    strategy: Strategy,
    /// Name as emitted in property paths.
    emitted_name: String,
}

fn collect_fields<'a>(fields: &'a Fields, options: &ContainerOptions) -> Result<Vec<FieldInfo<'a>>> {
    let mut infos = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let field_options = parse_field_options(&field.attrs)?;
        let (member, rust_name) = field.ident.as_ref().map_or_else(
            || (Member::Unnamed(syn::Index::from(index)), index.to_string()),
            |ident| (Member::Named(ident.clone()), unraw(ident)),
        );
        let strategy = match field_options.strategy {
            Strategy::PassThrough if is_phantom(&field.ty) => Strategy::Skip,
            other => other,
        };
        let emitted_name = field_options.rename.unwrap_or_else(|| {
            options
                .rename_all
                .map_or_else(|| rust_name.clone(), |rule| rule.apply(&rust_name))
        });
        infos.push(FieldInfo {
            member,
            rust_name,
            ty: &field.ty,
            span: field.span(),
            strategy,
            emitted_name,
        });
    }
    Ok(infos)
}

pub(crate) fn derive_struct(
    name: &Ident,
    data: &DataStruct,
    generics: &syn::Generics,
    options: &ContainerOptions,
) -> Result<StructDeriveOutput> {
    let root = crate_root();
    let fields = collect_fields(&data.fields, options)?;

    let mut class_statics = Vec::new();
    let mut descriptors = Vec::new();
    let mut field_arms = Vec::new();
    let mut used_generics = Vec::new();
    let mut debug_generics = Vec::new();
    let mut debug_fields = Vec::new();
    let mut any_skipped = false;

    for field in &fields {
        let span = field.span;
        let member = &field.member;
        let rust_name = &field.rust_name;

        if matches!(field.strategy, Strategy::Skip) {
            any_skipped = true;
            continue;
        }

        let position = descriptors.len();
        let emitted_name = &field.emitted_name;
        let descriptor = match &field.strategy {
            Strategy::PassThrough => quote_spanned! { span =>
                #root::FieldDescriptor::plain(#emitted_name)
            },
            Strategy::Walk => quote_spanned! { span =>
                #root::FieldDescriptor::transitive(#emitted_name)
            },
            Strategy::Classify(paths) => {
                let classes = format_ident!("__REDLOG_CLASSES_{}", position);
                let count = Literal::usize_unsuffixed(paths.len());
                class_statics.push(quote_spanned! { span =>
                    static #classes: [#root::Classification; #count] = [
                        #(<#paths as #root::DataClassification>::CLASSIFICATION),*
                    ];
                });
                quote_spanned! { span =>
                    #root::FieldDescriptor::classified(
                        #emitted_name,
                        #root::ClassificationSet::new(&#classes),
                    )
                }
            }
            Strategy::Skip => continue,
        };
        descriptors.push(descriptor);

        let arm_index = Literal::usize_unsuffixed(position);
        field_arms.push(quote_spanned! { span =>
            #arm_index => ::core::result::Result::Ok(#root::LogField::to_field(&self.#member)),
        });
        collect_generics_from_type(field.ty, generics, &mut used_generics);

        let debug_value = if matches!(field.strategy, Strategy::Classify(_)) {
            quote! { &::core::format_args!("{}", #root::REDACTED_PLACEHOLDER) }
        } else {
            collect_generics_from_type(field.ty, generics, &mut debug_generics);
            quote! { &self.#member }
        };
        debug_fields.push(match member {
            Member::Named(_) => quote_spanned! { span =>
                debug.field(#rust_name, #debug_value);
            },
            Member::Unnamed(_) => quote_spanned! { span =>
                debug.field(#debug_value);
            },
        });
    }

    let count = Literal::usize_unsuffixed(descriptors.len());
    let shape_statics = quote! {
        #(#class_statics)*
        static __REDLOG_FIELDS: [#root::FieldDescriptor; #count] = [#(#descriptors),*];
    };

    let type_name = unraw(name);
    let debug_body = match &data.fields {
        Fields::Named(_) => {
            let finish = if any_skipped {
                quote! { debug.finish_non_exhaustive() }
            } else {
                quote! { debug.finish() }
            };
            quote! {
                let mut debug = f.debug_struct(#type_name);
                #(#debug_fields)*
                #finish
            }
        }
        Fields::Unnamed(_) => quote! {
            let mut debug = f.debug_tuple(#type_name);
            #(#debug_fields)*
            debug.finish()
        },
        Fields::Unit => quote! {
            f.write_str(#type_name)
        },
    };

    Ok(StructDeriveOutput {
        shape_statics,
        field_arms: quote! { #(#field_arms)* },
        used_generics,
        debug_body,
        debug_generics,
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::{Data, DeriveInput};

    use super::derive_struct;
    use crate::container::parse_container_options;

    fn expand(tokens: proc_macro2::TokenStream) -> (String, String, String) {
        let input: DeriveInput = syn::parse2(tokens).unwrap();
        let options = parse_container_options(&input.attrs).unwrap();
        let Data::Struct(data) = &input.data else {
            panic!("expected a struct");
        };
        let output = derive_struct(&input.ident, data, &input.generics, &options).unwrap();
        (
            output.shape_statics.to_string(),
            output.field_arms.to_string(),
            output.debug_body.to_string(),
        )
    }

    #[test]
    fn descriptors_follow_strategies() {
        let (statics, arms, _) = expand(quote! {
            struct User {
                id: String,
                #[sensitive(PersonalData)]
                name: String,
                #[sensitive]
                inner_data: Inner,
            }
        });
        assert!(statics.contains("FieldDescriptor :: plain (\"id\")"));
        assert!(statics.contains("FieldDescriptor :: classified (\"name\""));
        assert!(statics.contains("__REDLOG_CLASSES_1"));
        assert!(statics.contains("FieldDescriptor :: transitive (\"inner_data\")"));
        assert!(arms.contains("2 =>"));
    }

    #[test]
    fn skipped_and_phantom_fields_get_no_descriptor() {
        let (statics, arms, debug) = expand(quote! {
            struct Typed<T> {
                id: String,
                #[log(skip)]
                cache: Vec<u8>,
                marker: PhantomData<T>,
            }
        });
        assert!(statics.contains("FieldDescriptor ; 1]"));
        assert!(!arms.contains("1 =>"));
        assert!(debug.contains("finish_non_exhaustive"));
    }

    #[test]
    fn renames_apply() {
        let (statics, _, debug) = expand(quote! {
            #[log(rename_all = "PascalCase")]
            struct User {
                inner_data: Inner,
                #[log(rename = "ID")]
                id: String,
            }
        });
        assert!(statics.contains("\"InnerData\""));
        assert!(statics.contains("\"ID\""));
        // Debug keeps Rust names
        assert!(debug.contains("\"inner_data\""));
    }

    #[test]
    fn classified_fields_are_redacted_in_debug() {
        let (_, _, debug) = expand(quote! {
            struct Pair(#[sensitive(Secret)] String, u32);
        });
        assert!(debug.contains("debug_tuple"));
        assert!(debug.contains("REDACTED_PLACEHOLDER"));
        assert!(debug.contains("self . 1"));
    }
}
