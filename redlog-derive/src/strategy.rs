//! Parsing of `#[sensitive(...)]` and `#[log(...)]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{punctuated::Punctuated, spanned::Spanned, Attribute, LitStr, Meta, Result, Token};

/// How the extractor treats a field.
///
/// ## Strategy Mapping
///
/// | Attribute | Strategy | Descriptor |
/// |-----------|----------|------------|
/// | None | `PassThrough` | `FieldDescriptor::plain` |
/// | `#[sensitive]` | `Walk` | `FieldDescriptor::transitive` |
/// | `#[sensitive(A, B)]` | `Classify([A, B])` | `FieldDescriptor::classified` |
/// | `#[log(skip)]` | `Skip` | none |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation: leaf values are emitted unchanged, nested values are
    /// not walked.
    PassThrough,
    /// Bare `#[sensitive]`: a nested structured value is walked when the
    /// call requests transitive traversal.
    Walk,
    /// `#[sensitive(A, B)]`: redact through each classification in order.
    Classify(Vec<syn::Path>),
    /// `#[log(skip)]`: the field has no descriptor.
    Skip,
}

/// Everything the derive needs to know about one field.
#[derive(Clone, Debug)]
pub(crate) struct FieldOptions {
    pub(crate) strategy: Strategy,
    /// Explicit emitted name from `#[log(rename = "...")]`.
    pub(crate) rename: Option<String>,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[sensitive] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

fn parse_classifications(list: &syn::MetaList, span: Span) -> Result<Vec<syn::Path>> {
    let paths = list
        .parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        .map_err(|_| {
            syn::Error::new(
                span,
                "expected classification types (e.g., #[sensitive(Pii)] or #[sensitive(Pii, Email)])",
            )
        })?;
    if paths.is_empty() {
        return Err(syn::Error::new(
            span,
            "#[sensitive(...)] needs at least one classification; use bare #[sensitive] to walk a nested value",
        ));
    }
    Ok(paths.into_iter().collect())
}

pub(crate) fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut strategy: Option<Strategy> = None;
    let mut rename = None;
    let mut skip = None;

    for attr in attrs {
        if attr.path().is_ident("sensitive") {
            match &attr.meta {
                Meta::Path(_) => {
                    set_strategy(&mut strategy, Strategy::Walk, attr.span())?;
                }
                Meta::List(list) => {
                    let paths = parse_classifications(list, attr.span())?;
                    set_strategy(&mut strategy, Strategy::Classify(paths), attr.span())?;
                }
                Meta::NameValue(_) => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "name-value syntax is not supported for #[sensitive]",
                    ));
                }
            }
        } else if attr.path().is_ident("log") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = Some(meta.path.span());
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let name: LitStr = meta.value()?.parse()?;
                    rename = Some(name.value());
                    Ok(())
                } else {
                    Err(meta.error("unknown field option; expected `rename` or `skip`"))
                }
            })?;
        }
    }

    if let Some(span) = skip {
        if strategy.is_some() {
            return Err(syn::Error::new(
                span,
                "a skipped field cannot also be #[sensitive]",
            ));
        }
        return Ok(FieldOptions {
            strategy: Strategy::Skip,
            rename,
        });
    }

    // Default: no annotation means pass through unchanged
    Ok(FieldOptions {
        strategy: strategy.unwrap_or(Strategy::PassThrough),
        rename,
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    fn strategy_of(tokens: proc_macro2::TokenStream) -> Result<Strategy> {
        parse_field_options(&parse_attrs(tokens)).map(|options| options.strategy)
    }

    #[test]
    fn no_attribute_returns_passthrough() {
        assert!(matches!(strategy_of(quote! {}).unwrap(), Strategy::PassThrough));
    }

    #[test]
    fn bare_sensitive_returns_walk() {
        assert!(matches!(
            strategy_of(quote! { #[sensitive] }).unwrap(),
            Strategy::Walk
        ));
    }

    #[test]
    fn sensitive_with_classification_returns_classify() {
        match strategy_of(quote! { #[sensitive(Secret)] }).unwrap() {
            Strategy::Classify(paths) => {
                assert_eq!(paths.len(), 1);
                assert!(paths[0].is_ident("Secret"));
            }
            _ => panic!("expected Classify"),
        }
    }

    #[test]
    fn classifications_keep_attachment_order() {
        match strategy_of(quote! { #[sensitive(Pii, my_module::Financial)] }).unwrap() {
            Strategy::Classify(paths) => {
                assert!(paths[0].is_ident("Pii"));
                assert_eq!(paths[1].segments.len(), 2);
            }
            _ => panic!("expected Classify"),
        }
    }

    #[test]
    fn empty_classification_list_errors() {
        let err = strategy_of(quote! { #[sensitive()] }).unwrap_err();
        assert!(err.to_string().contains("at least one classification"));
    }

    #[test]
    fn multiple_sensitive_attributes_error() {
        let err = strategy_of(quote! {
            #[sensitive]
            #[sensitive(Secret)]
        })
        .unwrap_err();
        assert!(err.to_string().contains("multiple #[sensitive] attributes"));
    }

    #[test]
    fn name_value_syntax_error() {
        let err = strategy_of(quote! { #[sensitive = "value"] }).unwrap_err();
        assert!(err.to_string().contains("name-value syntax is not supported"));
    }

    #[test]
    fn invalid_classification_syntax_error() {
        let err = strategy_of(quote! { #[sensitive(123)] }).unwrap_err();
        assert!(err.to_string().contains("expected classification types"));
    }

    #[test]
    fn log_options_are_parsed() {
        let options = parse_field_options(&parse_attrs(quote! {
            #[log(rename = "RedactedData")]
            #[sensitive(Pii)]
        }))
        .unwrap();
        assert_eq!(options.rename.as_deref(), Some("RedactedData"));
        assert!(matches!(options.strategy, Strategy::Classify(_)));

        assert!(matches!(
            strategy_of(quote! { #[log(skip)] }).unwrap(),
            Strategy::Skip
        ));
    }

    #[test]
    fn skip_conflicts_with_sensitive() {
        let err = strategy_of(quote! {
            #[log(skip)]
            #[sensitive(Pii)]
        })
        .unwrap_err();
        assert!(err.to_string().contains("cannot also be #[sensitive]"));
    }

    #[test]
    fn other_attributes_ignored() {
        let strategy = strategy_of(quote! {
            #[derive(Clone)]
            #[serde(skip)]
        })
        .unwrap();
        assert!(matches!(strategy, Strategy::PassThrough));
    }
}
