//! Container-level attribute parsing for `#[derive(Structured)]`.
//!
//! This module handles `#[log(...)]` on the struct itself, not on fields.

use syn::{Attribute, LitStr, Meta, Result};

use crate::naming::RenameRule;

/// Options parsed from container-level `#[log(...)]` attributes.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Shape name override.
    pub(crate) rename: Option<String>,
    /// Case convention applied to field names without an explicit rename.
    pub(crate) rename_all: Option<RenameRule>,
    /// If true, skip generating the `Debug` impl.
    pub(crate) skip_debug: bool,
}

/// Parses container-level `#[log(...)]` attributes.
pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if attr.path().is_ident("sensitive") {
            return Err(syn::Error::new_spanned(
                attr,
                "#[sensitive] belongs on fields; use #[log(...)] on the container",
            ));
        }
        if !attr.path().is_ident("log") {
            continue;
        }

        match &attr.meta {
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip_debug") {
                        options.skip_debug = true;
                        Ok(())
                    } else if meta.path.is_ident("rename") {
                        let name: LitStr = meta.value()?.parse()?;
                        options.rename = Some(name.value());
                        Ok(())
                    } else if meta.path.is_ident("rename_all") {
                        let rule: LitStr = meta.value()?.parse()?;
                        options.rename_all = Some(RenameRule::parse(&rule)?);
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{}`; expected `rename`, `rename_all` or `skip_debug`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::Path(_) | Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected #[log(...)] with a list of options",
                ));
            }
        }
    }

    Ok(options)
}
