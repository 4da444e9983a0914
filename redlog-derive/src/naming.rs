//! Field name conventions for `#[log(rename_all = "...")]`.

use syn::{LitStr, Result};

/// Case convention applied to emitted field names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    /// `inner_data` → `InnerData`
    PascalCase,
    /// `inner_data` → `innerData`
    CamelCase,
    /// Names are kept as written.
    SnakeCase,
}

impl RenameRule {
    pub(crate) fn parse(lit: &LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(Self::PascalCase),
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            other => Err(syn::Error::new(
                lit.span(),
                format!(
                    "unknown case convention `{other}`; expected `PascalCase`, `camelCase` or `snake_case`"
                ),
            )),
        }
    }

    /// Applies the convention to a snake_case Rust field name.
    pub(crate) fn apply(self, field: &str) -> String {
        match self {
            Self::SnakeCase => field.to_owned(),
            Self::PascalCase => field.split('_').map(capitalize).collect(),
            Self::CamelCase => {
                let pascal = Self::PascalCase.apply(field);
                let mut chars = pascal.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_lowercase().chain(chars).collect()
                })
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Strips the raw identifier prefix, so `r#type` is emitted as `type`.
pub(crate) fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or_else(|| name.clone(), ToOwned::to_owned)
}
