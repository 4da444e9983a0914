//! Classification identifiers: "what kind of sensitive data is this?"
//!
//! A [`Classification`] is a `(taxonomy, category)` pair used purely as a
//! policy key. Classifications are attached to fields through zero-sized
//! marker types implementing [`DataClassification`], so the derive macro can
//! reference them from `static` descriptor tables.

use std::{borrow::Cow, fmt};

/// A named sensitivity category.
///
/// Equality and hashing use both components. The strings are opaque tokens:
/// nothing here validates them, policy lives in the redactor registry.
///
/// ```rust
/// use redlog::Classification;
///
/// const PERSONAL: Classification = Classification::new("MyTaxonomy", "MyClassification");
/// assert_eq!(PERSONAL.taxonomy(), "MyTaxonomy");
/// assert_eq!(PERSONAL, Classification::owned("MyTaxonomy".to_string(), "MyClassification".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Classification {
    taxonomy: Cow<'static, str>,
    category: Cow<'static, str>,
}

impl Classification {
    /// Defines a classification from static strings.
    ///
    /// This is a `const fn` so classifications can be stored in `static`
    /// descriptor tables.
    #[must_use]
    pub const fn new(taxonomy: &'static str, category: &'static str) -> Self {
        Self {
            taxonomy: Cow::Borrowed(taxonomy),
            category: Cow::Borrowed(category),
        }
    }

    /// Defines a classification from runtime strings (e.g. configuration).
    #[must_use]
    pub fn owned(taxonomy: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            taxonomy: Cow::Owned(taxonomy.into()),
            category: Cow::Owned(category.into()),
        }
    }

    /// Returns the taxonomy name.
    pub fn taxonomy(&self) -> &str {
        &self.taxonomy
    }

    /// Returns the category name within the taxonomy.
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.taxonomy, self.category)
    }
}

/// A namespace from which classifications are minted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Taxonomy {
    name: &'static str,
}

impl Taxonomy {
    /// Declares a taxonomy.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the taxonomy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Mints a classification in this taxonomy.
    #[must_use]
    pub const fn classification(&self, category: &'static str) -> Classification {
        Classification::new(self.name, category)
    }
}

/// Marker trait binding a zero-sized type to a [`Classification`].
///
/// Field attributes such as `#[sensitive(PersonalData)]` name these marker
/// types:
///
/// ```rust
/// use redlog::{Classification, DataClassification, Taxonomy};
///
/// const MY_TAXONOMY: Taxonomy = Taxonomy::new("MyTaxonomy");
///
/// #[derive(Clone, Copy)]
/// struct PersonalData;
///
/// impl DataClassification for PersonalData {
///     const CLASSIFICATION: Classification = MY_TAXONOMY.classification("MyClassification");
/// }
/// ```
pub trait DataClassification {
    /// The classification this marker stands for.
    const CLASSIFICATION: Classification;
}

/// Taxonomy used by the built-in markers.
pub const BUILTIN_TAXONOMY: Taxonomy = Taxonomy::new("redlog");

macro_rules! builtin_classification {
    ($(#[$doc:meta])* $name:ident => $category:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name;

        impl DataClassification for $name {
            const CLASSIFICATION: Classification = BUILTIN_TAXONOMY.classification($category);
        }
    };
}

builtin_classification!(
    /// Classification marker for personally identifiable information.
    Pii => "pii"
);
builtin_classification!(
    /// Classification marker for secrets such as passwords or private keys.
    Secret => "secret"
);
builtin_classification!(
    /// Classification marker for email addresses.
    Email => "email"
);
builtin_classification!(
    /// Classification marker for authentication tokens and API keys.
    Token => "token"
);
builtin_classification!(
    /// Classification marker for credit card numbers or PANs.
    CreditCard => "credit_card"
);
builtin_classification!(
    /// Classification marker for phone numbers.
    PhoneNumber => "phone_number"
);
builtin_classification!(
    /// Classification marker for IP addresses.
    IpAddress => "ip_address"
);
