//! Static shape metadata: which fields a structured type has and how each
//! one is classified.
//!
//! Shapes are declared once per type, in `static` items, either by
//! `#[derive(Structured)]` or by hand:
//!
//! ```rust
//! use redlog::{
//!     Classification, ClassificationSet, ExtractError, FieldDescriptor, FieldValue, LogField,
//!     Shape, Structured,
//! };
//!
//! const PERSONAL: Classification = Classification::new("MyTaxonomy", "MyClassification");
//!
//! struct Account {
//!     id: u64,
//!     owner: String,
//! }
//!
//! static OWNER_CLASSES: [Classification; 1] = [PERSONAL];
//! static ACCOUNT_FIELDS: [FieldDescriptor; 2] = [
//!     FieldDescriptor::plain("id"),
//!     FieldDescriptor::classified("owner", ClassificationSet::new(&OWNER_CLASSES)),
//! ];
//! static ACCOUNT_SHAPE: Shape = Shape::new("Account", &ACCOUNT_FIELDS);
//!
//! impl Structured for Account {
//!     fn shape(&self) -> &'static Shape {
//!         &ACCOUNT_SHAPE
//!     }
//!
//!     fn field(&self, index: usize) -> Result<FieldValue<'_>, ExtractError> {
//!         match index {
//!             0 => Ok(self.id.to_field()),
//!             1 => Ok(self.owner.to_field()),
//!             _ => Err(ExtractError::UnknownField { shape: "Account", index }),
//!         }
//!     }
//! }
//! ```

use std::{fmt, ptr};

use crate::{
    classification::Classification,
    error::{ConfigError, ExtractError},
    value::FieldValue,
};

/// Ordered, non-empty set of classifications attached to one field.
///
/// Order is attachment order; redactors run in that order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClassificationSet {
    members: &'static [Classification],
}

impl ClassificationSet {
    /// Wraps static classifications.
    ///
    /// # Panics
    ///
    /// Panics if `members` is empty. In a `static` initializer this is a
    /// compile-time error.
    #[must_use]
    pub const fn new(members: &'static [Classification]) -> Self {
        assert!(
            !members.is_empty(),
            "classification set must contain at least one classification"
        );
        Self { members }
    }

    /// Wraps static classifications, rejecting an empty slice.
    pub fn try_new(members: &'static [Classification]) -> Result<Self, ConfigError> {
        if members.is_empty() {
            return Err(ConfigError::EmptyClassificationSet);
        }
        Ok(Self { members })
    }

    /// Iterates members in attachment order.
    pub fn iter(&self) -> std::slice::Iter<'static, Classification> {
        self.members.iter()
    }

    /// Returns the members as a slice.
    pub const fn as_slice(&self) -> &'static [Classification] {
        self.members
    }

    /// Returns `true` if `classification` is a member.
    pub fn contains(&self, classification: &Classification) -> bool {
        self.members.contains(classification)
    }
}

impl fmt::Debug for ClassificationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.members.iter().map(ToString::to_string))
            .finish()
    }
}

impl IntoIterator for ClassificationSet {
    type Item = &'static Classification;
    type IntoIter = std::slice::Iter<'static, Classification>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Metadata for one field of a shape.
///
/// The field's accessor is [`Structured::field`] called with the
/// descriptor's position in [`Shape::fields`].
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    name: &'static str,
    classifications: Option<ClassificationSet>,
    transitive: bool,
}

impl FieldDescriptor {
    /// An unclassified, non-transitive field.
    #[must_use]
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            classifications: None,
            transitive: false,
        }
    }

    /// A field carrying `classifications`.
    #[must_use]
    pub const fn classified(name: &'static str, classifications: ClassificationSet) -> Self {
        Self {
            name,
            classifications: Some(classifications),
            transitive: false,
        }
    }

    /// An unclassified field whose nested structured value is walked.
    #[must_use]
    pub const fn transitive(name: &'static str) -> Self {
        Self {
            name,
            classifications: None,
            transitive: true,
        }
    }

    /// Field name as emitted in property paths.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Attached classifications, if any.
    pub const fn classifications(&self) -> Option<ClassificationSet> {
        self.classifications
    }

    /// Whether a nested structured value in this field is walked.
    pub const fn is_transitive(&self) -> bool {
        self.transitive
    }
}

/// The static field table of one structured type.
#[derive(Debug)]
pub struct Shape {
    name: &'static str,
    fields: &'static [FieldDescriptor],
}

impl Shape {
    /// Declares a shape.
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }

    /// Type name of the shape.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field descriptors in declaration order.
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Returns `true` if both references denote the same shape.
    pub fn same(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

/// A value whose fields can be extracted for logging.
///
/// Usually derived with `#[derive(Structured)]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Structured`",
    label = "this type cannot be walked for log properties",
    note = "use `#[derive(Structured)]` on the type definition"
)]
pub trait Structured {
    /// Returns the type's static shape.
    fn shape(&self) -> &'static Shape;

    /// Reads the field described by `self.shape().fields()[index]`.
    fn field(&self, index: usize) -> Result<FieldValue<'_>, ExtractError>;

    /// Name of the concrete type.
    ///
    /// Generic types share one shape across instantiations; this keeps
    /// `Wrapper<Leaf>` and `Wrapper<Wrapper<Leaf>>` apart during traversal.
    /// Not meant to be overridden.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Identity of a structured value during traversal: data address, shape
/// and concrete type, so a struct and its first field never compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    address: usize,
    shape: usize,
    type_name: &'static str,
}

impl Identity {
    pub(crate) fn of(value: &dyn Structured) -> Self {
        Self {
            address: ptr::from_ref(value).cast::<()>() as usize,
            shape: ptr::from_ref(value.shape()) as usize,
            type_name: value.type_name(),
        }
    }
}
