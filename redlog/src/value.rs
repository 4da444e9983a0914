//! The dynamic value model handed to redactors and sinks.
//!
//! Field types convert into [`FieldValue`] through [`LogField`]. Leaf types
//! produce a [`Value`]; types deriving `Structured` produce
//! [`FieldValue::Nested`] so the extractor can walk into them.

use std::{
    borrow::Cow,
    cell::OnceCell,
    fmt,
    rc::Rc,
    sync::{Arc, OnceLock},
};

use crate::shape::Structured;

/// Rendering of [`Value::Absent`].
pub const ABSENT_MARKER: &str = "<absent>";

/// Rendering of [`Value::ExtractionFailed`].
pub const EXTRACTION_FAILED_MARKER: &str = "<extraction failed>";

/// Rendering of [`Value::Truncated`].
pub const TRUNCATED_MARKER: &str = "<truncated>";

/// A scalar log value, or a marker standing in for one.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    I64(i64),
    /// Unsigned integer.
    U64(u64),
    /// Floating point number.
    F64(f64),
    /// The field had no value (`None`, unset cell).
    Absent,
    /// Reading the field failed.
    ExtractionFailed,
    /// Traversal stopped here (cycle or depth bound).
    Truncated,
}

impl Value {
    /// Returns `true` for the marker variants, which carry no field data.
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Absent | Self::ExtractionFailed | Self::Truncated)
    }

    /// Returns the text payload, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::I64(value) => write!(f, "{value}"),
            Self::U64(value) => write!(f, "{value}"),
            Self::F64(value) => write!(f, "{value}"),
            Self::Absent => f.write_str(ABSENT_MARKER),
            Self::ExtractionFailed => f.write_str(EXTRACTION_FAILED_MARKER),
            Self::Truncated => f.write_str(TRUNCATED_MARKER),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Str(value) => serializer.serialize_str(value),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::I64(value) => serializer.serialize_i64(*value),
            Self::U64(value) => serializer.serialize_u64(*value),
            Self::F64(value) => serializer.serialize_f64(*value),
            // Explicit null: the key stays present in the output.
            Self::Absent => serializer.serialize_none(),
            Self::ExtractionFailed => serializer.serialize_str(EXTRACTION_FAILED_MARKER),
            Self::Truncated => serializer.serialize_str(TRUNCATED_MARKER),
        }
    }
}

/// What an accessor yields for one field.
pub enum FieldValue<'a> {
    /// A leaf value.
    Value(Value),
    /// A nested structured value that may be walked.
    Nested(&'a dyn Structured),
    /// No value.
    Absent,
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Nested(nested) => f.debug_tuple("Nested").field(&nested.shape().name()).finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// Conversion of a field's type into a [`FieldValue`].
///
/// Implemented for common scalar and string types, for wrappers
/// (`Option`, `Box`, `Rc`, `Arc`, cells) and by `#[derive(Structured)]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a log field",
    label = "this type does not implement `LogField`",
    note = "derive `Structured` on the type, or add `#[log(skip)]` to the field"
)]
pub trait LogField {
    /// Reads the field as a log value.
    fn to_field(&self) -> FieldValue<'_>;
}

macro_rules! impl_log_field_via {
    ($variant:ident as $target:ty: $($ty:ty),* $(,)?) => {
        $(
            impl LogField for $ty {
                fn to_field(&self) -> FieldValue<'_> {
                    FieldValue::Value(Value::$variant(<$target>::from(*self)))
                }
            }
        )*
    };
}

impl_log_field_via!(I64 as i64: i8, i16, i32, i64);
impl_log_field_via!(U64 as u64: u8, u16, u32, u64);
impl_log_field_via!(F64 as f64: f32, f64);
impl_log_field_via!(Bool as bool: bool);

// Out-of-range 128-bit and pointer-sized values fall back to text.
macro_rules! impl_log_field_wide {
    ($variant:ident as $target:ty: $($ty:ty),* $(,)?) => {
        $(
            impl LogField for $ty {
                fn to_field(&self) -> FieldValue<'_> {
                    let value = <$target>::try_from(*self)
                        .map_or_else(|_| Value::Str(self.to_string()), Value::$variant);
                    FieldValue::Value(value)
                }
            }
        )*
    };
}

impl_log_field_wide!(I64 as i64: i128, isize);
impl_log_field_wide!(U64 as u64: u128, usize);

impl LogField for char {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Value(Value::Str(self.to_string()))
    }
}

impl LogField for str {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Value(Value::Str(self.to_owned()))
    }
}

impl LogField for String {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Value(Value::Str(self.clone()))
    }
}

impl LogField for Cow<'_, str> {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Value(Value::Str(self.to_string()))
    }
}

impl LogField for Value {
    fn to_field(&self) -> FieldValue<'_> {
        match self {
            Self::Absent => FieldValue::Absent,
            other => FieldValue::Value(other.clone()),
        }
    }
}

impl<T> LogField for &T
where
    T: LogField + ?Sized,
{
    fn to_field(&self) -> FieldValue<'_> {
        (**self).to_field()
    }
}

impl<T> LogField for Box<T>
where
    T: LogField + ?Sized,
{
    fn to_field(&self) -> FieldValue<'_> {
        (**self).to_field()
    }
}

impl<T> LogField for Rc<T>
where
    T: LogField + ?Sized,
{
    fn to_field(&self) -> FieldValue<'_> {
        (**self).to_field()
    }
}

impl<T> LogField for Arc<T>
where
    T: LogField + ?Sized,
{
    fn to_field(&self) -> FieldValue<'_> {
        (**self).to_field()
    }
}

impl<T> LogField for Option<T>
where
    T: LogField,
{
    fn to_field(&self) -> FieldValue<'_> {
        self.as_ref().map_or(FieldValue::Absent, LogField::to_field)
    }
}

impl<T> LogField for OnceCell<T>
where
    T: LogField,
{
    fn to_field(&self) -> FieldValue<'_> {
        self.get().map_or(FieldValue::Absent, LogField::to_field)
    }
}

impl<T> LogField for OnceLock<T>
where
    T: LogField,
{
    fn to_field(&self) -> FieldValue<'_> {
        self.get().map_or(FieldValue::Absent, LogField::to_field)
    }
}
