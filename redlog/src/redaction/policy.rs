//! Text masking policies.
//!
//! Policies are pure string transformations over Unicode scalar values. They
//! know nothing about classifications; [`super::TextRedactor`] binds a policy
//! to the [`super::Redactor`] capability.

use std::borrow::Cow;

/// Default placeholder used for full redaction.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// Default masking symbol.
pub const MASK_CHAR: char = '*';

/// Leading and trailing character counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    prefix: usize,
    suffix: usize,
}

impl Span {
    /// Index range of the middle section, or `None` when the spans cover the
    /// whole value.
    fn middle(self, total: usize) -> Option<(usize, usize)> {
        if self.prefix + self.suffix >= total {
            None
        } else {
            Some((self.prefix, total - self.suffix))
        }
    }
}

/// Keeps leading and/or trailing characters visible and masks the rest.
///
/// If the kept spans cover the whole value, it is returned unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    visible: Span,
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the first `visible_prefix` characters.
    #[must_use]
    pub const fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    /// Keeps only the last `visible_suffix` characters.
    #[must_use]
    pub const fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    /// Keeps both leading and trailing characters.
    #[must_use]
    pub const fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible: Span {
                prefix: visible_prefix,
                suffix: visible_suffix,
            },
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub const fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        if let Some((start, end)) = self.visible.middle(chars.len()) {
            chars[start..end].fill(self.mask_char);
        }
        chars.into_iter().collect()
    }
}

/// Masks leading and/or trailing characters and keeps the rest.
///
/// If the masked spans cover the whole value, every character is masked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    masked: Span,
    mask_char: char,
}

impl MaskConfig {
    /// Masks only the first `mask_prefix` characters.
    #[must_use]
    pub const fn first(mask_prefix: usize) -> Self {
        Self::both(mask_prefix, 0)
    }

    /// Masks only the last `mask_suffix` characters.
    #[must_use]
    pub const fn last(mask_suffix: usize) -> Self {
        Self::both(0, mask_suffix)
    }

    /// Masks both leading and trailing characters.
    #[must_use]
    pub const fn both(mask_prefix: usize, mask_suffix: usize) -> Self {
        Self {
            masked: Span {
                prefix: mask_prefix,
                suffix: mask_suffix,
            },
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub const fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        match self.masked.middle(total) {
            None => chars.fill(self.mask_char),
            Some((start, end)) => {
                chars[..start].fill(self.mask_char);
                chars[end..].fill(self.mask_char);
            }
        }
        chars.into_iter().collect()
    }
}

/// A redaction strategy for text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextRedactionPolicy {
    /// Replace the entire value with a fixed placeholder.
    Full {
        /// The placeholder text to use.
        placeholder: Cow<'static, str>,
    },
    /// Keep configured segments visible while masking everything else.
    Keep(KeepConfig),
    /// Mask configured segments while leaving the remainder untouched.
    Mask(MaskConfig),
}

impl TextRedactionPolicy {
    /// [`TextRedactionPolicy::Full`] with [`REDACTED_PLACEHOLDER`].
    #[must_use]
    pub const fn default_full() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(REDACTED_PLACEHOLDER),
        }
    }

    /// [`TextRedactionPolicy::Full`] with a custom placeholder.
    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    /// Keeps the first `visible_prefix` characters in clear text.
    #[must_use]
    pub const fn keep_first(visible_prefix: usize) -> Self {
        Self::Keep(KeepConfig::first(visible_prefix))
    }

    /// Keeps the last `visible_suffix` characters in clear text.
    #[must_use]
    pub const fn keep_last(visible_suffix: usize) -> Self {
        Self::Keep(KeepConfig::last(visible_suffix))
    }

    /// Masks the first `mask_prefix` characters.
    #[must_use]
    pub const fn mask_first(mask_prefix: usize) -> Self {
        Self::Mask(MaskConfig::first(mask_prefix))
    }

    /// Masks the last `mask_suffix` characters.
    #[must_use]
    pub const fn mask_last(mask_suffix: usize) -> Self {
        Self::Mask(MaskConfig::last(mask_suffix))
    }

    /// Overrides the masking character. No effect on `Full`.
    #[must_use]
    pub fn with_mask_char(self, mask_char: char) -> Self {
        match self {
            Self::Full { .. } => self,
            Self::Keep(config) => Self::Keep(config.with_mask_char(mask_char)),
            Self::Mask(config) => Self::Mask(config.with_mask_char(mask_char)),
        }
    }

    /// Applies the policy to `value`. Total: never fails.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            Self::Full { placeholder } => placeholder.clone().into_owned(),
            Self::Keep(config) => config.apply_to(value),
            Self::Mask(config) => config.apply_to(value),
        }
    }
}

impl Default for TextRedactionPolicy {
    fn default() -> Self {
        Self::default_full()
    }
}
