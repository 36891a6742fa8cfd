//! `validate_length_of`

use super::{Matcher, ValidationMatcher};
use crate::{Constraint, ConstraintKind, LengthBounds, Locale, MessageSpec, RenderOptions};
use std::sync::Arc;

/// Assert that an attribute's length is bounded.
///
/// ```
/// use assay::validate_length_of;
/// use assay::Matcher;
///
/// let matcher = validate_length_of("bio").is_at_least(2).is_at_most(140).allow_nil();
/// assert_eq!(
///     matcher.description(),
///     "validate that the length of :bio is between 2 and 140"
/// );
/// ```
#[must_use]
pub fn validate_length_of(attribute: impl Into<String>) -> LengthMatcher {
    LengthMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Length(LengthBounds::default()),
        )),
    }
}

/// Builder returned by [`validate_length_of`].
#[derive(Debug, Clone)]
pub struct LengthMatcher {
    inner: ValidationMatcher,
}

impl LengthMatcher {
    fn update(mut self, f: impl FnOnce(&mut LengthBounds)) -> Self {
        if let ConstraintKind::Length(bounds) = &mut self.inner.constraint_mut().kind {
            f(bounds);
        }
        self
    }

    /// Shortest accepted length.
    #[must_use]
    pub fn is_at_least(self, length: usize) -> Self {
        self.update(|b| b.minimum = Some(length))
    }

    /// Longest accepted length.
    #[must_use]
    pub fn is_at_most(self, length: usize) -> Self {
        self.update(|b| b.maximum = Some(length))
    }

    /// Exact length: the same as `is_at_least(n).is_at_most(n)`.
    #[must_use]
    pub fn is_equal_to(self, length: usize) -> Self {
        self.is_at_least(length).is_at_most(length)
    }

    /// Probe with collections instead of strings.
    #[must_use]
    pub fn as_array(mut self) -> Self {
        self.inner.constraint_mut().qualifiers.as_array = true;
        self
    }

    /// nil must be accepted.
    #[must_use]
    pub fn allow_nil(mut self) -> Self {
        self.inner.constraint_mut().qualifiers.allow_nil = true;
        self
    }

    /// Blank values must be accepted.
    #[must_use]
    pub fn allow_blank(mut self) -> Self {
        self.inner.constraint_mut().qualifiers.allow_blank = true;
        self
    }

    /// Expected message for too-short values. `None` keeps the default.
    #[must_use]
    pub fn with_short_message(self, message: impl Into<MessageSpec>) -> Self {
        let message = message.into();
        self.update(|b| b.short_message = message)
    }

    /// Expected message for too-long values. `None` keeps the default.
    #[must_use]
    pub fn with_long_message(self, message: impl Into<MessageSpec>) -> Self {
        let message = message.into();
        self.update(|b| b.long_message = message)
    }

    /// Expected message for both sides.
    #[must_use]
    pub fn with_message(self, message: impl Into<MessageSpec>) -> Self {
        let message = message.into();
        self.update(|b| {
            b.short_message = message.clone();
            b.long_message = message;
        })
    }

    /// Judge probes by the written value even when the writer changes it.
    #[must_use]
    pub fn ignoring_interference_by_writer(mut self) -> Self {
        self.inner
            .constraint_mut()
            .qualifiers
            .ignoring_interference_by_writer = true;
        self
    }

    /// Use `locale` for default messages.
    #[must_use]
    pub fn with_locale(mut self, locale: Arc<Locale>) -> Self {
        self.inner.set_locale(locale);
        self
    }

    /// Use `options` when rendering failure messages.
    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.inner.set_render_options(options);
        self
    }
}

impl Matcher for LengthMatcher {
    fn validation(&self) -> &ValidationMatcher {
        &self.inner
    }

    fn validation_mut(&mut self) -> &mut ValidationMatcher {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubSubject;

    #[test]
    fn descriptions() {
        assert_eq!(
            validate_length_of("attr").is_equal_to(4).description(),
            "validate that the length of :attr is 4"
        );
        assert_eq!(
            validate_length_of("attr").is_at_most(4).description(),
            "validate that the length of :attr is at most 4"
        );
    }

    #[test]
    fn with_message_sets_both_sides() {
        let m = validate_length_of("attr").is_equal_to(4).with_message("nope");
        let ConstraintKind::Length(bounds) = &m.validation().constraint().kind else {
            panic!("expected a length constraint");
        };
        assert!(!bounds.short_message.is_default());
        assert!(!bounds.long_message.is_default());
    }

    #[test]
    fn none_message_keeps_the_default() {
        let mut stub = StubSubject::minimum_length(4);
        let mut m = validate_length_of("attr")
            .is_at_least(4)
            .with_short_message(None::<&str>);
        assert!(m.matches(&mut stub).unwrap());
    }

    #[test]
    fn negated_failure_message() {
        let mut stub = StubSubject::minimum_length(4);
        let mut m = validate_length_of("attr").is_at_least(4);
        assert!(!m.does_not_match(&mut stub).unwrap());
        assert_eq!(
            m.failure_message_when_negated(),
            "Expected Stub not to validate that the length of :attr is at least 4,\n\
             but this could not be proved.\n  \
             After setting :attr to ‹\"xxxx\"›, the matcher expected the Stub to be\n  \
             invalid, but it was valid instead."
        );
    }
}
