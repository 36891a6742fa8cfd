//! `validate_inclusion_of`

use super::{Matcher, ValidationMatcher};
use crate::{Constraint, ConstraintKind, Locale, Membership, MessageSpec, RenderOptions, Value};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Assert that an attribute only accepts values from a set.
///
/// ```
/// use assay::{validate_inclusion_of, Matcher};
///
/// let m = validate_inclusion_of("state").in_array(["open", "closed"]);
/// assert_eq!(m.description(), r#"validate that :state is either ‹"open"› or ‹"closed"›"#);
///
/// let m = validate_inclusion_of("rating").in_range(1..=5);
/// assert_eq!(m.description(), "validate that :rating lies inside the range ‹1› to ‹5›");
/// ```
#[must_use]
pub fn validate_inclusion_of(attribute: impl Into<String>) -> InclusionMatcher {
    InclusionMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Inclusion {
                set: Membership::Values(Vec::new()),
                message: MessageSpec::Default,
            },
        )),
    }
}

/// Builder returned by [`validate_inclusion_of`].
#[derive(Debug, Clone)]
pub struct InclusionMatcher {
    inner: ValidationMatcher,
}

impl InclusionMatcher {
    fn update(mut self, f: impl FnOnce(&mut Membership, &mut MessageSpec)) -> Self {
        if let ConstraintKind::Inclusion { set, message } = &mut self.inner.constraint_mut().kind {
            f(set, message);
        }
        self
    }

    /// The allowed values.
    #[must_use]
    pub fn in_array<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.update(|set, _| *set = Membership::Values(values))
    }

    /// The allowed integer range.
    #[must_use]
    pub fn in_range(self, range: RangeInclusive<i64>) -> Self {
        let (low, high) = range.into_inner();
        self.update(|set, _| *set = Membership::Range { low, high })
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

    /// Expected rejection message. `None` keeps the default.
    #[must_use]
    pub fn with_message(self, message: impl Into<MessageSpec>) -> Self {
        let spec = message.into();
        self.update(|_, message| *message = spec)
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

impl Matcher for InclusionMatcher {
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
    use crate::AssayError;

    #[test]
    fn single_value_description() {
        assert_eq!(
            validate_inclusion_of("kind").in_array(["a"]).description(),
            r#"validate that :kind is ‹"a"›"#
        );
        assert_eq!(
            validate_inclusion_of("n").in_array([1, 2, 3]).description(),
            "validate that :n is either ‹1›, ‹2›, or ‹3›"
        );
    }

    #[test]
    fn missing_set_is_a_configuration_error() {
        let mut stub = StubSubject::minimum_length(1);
        let mut m = validate_inclusion_of("attr");
        assert!(matches!(
            m.matches(&mut stub),
            Err(AssayError::InvalidConstraint { .. })
        ));
    }
}
