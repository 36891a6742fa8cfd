//! `validate_exclusion_of`

use super::{Matcher, ValidationMatcher};
use crate::{Constraint, ConstraintKind, Locale, Membership, MessageSpec, RenderOptions, Value};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Assert that an attribute rejects the values of a set.
///
/// ```
/// use assay::{validate_exclusion_of, Matcher};
///
/// let m = validate_exclusion_of("username").in_array(["admin", "root"]);
/// assert_eq!(m.description(), r#"validate that :username is neither ‹"admin"› nor ‹"root"›"#);
/// ```
#[must_use]
pub fn validate_exclusion_of(attribute: impl Into<String>) -> ExclusionMatcher {
    ExclusionMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Exclusion {
                set: Membership::Values(Vec::new()),
                message: MessageSpec::Default,
            },
        )),
    }
}

/// Builder returned by [`validate_exclusion_of`].
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    inner: ValidationMatcher,
}

impl ExclusionMatcher {
    fn update(mut self, f: impl FnOnce(&mut Membership, &mut MessageSpec)) -> Self {
        if let ConstraintKind::Exclusion { set, message } = &mut self.inner.constraint_mut().kind {
            f(set, message);
        }
        self
    }

    /// The forbidden values.
    #[must_use]
    pub fn in_array<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.update(|set, _| *set = Membership::Values(values))
    }

    /// The forbidden integer range.
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

impl Matcher for ExclusionMatcher {
    fn validation(&self) -> &ValidationMatcher {
        &self.inner
    }

    fn validation_mut(&mut self) -> &mut ValidationMatcher {
        &mut self.inner
    }
}
