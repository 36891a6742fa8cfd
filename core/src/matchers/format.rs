//! `validate_format_of`
//!
//! A format cannot be probed at its boundary, so the test author supplies
//! sample values the format must accept and reject.

use super::{Matcher, ValidationMatcher};
use crate::{Constraint, ConstraintKind, Locale, MessageSpec, RenderOptions, Value};
use std::sync::Arc;

/// Assert that an attribute accepts and rejects the given samples.
///
/// ```
/// use assay::{validate_format_of, Matcher};
///
/// let m = validate_format_of("email").allowing(["a@b.c"]).rejecting(["nope"]);
/// assert_eq!(m.description(), r#"validate that :email accepts ‹"a@b.c"› and rejects ‹"nope"›"#);
/// ```
#[must_use]
pub fn validate_format_of(attribute: impl Into<String>) -> FormatMatcher {
    FormatMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Format {
                allowed: Vec::new(),
                rejected: Vec::new(),
                message: MessageSpec::Default,
            },
        )),
    }
}

/// Builder returned by [`validate_format_of`].
#[derive(Debug, Clone)]
pub struct FormatMatcher {
    inner: ValidationMatcher,
}

impl FormatMatcher {
    /// Samples the format must accept. Appends to earlier samples.
    #[must_use]
    pub fn allowing<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        if let ConstraintKind::Format { allowed, .. } = &mut self.inner.constraint_mut().kind {
            allowed.extend(values.into_iter().map(Into::into));
        }
        self
    }

    /// Samples the format must reject. Appends to earlier samples.
    #[must_use]
    pub fn rejecting<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        if let ConstraintKind::Format { rejected, .. } = &mut self.inner.constraint_mut().kind {
            rejected.extend(values.into_iter().map(Into::into));
        }
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

    /// Expected rejection message. `None` keeps the default.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<MessageSpec>) -> Self {
        if let ConstraintKind::Format { message: m, .. } = &mut self.inner.constraint_mut().kind {
            *m = message.into();
        }
        self
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

impl Matcher for FormatMatcher {
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
    fn no_samples_is_unprovable() {
        let mut stub = StubSubject::minimum_length(0);
        let mut m = validate_format_of("attr");
        assert!(!m.matches(&mut stub).unwrap());
        assert!(!m.does_not_match(&mut stub).unwrap());
        assert!(m.failure_message().contains("nothing"));
    }

    #[test]
    fn contradictory_samples_are_rejected() {
        let mut stub = StubSubject::minimum_length(0);
        let mut m = validate_format_of("attr").allowing(["x"]).rejecting(["x"]);
        assert!(matches!(
            m.matches(&mut stub),
            Err(AssayError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn samples_are_probed_in_order() {
        // Minimum length 3 acts as a format here: "abc" passes, "ab" fails.
        let mut stub = StubSubject::minimum_length(3);
        let mut m = validate_format_of("attr")
            .allowing(["abc"])
            .rejecting(["ab"])
            .with_message("is too short (minimum is 3 characters)");
        assert!(m.matches(&mut stub).unwrap());
        assert_eq!(m.last_trace().unwrap().results.len(), 2);
    }
}
