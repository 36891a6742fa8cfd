//! `validate_presence_of`

use super::{Matcher, ValidationMatcher};
use crate::{Constraint, ConstraintKind, Locale, MessageSpec, RenderOptions};
use std::sync::Arc;

/// Assert that an attribute rejects nil and blank values.
#[must_use]
pub fn validate_presence_of(attribute: impl Into<String>) -> PresenceMatcher {
    PresenceMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Presence {
                message: MessageSpec::Default,
            },
        )),
    }
}

/// Builder returned by [`validate_presence_of`].
#[derive(Debug, Clone)]
pub struct PresenceMatcher {
    inner: ValidationMatcher,
}

impl PresenceMatcher {
    /// Expected rejection message. `None` keeps the default.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<MessageSpec>) -> Self {
        if let ConstraintKind::Presence { message: m } = &mut self.inner.constraint_mut().kind {
            *m = message.into();
        }
        self
    }

    /// Probe with an empty collection instead of an empty string.
    #[must_use]
    pub fn as_array(mut self) -> Self {
        self.inner.constraint_mut().qualifiers.as_array = true;
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

impl Matcher for PresenceMatcher {
    fn validation(&self) -> &ValidationMatcher {
        &self.inner
    }

    fn validation_mut(&mut self) -> &mut ValidationMatcher {
        &mut self.inner
    }
}
