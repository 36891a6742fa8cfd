//! `validate_numericality_of`

use super::{Matcher, ValidationMatcher};
use crate::{
    Comparison, Constraint, ConstraintKind, Locale, MessageSpec, Number, NumericBounds, Parity,
    RenderOptions,
};
use std::sync::Arc;

/// Assert that an attribute only accepts numbers.
///
/// ```
/// use assay::{validate_numericality_of, Matcher};
///
/// let m = validate_numericality_of("age")
///     .only_integer()
///     .is_greater_than_or_equal_to(18)
///     .is_less_than(130);
/// assert_eq!(
///     m.description(),
///     "validate that :age looks like an integer greater than or equal to 18 and less than 130"
/// );
/// ```
#[must_use]
pub fn validate_numericality_of(attribute: impl Into<String>) -> NumericalityMatcher {
    NumericalityMatcher {
        inner: ValidationMatcher::new(Constraint::new(
            attribute,
            ConstraintKind::Numericality(NumericBounds::default()),
        )),
    }
}

/// Builder returned by [`validate_numericality_of`].
#[derive(Debug, Clone)]
pub struct NumericalityMatcher {
    inner: ValidationMatcher,
}

impl NumericalityMatcher {
    fn update(mut self, f: impl FnOnce(&mut NumericBounds)) -> Self {
        if let ConstraintKind::Numericality(bounds) = &mut self.inner.constraint_mut().kind {
            f(bounds);
        }
        self
    }

    /// Add a comparison, replacing an earlier one with the same operator.
    fn compare(self, operator: Comparison, bound: Number) -> Self {
        self.update(|b| {
            match b.comparisons.iter_mut().find(|(op, _)| *op == operator) {
                Some(existing) => existing.1 = bound,
                None => b.comparisons.push((operator, bound)),
            }
        })
    }

    /// Only integers are accepted.
    #[must_use]
    pub fn only_integer(self) -> Self {
        self.update(|b| b.only_integer = true)
    }

    /// Only odd numbers are accepted.
    #[must_use]
    pub fn odd(self) -> Self {
        self.update(|b| b.parity = Some(Parity::Odd))
    }

    /// Only even numbers are accepted.
    #[must_use]
    pub fn even(self) -> Self {
        self.update(|b| b.parity = Some(Parity::Even))
    }

    /// Values must be `> bound`.
    #[must_use]
    pub fn is_greater_than(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::GreaterThan, bound.into())
    }

    /// Values must be `>= bound`.
    #[must_use]
    pub fn is_greater_than_or_equal_to(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::GreaterThanOrEqualTo, bound.into())
    }

    /// Values must be `== bound`.
    #[must_use]
    pub fn is_equal_to(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::EqualTo, bound.into())
    }

    /// Values must be `< bound`.
    #[must_use]
    pub fn is_less_than(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::LessThan, bound.into())
    }

    /// Values must be `<= bound`.
    #[must_use]
    pub fn is_less_than_or_equal_to(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::LessThanOrEqualTo, bound.into())
    }

    /// Values must be `!= bound`.
    #[must_use]
    pub fn is_other_than(self, bound: impl Into<Number>) -> Self {
        self.compare(Comparison::OtherThan, bound.into())
    }

    /// nil must be accepted.
    #[must_use]
    pub fn allow_nil(mut self) -> Self {
        self.inner.constraint_mut().qualifiers.allow_nil = true;
        self
    }

    /// Expected message for every rejection. `None` keeps the defaults.
    #[must_use]
    pub fn with_message(self, message: impl Into<MessageSpec>) -> Self {
        let message = message.into();
        self.update(|b| b.message = message)
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

impl Matcher for NumericalityMatcher {
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

    #[test]
    fn repeated_operator_replaces_the_bound() {
        let m = validate_numericality_of("n").is_greater_than(1).is_greater_than(5);
        assert_eq!(
            m.description(),
            "validate that :n looks like a number greater than 5"
        );
    }

    #[test]
    fn parity_descriptions() {
        assert_eq!(
            validate_numericality_of("n").even().only_integer().description(),
            "validate that :n looks like an even integer"
        );
    }

    #[test]
    fn float_bounds_are_described_with_their_fraction() {
        assert_eq!(
            validate_numericality_of("price").is_less_than(9.5).description(),
            "validate that :price looks like a number less than 9.5"
        );
    }
}
