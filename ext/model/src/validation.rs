//! Declarative validations with ORM semantics
//!
//! Each [`Validation`] watches one attribute. Running it yields the error
//! messages it records for the current value, rendered from the model's
//! locale exactly as the engine renders its expected messages.
//!
//! ```
//! use assay_model::Validation;
//!
//! let v = Validation::length("name").minimum(2).maximum(10).allow_nil();
//! assert_eq!(v.attribute(), "name");
//! ```

use assay::{Comparison, Interpolation, Locale, Membership, MessageKey, Number, Parity, Value};
use regex::Regex;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Signature of a custom check: `Ok(None)` valid, `Ok(Some(message))`
/// invalid, `Err(reason)` the validation raised.
pub type CustomCheck = Arc<dyn Fn(&Value) -> Result<Option<String>, String> + Send + Sync>;

/// What a validation checks.
#[derive(Clone)]
pub enum Rule {
    /// `validates_length_of`
    Length {
        /// Shortest valid length.
        minimum: Option<usize>,
        /// Longest valid length.
        maximum: Option<usize>,
        /// The only valid length.
        is: Option<usize>,
        /// Message for too-short values.
        too_short: Option<String>,
        /// Message for too-long values.
        too_long: Option<String>,
        /// Message for values of the wrong exact length.
        wrong_length: Option<String>,
    },
    /// `validates_numericality_of`
    Numericality {
        /// Reject non-integers.
        only_integer: bool,
        /// Odd/even requirement.
        parity: Option<Parity>,
        /// Comparisons against bounds.
        comparisons: Vec<(Comparison, Number)>,
    },
    /// `validates_inclusion_of`
    Inclusion(Membership),
    /// `validates_exclusion_of`
    Exclusion(Membership),
    /// `validates_presence_of`
    Presence,
    /// `validates_format_of`
    Format(Regex),
    /// `validate :method`
    Custom(CustomCheck),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length {
                minimum,
                maximum,
                is,
                ..
            } => f
                .debug_struct("Length")
                .field("minimum", minimum)
                .field("maximum", maximum)
                .field("is", is)
                .finish_non_exhaustive(),
            Self::Numericality {
                only_integer,
                parity,
                comparisons,
            } => f
                .debug_struct("Numericality")
                .field("only_integer", only_integer)
                .field("parity", parity)
                .field("comparisons", comparisons)
                .finish(),
            Self::Inclusion(set) => f.debug_tuple("Inclusion").field(set).finish(),
            Self::Exclusion(set) => f.debug_tuple("Exclusion").field(set).finish(),
            Self::Presence => f.write_str("Presence"),
            Self::Format(re) => f.debug_tuple("Format").field(&re.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A validation on one attribute.
///
/// Builder methods that do not apply to the rule have no effect.
#[derive(Debug, Clone)]
pub struct Validation {
    attribute: String,
    rule: Rule,
    allow_nil: bool,
    allow_blank: bool,
    message: Option<String>,
}

impl Validation {
    fn new(attribute: impl Into<String>, rule: Rule) -> Self {
        Self {
            attribute: attribute.into(),
            rule,
            allow_nil: false,
            allow_blank: false,
            message: None,
        }
    }

    /// Length validation with no bounds yet.
    #[must_use]
    pub fn length(attribute: impl Into<String>) -> Self {
        Self::new(
            attribute,
            Rule::Length {
                minimum: None,
                maximum: None,
                is: None,
                too_short: None,
                too_long: None,
                wrong_length: None,
            },
        )
    }

    /// Numericality validation.
    #[must_use]
    pub fn numericality(attribute: impl Into<String>) -> Self {
        Self::new(
            attribute,
            Rule::Numericality {
                only_integer: false,
                parity: None,
                comparisons: Vec::new(),
            },
        )
    }

    /// The value must be one of `values`.
    #[must_use]
    pub fn inclusion<V: Into<Value>>(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let set = Membership::Values(values.into_iter().map(Into::into).collect());
        Self::new(attribute, Rule::Inclusion(set))
    }

    /// The value must lie in `range`.
    #[must_use]
    pub fn inclusion_in_range(attribute: impl Into<String>, range: RangeInclusive<i64>) -> Self {
        let (low, high) = range.into_inner();
        Self::new(attribute, Rule::Inclusion(Membership::Range { low, high }))
    }

    /// The value must not be one of `values`.
    #[must_use]
    pub fn exclusion<V: Into<Value>>(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let set = Membership::Values(values.into_iter().map(Into::into).collect());
        Self::new(attribute, Rule::Exclusion(set))
    }

    /// The value must lie outside `range`.
    #[must_use]
    pub fn exclusion_in_range(attribute: impl Into<String>, range: RangeInclusive<i64>) -> Self {
        let (low, high) = range.into_inner();
        Self::new(attribute, Rule::Exclusion(Membership::Range { low, high }))
    }

    /// The value must not be blank.
    #[must_use]
    pub fn presence(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Rule::Presence)
    }

    /// The value's text must match `pattern`.
    #[must_use]
    pub fn format(attribute: impl Into<String>, pattern: Regex) -> Self {
        Self::new(attribute, Rule::Format(pattern))
    }

    /// An arbitrary check.
    ///
    /// ```
    /// use assay_model::Validation;
    ///
    /// let v = Validation::custom("code", |value| match value.as_str() {
    ///     Some(s) if s.starts_with('#') => Ok(None),
    ///     Some(_) => Ok(Some("must start with #".into())),
    ///     None => Err("code is not a string".into()),
    /// });
    /// # let _ = v;
    /// ```
    #[must_use]
    pub fn custom(
        attribute: impl Into<String>,
        check: impl Fn(&Value) -> Result<Option<String>, String> + Send + Sync + 'static,
    ) -> Self {
        Self::new(attribute, Rule::Custom(Arc::new(check)))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Options
    // ═══════════════════════════════════════════════════════════════════════════

    fn length_option(
        mut self,
        f: impl FnOnce(&mut Option<usize>, &mut Option<usize>, &mut Option<usize>),
    ) -> Self {
        if let Rule::Length {
            minimum,
            maximum,
            is,
            ..
        } = &mut self.rule
        {
            f(minimum, maximum, is);
        }
        self
    }

    fn numeric_option(
        mut self,
        f: impl FnOnce(&mut bool, &mut Option<Parity>, &mut Vec<(Comparison, Number)>),
    ) -> Self {
        if let Rule::Numericality {
            only_integer,
            parity,
            comparisons,
        } = &mut self.rule
        {
            f(only_integer, parity, comparisons);
        }
        self
    }

    /// `minimum:` for length.
    #[must_use]
    pub fn minimum(self, n: usize) -> Self {
        self.length_option(|min, _, _| *min = Some(n))
    }

    /// `maximum:` for length.
    #[must_use]
    pub fn maximum(self, n: usize) -> Self {
        self.length_option(|_, max, _| *max = Some(n))
    }

    /// `is:` for length.
    #[must_use]
    pub fn is(self, n: usize) -> Self {
        self.length_option(|_, _, is| *is = Some(n))
    }

    /// `too_short:` message for length.
    #[must_use]
    pub fn too_short(mut self, message: impl Into<String>) -> Self {
        if let Rule::Length { too_short, .. } = &mut self.rule {
            *too_short = Some(message.into());
        }
        self
    }

    /// `too_long:` message for length.
    #[must_use]
    pub fn too_long(mut self, message: impl Into<String>) -> Self {
        if let Rule::Length { too_long, .. } = &mut self.rule {
            *too_long = Some(message.into());
        }
        self
    }

    /// `wrong_length:` message for length.
    #[must_use]
    pub fn wrong_length(mut self, message: impl Into<String>) -> Self {
        if let Rule::Length { wrong_length, .. } = &mut self.rule {
            *wrong_length = Some(message.into());
        }
        self
    }

    /// `only_integer: true` for numericality.
    #[must_use]
    pub fn only_integer(self) -> Self {
        self.numeric_option(|only, _, _| *only = true)
    }

    /// `odd: true` for numericality.
    #[must_use]
    pub fn odd(self) -> Self {
        self.numeric_option(|_, parity, _| *parity = Some(Parity::Odd))
    }

    /// `even: true` for numericality.
    #[must_use]
    pub fn even(self) -> Self {
        self.numeric_option(|_, parity, _| *parity = Some(Parity::Even))
    }

    /// A comparison for numericality (`greater_than:` and friends).
    #[must_use]
    pub fn compare(self, operator: Comparison, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.numeric_option(|_, _, comparisons| comparisons.push((operator, bound)))
    }

    /// Skip the check for nil.
    #[must_use]
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    /// Skip the check for blank values.
    #[must_use]
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    /// `message:` for every error this validation records.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The attribute this validation watches.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The rule being checked.
    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Checking
    // ═══════════════════════════════════════════════════════════════════════════

    /// Error messages for `value`, empty when it is valid.
    ///
    /// # Errors
    ///
    /// Returns the reason when a custom check raises.
    pub fn check(&self, value: &Value, ctx: &CheckContext<'_>) -> Result<Vec<String>, String> {
        if (self.allow_nil && value.is_nil()) || (self.allow_blank && value.is_blank()) {
            return Ok(Vec::new());
        }

        let messages = Messages {
            ctx,
            attribute: &self.attribute,
            value,
            message: self.message.as_deref(),
        };
        let mut errors = Vec::new();

        match &self.rule {
            Rule::Length {
                minimum,
                maximum,
                is,
                too_short,
                too_long,
                wrong_length,
            } => {
                let len = value.length();
                if let Some(n) = is {
                    if len != *n {
                        errors.push(messages.render(MessageKey::WrongLength, wrong_length, Some(n)));
                    }
                }
                if let Some(n) = minimum {
                    if len < *n {
                        errors.push(messages.render(MessageKey::TooShort, too_short, Some(n)));
                    }
                }
                if let Some(n) = maximum {
                    if len > *n {
                        errors.push(messages.render(MessageKey::TooLong, too_long, Some(n)));
                    }
                }
            }

            Rule::Numericality {
                only_integer,
                parity,
                comparisons,
            } => match value.to_number() {
                None => errors.push(messages.render(MessageKey::NotANumber, &None, None::<&usize>)),
                Some(number) if *only_integer && !number.is_integer() => {
                    errors.push(messages.render(MessageKey::NotAnInteger, &None, None::<&usize>));
                }
                Some(number) => {
                    if let Some(p) = parity {
                        #[allow(clippy::cast_possible_truncation)]
                        let whole = match number {
                            Number::Int(i) => i,
                            Number::Float(f) => f as i64,
                        };
                        let (holds, key) = match p {
                            Parity::Odd => (whole % 2 != 0, MessageKey::Odd),
                            Parity::Even => (whole % 2 == 0, MessageKey::Even),
                        };
                        if !holds {
                            errors.push(messages.render(key, &None, None::<&usize>));
                        }
                    }
                    for (operator, bound) in comparisons {
                        if !operator.holds(number, *bound) {
                            errors.push(messages.render(operator.message_key(), &None, Some(bound)));
                        }
                    }
                }
            },

            Rule::Inclusion(set) => {
                if !set.contains(value) {
                    errors.push(messages.render(MessageKey::Inclusion, &None, None::<&usize>));
                }
            }

            Rule::Exclusion(set) => {
                if set.contains(value) {
                    errors.push(messages.render(MessageKey::Exclusion, &None, None::<&usize>));
                }
            }

            Rule::Presence => {
                if value.is_blank() {
                    errors.push(messages.render(MessageKey::Blank, &None, None::<&usize>));
                }
            }

            Rule::Format(re) => {
                if !re.is_match(&text(value)) {
                    errors.push(messages.render(MessageKey::Invalid, &None, None::<&usize>));
                }
            }

            Rule::Custom(check) => {
                if let Some(message) = check(value)? {
                    errors.push(message);
                }
            }
        }

        Ok(errors)
    }
}

/// The model-level context a validation renders messages in.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Model name for `%{model}`.
    pub model_name: &'a str,
    /// The catalog default messages come from.
    pub locale: &'a Locale,
}

/// The text a format is matched against: strings as-is, nil as empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Nil => String::new(),
        other => other.inspect(),
    }
}

struct Messages<'a> {
    ctx: &'a CheckContext<'a>,
    attribute: &'a str,
    value: &'a Value,
    message: Option<&'a str>,
}

impl Messages<'_> {
    /// A specific option beats `message:`, which beats the catalog.
    fn render<C: fmt::Display>(
        &self,
        key: MessageKey,
        specific: &Option<String>,
        count: Option<&C>,
    ) -> String {
        let mut vars = Interpolation::new()
            .attribute(self.attribute)
            .model(self.ctx.model_name)
            .value(text(self.value));
        if let Some(count) = count {
            vars = vars.count(count);
        }
        match specific.as_deref().or(self.message) {
            Some(custom) => vars.apply(custom),
            None => self.ctx.locale.message(key, &vars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(v: &Validation, value: impl Into<Value>) -> Vec<String> {
        let locale = Locale::english();
        let ctx = CheckContext {
            model_name: "Example",
            locale: &locale,
        };
        v.check(&value.into(), &ctx).unwrap()
    }

    #[test]
    fn length_minimum() {
        let v = Validation::length("attr").minimum(4);
        assert_eq!(check(&v, "xxx"), vec!["is too short (minimum is 4 characters)"]);
        assert!(check(&v, "xxxx").is_empty());
    }

    #[test]
    fn nil_has_length_zero() {
        let v = Validation::length("attr").minimum(1);
        assert_eq!(check(&v, Value::Nil), vec!["is too short (minimum is 1 character)"]);
        assert!(check(&v.clone().allow_nil(), Value::Nil).is_empty());
    }

    #[test]
    fn length_exact_uses_wrong_length() {
        let v = Validation::length("attr").is(4);
        assert_eq!(
            check(&v, "xxxxx"),
            vec!["is the wrong length (should be 4 characters)"]
        );
    }

    #[test]
    fn specific_message_beats_message_option() {
        let v = Validation::length("attr")
            .minimum(4)
            .maximum(6)
            .message("generic")
            .too_short("short by %{count}");
        assert_eq!(check(&v, "x"), vec!["short by 4"]);
        assert_eq!(check(&v, "xxxxxxx"), vec!["generic"]);
    }

    #[test]
    fn allow_blank_skips_whitespace() {
        let v = Validation::length("attr").minimum(2).allow_blank();
        assert!(check(&v, "  ").is_empty());
        assert!(!check(&v, "x").is_empty());
    }

    #[test]
    fn numericality() {
        let v = Validation::numericality("age")
            .only_integer()
            .compare(Comparison::GreaterThanOrEqualTo, 18);
        assert_eq!(check(&v, "abcd"), vec!["is not a number"]);
        assert_eq!(check(&v, "0.1"), vec!["must be an integer"]);
        assert_eq!(check(&v, 17), vec!["must be greater than or equal to 18"]);
        assert!(check(&v, 18).is_empty());
        assert!(check(&v, "18").is_empty());
        assert_eq!(check(&v, Value::Nil), vec!["is not a number"]);
    }

    #[test]
    fn numericality_parity() {
        let odd = Validation::numericality("n").odd();
        assert_eq!(check(&odd, 2), vec!["must be odd"]);
        assert!(check(&odd, 3).is_empty());

        let even = Validation::numericality("n").even();
        assert_eq!(check(&even, 1), vec!["must be even"]);
    }

    #[test]
    fn float_bounds_render_with_fraction() {
        let v = Validation::numericality("price").compare(Comparison::LessThan, 9.5);
        assert_eq!(check(&v, 9.5), vec!["must be less than 9.5"]);
    }

    #[test]
    fn inclusion_and_exclusion() {
        let incl = Validation::inclusion("state", ["open", "closed"]);
        assert!(check(&incl, "open").is_empty());
        assert_eq!(check(&incl, "other"), vec!["is not included in the list"]);

        let excl = Validation::exclusion_in_range("n", 1..=3);
        assert_eq!(check(&excl, 2), vec!["is reserved"]);
        assert!(check(&excl, 4).is_empty());
    }

    #[test]
    fn presence() {
        let v = Validation::presence("title");
        assert_eq!(check(&v, ""), vec!["can't be blank"]);
        assert_eq!(check(&v, Value::Nil), vec!["can't be blank"]);
        assert!(check(&v, "x").is_empty());
    }

    #[test]
    fn format_matches_text() {
        let v = Validation::format("email", Regex::new("@").unwrap());
        assert!(check(&v, "a@b").is_empty());
        assert_eq!(check(&v, "ab"), vec!["is invalid"]);
        assert_eq!(check(&v, Value::Nil), vec!["is invalid"]);
    }

    #[test]
    fn custom_message_interpolates() {
        let v = Validation::presence("first_name").message("%{attribute} of %{model} is missing");
        assert_eq!(check(&v, ""), vec!["First name of Example is missing"]);
    }

    #[test]
    fn custom_check_can_raise() {
        let v = Validation::custom("attr", |_| Err("boom".into()));
        let locale = Locale::english();
        let ctx = CheckContext {
            model_name: "Example",
            locale: &locale,
        };
        assert_eq!(v.check(&Value::Nil, &ctx), Err("boom".to_string()));
    }

    #[test]
    fn options_for_other_rules_are_ignored() {
        let v = Validation::presence("attr").minimum(3).only_integer();
        assert!(matches!(v.rule(), Rule::Presence));
    }
}
