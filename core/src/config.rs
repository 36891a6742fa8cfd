//! Config types for declarative matcher construction.
//!
//! These types mirror the facade builders but are serde-deserializable,
//! so fixtures and the CLI can describe matchers as YAML:
//!
//! ```yaml
//! attribute: name
//! kind: length
//! is_at_least: 4
//! allow_nil: true
//! short_message: "/too short/"
//! ```
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader |
//! |-------------|-------------|--------|
//! | [`MatcherConfig`] | `Box<dyn Matcher>` | [`MatcherConfig::build`] |
//! | [`MessageConfig`] | [`MessageSpec`] | [`MessageConfig::to_spec`] |

use crate::{
    validate_exclusion_of, validate_format_of, validate_inclusion_of, validate_length_of,
    validate_numericality_of, validate_presence_of, AssayError, Matcher, MessageSpec, Number,
    Qualifiers, Value,
};
use serde::Deserialize;

/// Configuration for one matcher.
///
/// The kind-specific part is flattened, so the `kind` tag sits next to the
/// shared fields.
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherConfig {
    /// The attribute under test.
    pub attribute: String,

    /// What is validated.
    #[serde(flatten)]
    pub kind: KindConfig,

    /// nil must be accepted.
    #[serde(default)]
    pub allow_nil: bool,

    /// Blank values must be accepted.
    #[serde(default)]
    pub allow_blank: bool,

    /// Probe with collections instead of strings.
    #[serde(default)]
    pub as_array: bool,

    /// Judge probes by the written value even when the writer changes it.
    #[serde(default)]
    pub ignoring_interference_by_writer: bool,

    /// Expected message for every rejection.
    #[serde(default)]
    pub message: Option<MessageConfig>,
}

/// Kind-specific configuration.
///
/// Uses `#[serde(tag = "kind")]`:
///
/// ```yaml
/// { kind: length, is_at_most: 10 }
/// { kind: numericality, only_integer: true, greater_than: 0 }
/// { kind: inclusion, in_array: [open, closed] }
/// { kind: exclusion, in_range: [1, 5] }
/// { kind: presence }
/// { kind: format, allowing: ["a@b.c"], rejecting: ["nope"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindConfig {
    /// `validate_length_of`
    Length {
        /// Shortest accepted length.
        #[serde(default)]
        is_at_least: Option<usize>,
        /// Longest accepted length.
        #[serde(default)]
        is_at_most: Option<usize>,
        /// The only accepted length.
        #[serde(default)]
        is_equal_to: Option<usize>,
        /// Expected message for too-short values.
        #[serde(default)]
        short_message: Option<MessageConfig>,
        /// Expected message for too-long values.
        #[serde(default)]
        long_message: Option<MessageConfig>,
    },

    /// `validate_numericality_of`
    Numericality {
        /// Only integers are accepted.
        #[serde(default)]
        only_integer: bool,
        /// Only odd numbers are accepted.
        #[serde(default)]
        odd: bool,
        /// Only even numbers are accepted.
        #[serde(default)]
        even: bool,
        /// Values must be `> bound`.
        #[serde(default)]
        greater_than: Option<Number>,
        /// Values must be `>= bound`.
        #[serde(default)]
        greater_than_or_equal_to: Option<Number>,
        /// Values must be `== bound`.
        #[serde(default)]
        equal_to: Option<Number>,
        /// Values must be `< bound`.
        #[serde(default)]
        less_than: Option<Number>,
        /// Values must be `<= bound`.
        #[serde(default)]
        less_than_or_equal_to: Option<Number>,
        /// Values must be `!= bound`.
        #[serde(default)]
        other_than: Option<Number>,
    },

    /// `validate_inclusion_of`
    Inclusion {
        /// Allowed values.
        #[serde(default)]
        in_array: Option<Vec<Value>>,
        /// Allowed integer range, `[low, high]`.
        #[serde(default)]
        in_range: Option<(i64, i64)>,
    },

    /// `validate_exclusion_of`
    Exclusion {
        /// Forbidden values.
        #[serde(default)]
        in_array: Option<Vec<Value>>,
        /// Forbidden integer range, `[low, high]`.
        #[serde(default)]
        in_range: Option<(i64, i64)>,
    },

    /// `validate_presence_of`
    Presence,

    /// `validate_format_of`
    Format {
        /// Samples the format must accept.
        #[serde(default)]
        allowing: Vec<Value>,
        /// Samples the format must reject.
        #[serde(default)]
        rejecting: Vec<Value>,
    },
}

/// A message qualifier as written in config.
///
/// A string wrapped in slashes (`"/too short/"`) is a pattern; anything else
/// is an exact message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MessageConfig(pub String);

impl MessageConfig {
    /// Convert to a [`MessageSpec`], compiling patterns.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::InvalidPattern`] if a pattern does not compile.
    pub fn to_spec(&self) -> Result<MessageSpec, AssayError> {
        let raw = self.0.as_str();
        match raw
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) => MessageSpec::pattern(pattern),
            None => Ok(MessageSpec::from(raw)),
        }
    }
}

const ONE_SET: &str = "exactly one of in_array or in_range is required";

fn spec(message: Option<&MessageConfig>) -> Result<MessageSpec, AssayError> {
    message.map_or(Ok(MessageSpec::Default), MessageConfig::to_spec)
}

impl MatcherConfig {
    /// Parse a single matcher from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::Config`] if the YAML does not describe a matcher.
    pub fn from_yaml(yaml: &str) -> Result<Self, AssayError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The shared qualifiers.
    #[must_use]
    pub fn qualifiers(&self) -> Qualifiers {
        Qualifiers {
            allow_nil: self.allow_nil,
            allow_blank: self.allow_blank,
            as_array: self.as_array,
            ignoring_interference_by_writer: self.ignoring_interference_by_writer,
        }
    }

    /// Build the runtime matcher.
    ///
    /// # Errors
    ///
    /// - [`AssayError::InvalidPattern`] for a message pattern that does not compile.
    /// - [`AssayError::InvalidConfig`] for options that cannot be combined.
    /// - [`AssayError::InvalidConstraint`] for contradictory bounds.
    pub fn build(&self) -> Result<Box<dyn Matcher>, AssayError> {
        let message = spec(self.message.as_ref())?;

        let mut matcher: Box<dyn Matcher> = match &self.kind {
            KindConfig::Length {
                is_at_least,
                is_at_most,
                is_equal_to,
                short_message,
                long_message,
            } => {
                let mut m = validate_length_of(&self.attribute);
                if let Some(n) = is_equal_to {
                    if is_at_least.is_some() || is_at_most.is_some() {
                        return Err(self.invalid(
                            "is_equal_to cannot be combined with is_at_least or is_at_most",
                        ));
                    }
                    m = m.is_equal_to(*n);
                }
                if let Some(n) = is_at_least {
                    m = m.is_at_least(*n);
                }
                if let Some(n) = is_at_most {
                    m = m.is_at_most(*n);
                }
                if !message.is_default() {
                    m = m.with_message(message);
                }
                if short_message.is_some() {
                    m = m.with_short_message(spec(short_message.as_ref())?);
                }
                if long_message.is_some() {
                    m = m.with_long_message(spec(long_message.as_ref())?);
                }
                Box::new(m)
            }

            KindConfig::Numericality {
                only_integer,
                odd,
                even,
                greater_than,
                greater_than_or_equal_to,
                equal_to,
                less_than,
                less_than_or_equal_to,
                other_than,
            } => {
                if *odd && *even {
                    return Err(self.invalid("odd and even cannot both be set"));
                }
                let mut m = validate_numericality_of(&self.attribute).with_message(message);
                if *only_integer {
                    m = m.only_integer();
                }
                if *odd {
                    m = m.odd();
                }
                if *even {
                    m = m.even();
                }
                if let Some(b) = greater_than {
                    m = m.is_greater_than(*b);
                }
                if let Some(b) = greater_than_or_equal_to {
                    m = m.is_greater_than_or_equal_to(*b);
                }
                if let Some(b) = equal_to {
                    m = m.is_equal_to(*b);
                }
                if let Some(b) = less_than {
                    m = m.is_less_than(*b);
                }
                if let Some(b) = less_than_or_equal_to {
                    m = m.is_less_than_or_equal_to(*b);
                }
                if let Some(b) = other_than {
                    m = m.is_other_than(*b);
                }
                Box::new(m)
            }

            KindConfig::Inclusion { in_array, in_range } => {
                let m = validate_inclusion_of(&self.attribute).with_message(message);
                match (in_array, in_range) {
                    (Some(values), None) => Box::new(m.in_array(values.iter().cloned())),
                    (None, Some((low, high))) => Box::new(m.in_range(*low..=*high)),
                    _ => return Err(self.invalid(ONE_SET)),
                }
            }

            KindConfig::Exclusion { in_array, in_range } => {
                let m = validate_exclusion_of(&self.attribute).with_message(message);
                match (in_array, in_range) {
                    (Some(values), None) => Box::new(m.in_array(values.iter().cloned())),
                    (None, Some((low, high))) => Box::new(m.in_range(*low..=*high)),
                    _ => return Err(self.invalid(ONE_SET)),
                }
            }

            KindConfig::Presence => {
                Box::new(validate_presence_of(&self.attribute).with_message(message))
            }

            KindConfig::Format {
                allowing,
                rejecting,
            } => Box::new(
                validate_format_of(&self.attribute)
                    .allowing(allowing.iter().cloned())
                    .rejecting(rejecting.iter().cloned())
                    .with_message(message),
            ),
        };

        matcher.validation_mut().constraint_mut().qualifiers = self.qualifiers();
        matcher.validation().constraint().validate()?;
        Ok(matcher)
    }

    fn invalid(&self, reason: &str) -> AssayError {
        AssayError::InvalidConfig {
            reason: format!(":{}: {reason}", self.attribute),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_length_config() {
        let config = MatcherConfig::from_yaml(
            "attribute: name\nkind: length\nis_at_least: 4\nallow_nil: true\n",
        )
        .unwrap();
        assert_eq!(config.attribute, "name");
        assert!(config.allow_nil);
        assert!(matches!(
            config.kind,
            KindConfig::Length {
                is_at_least: Some(4),
                is_at_most: None,
                ..
            }
        ));
    }

    #[test]
    fn build_describes_like_the_facade() {
        let config =
            MatcherConfig::from_yaml("attribute: name\nkind: length\nis_equal_to: 4\n").unwrap();
        let matcher = config.build().unwrap();
        assert_eq!(
            matcher.description(),
            validate_length_of("name").is_equal_to(4).description()
        );
    }

    #[test]
    fn numericality_bounds() {
        let config = MatcherConfig::from_yaml(
            "attribute: age\nkind: numericality\nonly_integer: true\ngreater_than_or_equal_to: 18\n",
        )
        .unwrap();
        assert_eq!(
            config.build().unwrap().description(),
            "validate that :age looks like an integer greater than or equal to 18"
        );
    }

    #[test]
    fn inclusion_from_array_and_range() {
        let array = MatcherConfig::from_yaml(
            "attribute: state\nkind: inclusion\nin_array: [open, closed]\n",
        )
        .unwrap();
        assert_eq!(
            array.build().unwrap().description(),
            r#"validate that :state is either ‹"open"› or ‹"closed"›"#
        );

        let range =
            MatcherConfig::from_yaml("attribute: rating\nkind: exclusion\nin_range: [1, 5]\n")
                .unwrap();
        assert!(range.build().is_ok());
    }

    #[test]
    fn inclusion_needs_exactly_one_set() {
        let config = MatcherConfig::from_yaml("attribute: state\nkind: inclusion\n").unwrap();
        assert!(matches!(
            config.build(),
            Err(AssayError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn slashed_message_is_a_pattern() {
        let spec = MessageConfig("/too short/".into()).to_spec().unwrap();
        assert!(matches!(spec, MessageSpec::Pattern(_)));

        let spec = MessageConfig("too short".into()).to_spec().unwrap();
        assert!(matches!(spec, MessageSpec::Exact(ref m) if m == "too short"));

        let err = MessageConfig("/(/".into()).to_spec().unwrap_err();
        assert!(matches!(err, AssayError::InvalidPattern { .. }));
    }

    #[test]
    fn qualifiers_are_applied() {
        let config = MatcherConfig::from_yaml(
            "attribute: tags\nkind: presence\nas_array: true\nignoring_interference_by_writer: true\n",
        )
        .unwrap();
        let matcher = config.build().unwrap();
        let q = matcher.validation().constraint().qualifiers;
        assert!(q.as_array);
        assert!(q.ignoring_interference_by_writer);
        assert!(!q.allow_nil);
    }

    #[test]
    fn contradictory_bounds_fail_at_build() {
        let config = MatcherConfig::from_yaml(
            "attribute: name\nkind: length\nis_at_least: 5\nis_at_most: 2\n",
        )
        .unwrap();
        assert!(matches!(
            config.build(),
            Err(AssayError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = MatcherConfig::from_yaml("attribute: x\nkind: uniqueness\n").unwrap_err();
        assert!(matches!(err, AssayError::Config(_)));
    }
}
