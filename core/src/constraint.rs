//! Constraint Description: what a matcher claims the subject enforces
//!
//! A [`Constraint`] is a tagged union over validation kinds plus the
//! qualifiers shared by every kind. Matcher facades build one during their
//! configuration phase; from then on the evaluator only reads it.
//!
//! Every constraint can:
//!
//! - describe itself ("validate that the length of :attr is at least 4")
//! - predict the outcome for an arbitrary value ([`Constraint::verdict`]),
//!   which the interference detector uses to re-derive expectations
//! - check its own configuration ([`Constraint::validate`])

use crate::{AssayError, MessageKey, MessageSpec, Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// The outcome a probe expects from the subject's validations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Expectation {
    /// The value should be accepted (no matching error).
    Accept,
    /// The value should be rejected (a matching error on the attribute).
    Reject,
}

impl Expectation {
    /// The opposite expectation.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Accept => Self::Reject,
            Self::Reject => Self::Accept,
        }
    }

    /// "valid" or "invalid", as used in diagnostics.
    #[must_use]
    pub fn adjective(self) -> &'static str {
        match self {
            Self::Accept => "valid",
            Self::Reject => "invalid",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        })
    }
}

/// Qualifiers shared by every validation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    /// nil must be accepted regardless of the bounds.
    pub allow_nil: bool,
    /// Blank values must be accepted regardless of the bounds.
    pub allow_blank: bool,
    /// Probe with collections instead of strings.
    pub as_array: bool,
    /// Judge probes against their original expectation even when the
    /// attribute writer changes the value.
    pub ignoring_interference_by_writer: bool,
}

/// A numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Comparison {
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqualTo,
    /// `==`
    EqualTo,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqualTo,
    /// `!=`
    OtherThan,
}

impl Comparison {
    /// Whether `value` satisfies this comparison against `bound`.
    #[must_use]
    pub fn holds(self, value: Number, bound: Number) -> bool {
        match self {
            Self::GreaterThan => value > bound,
            Self::GreaterThanOrEqualTo => value >= bound,
            Self::EqualTo => value.partial_cmp(&bound) == Some(Ordering::Equal),
            Self::LessThan => value < bound,
            Self::LessThanOrEqualTo => value <= bound,
            Self::OtherThan => value.partial_cmp(&bound) != Some(Ordering::Equal),
        }
    }

    /// The catalog key of the message a violation produces.
    #[must_use]
    pub fn message_key(self) -> MessageKey {
        match self {
            Self::GreaterThan => MessageKey::GreaterThan,
            Self::GreaterThanOrEqualTo => MessageKey::GreaterThanOrEqualTo,
            Self::EqualTo => MessageKey::EqualTo,
            Self::LessThan => MessageKey::LessThan,
            Self::LessThanOrEqualTo => MessageKey::LessThanOrEqualTo,
            Self::OtherThan => MessageKey::OtherThan,
        }
    }

    /// "greater than", "less than or equal to", ...
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            Self::GreaterThan => "greater than",
            Self::GreaterThanOrEqualTo => "greater than or equal to",
            Self::EqualTo => "equal to",
            Self::LessThan => "less than",
            Self::LessThanOrEqualTo => "less than or equal to",
            Self::OtherThan => "other than",
        }
    }
}

/// Odd/even requirement of a numericality constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Parity {
    /// Must be odd.
    Odd,
    /// Must be even.
    Even,
}

/// The set an inclusion/exclusion constraint tests membership against.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    /// An explicit list of values.
    Values(Vec<Value>),
    /// An inclusive integer range.
    Range {
        /// Lowest member.
        low: i64,
        /// Highest member.
        high: i64,
    },
}

impl Membership {
    /// Whether `value` belongs to the set.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Self::Values(values) => values.contains(value),
            Self::Range { low, high } => match value.to_number() {
                Some(Number::Int(i)) => (*low..=*high).contains(&i),
                #[allow(clippy::cast_precision_loss)]
                Some(Number::Float(f)) => f >= *low as f64 && f <= *high as f64,
                None => false,
            },
        }
    }
}

/// Length bounds. An exact length is `minimum == maximum`.
#[derive(Debug, Clone, Default)]
pub struct LengthBounds {
    /// Shortest accepted length.
    pub minimum: Option<usize>,
    /// Longest accepted length.
    pub maximum: Option<usize>,
    /// Expected message for too-short values.
    pub short_message: MessageSpec,
    /// Expected message for too-long values.
    pub long_message: MessageSpec,
}

impl LengthBounds {
    /// Returns the exact length if `minimum == maximum`.
    #[must_use]
    pub fn exact(&self) -> Option<usize> {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) if min == max => Some(min),
            _ => None,
        }
    }
}

/// Numericality requirements.
#[derive(Debug, Clone, Default)]
pub struct NumericBounds {
    /// Only integers are accepted.
    pub only_integer: bool,
    /// Odd/even requirement.
    pub parity: Option<Parity>,
    /// Comparisons against bounds, in configuration order.
    pub comparisons: Vec<(Comparison, Number)>,
    /// Expected message for every rejection.
    pub message: MessageSpec,
}

/// The kind-specific part of a constraint.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// `validates_length_of`
    Length(LengthBounds),
    /// `validates_numericality_of`
    Numericality(NumericBounds),
    /// `validates_inclusion_of`
    Inclusion {
        /// Allowed values.
        set: Membership,
        /// Expected rejection message.
        message: MessageSpec,
    },
    /// `validates_exclusion_of`
    Exclusion {
        /// Forbidden values.
        set: Membership,
        /// Expected rejection message.
        message: MessageSpec,
    },
    /// `validates_presence_of`
    Presence {
        /// Expected rejection message.
        message: MessageSpec,
    },
    /// `validates_format_of`, checked through sample values.
    Format {
        /// Samples the format must accept.
        allowed: Vec<Value>,
        /// Samples the format must reject.
        rejected: Vec<Value>,
        /// Expected rejection message.
        message: MessageSpec,
    },
}

/// A complete constraint description.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// The attribute under test.
    pub attribute: String,
    /// What is validated.
    pub kind: ConstraintKind,
    /// Shared qualifiers.
    pub qualifiers: Qualifiers,
}

impl Constraint {
    /// Create a constraint with default qualifiers.
    pub fn new(attribute: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
            qualifiers: Qualifiers::default(),
        }
    }

    /// Check the configuration for contradictions.
    ///
    /// A constraint without any bound is not an error: it simply yields no
    /// probes and evaluates as unprovable.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::InvalidConstraint`] for contradictory bounds,
    /// empty sets, or inverted ranges.
    pub fn validate(&self) -> Result<(), AssayError> {
        let invalid = |reason: &str| {
            Err(AssayError::InvalidConstraint {
                attribute: self.attribute.clone(),
                reason: reason.to_string(),
            })
        };
        match &self.kind {
            ConstraintKind::Length(bounds) => match (bounds.minimum, bounds.maximum) {
                (Some(min), Some(max)) if min > max => {
                    invalid(&format!("minimum length {min} exceeds maximum length {max}"))
                }
                _ => Ok(()),
            },
            ConstraintKind::Numericality(bounds) => {
                if bounds
                    .comparisons
                    .iter()
                    .any(|(_, b)| matches!(b, Number::Float(f) if !f.is_finite()))
                {
                    return invalid("numeric bounds must be finite");
                }
                Ok(())
            }
            ConstraintKind::Inclusion { set, .. } | ConstraintKind::Exclusion { set, .. } => {
                match set {
                    Membership::Values(values) if values.is_empty() => {
                        invalid("the value list is empty")
                    }
                    Membership::Range { low, high } if low > high => {
                        invalid(&format!("range {low} to {high} is inverted"))
                    }
                    _ => Ok(()),
                }
            }
            ConstraintKind::Presence { .. } => Ok(()),
            ConstraintKind::Format {
                allowed, rejected, ..
            } => {
                if let Some(v) = allowed.iter().find(|v| rejected.contains(v)) {
                    return invalid(&format!("{} is both allowed and rejected", v.inspect()));
                }
                Ok(())
            }
        }
    }

    /// Natural-language description, completing "Expected Example to ...".
    ///
    /// ```
    /// use assay::{Constraint, ConstraintKind, LengthBounds};
    ///
    /// let c = Constraint::new(
    ///     "attr",
    ///     ConstraintKind::Length(LengthBounds { minimum: Some(4), ..Default::default() }),
    /// );
    /// assert_eq!(c.description(), "validate that the length of :attr is at least 4");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        let attr = &self.attribute;
        match &self.kind {
            ConstraintKind::Length(bounds) => {
                let mut d = format!("validate that the length of :{attr}");
                match (bounds.minimum, bounds.maximum) {
                    (Some(min), Some(max)) if min == max => d.push_str(&format!(" is {min}")),
                    (Some(min), Some(max)) => {
                        d.push_str(&format!(" is between {min} and {max}"));
                    }
                    (Some(min), None) => d.push_str(&format!(" is at least {min}")),
                    (None, Some(max)) => d.push_str(&format!(" is at most {max}")),
                    (None, None) => {}
                }
                d
            }
            ConstraintKind::Numericality(bounds) => {
                let base = if bounds.only_integer { "integer" } else { "number" };
                let kind = match bounds.parity {
                    Some(Parity::Odd) => format!("odd {base}"),
                    Some(Parity::Even) => format!("even {base}"),
                    None => base.to_string(),
                };
                let mut d = format!("validate that :{attr} looks like {}", a_or_an(&kind));
                let comparisons: Vec<String> = bounds
                    .comparisons
                    .iter()
                    .map(|(cmp, bound)| format!("{} {bound}", cmp.phrase()))
                    .collect();
                if !comparisons.is_empty() {
                    d.push(' ');
                    d.push_str(&comparisons.join(" and "));
                }
                d
            }
            ConstraintKind::Inclusion { set, .. } => match set {
                Membership::Range { low, high } => {
                    format!("validate that :{attr} lies inside the range ‹{low}› to ‹{high}›")
                }
                Membership::Values(values) if values.len() == 1 => {
                    format!("validate that :{attr} is {}", quoted_list(values, " or ", ", or "))
                }
                Membership::Values(values) => format!(
                    "validate that :{attr} is either {}",
                    quoted_list(values, " or ", ", or ")
                ),
            },
            ConstraintKind::Exclusion { set, .. } => match set {
                Membership::Range { low, high } => {
                    format!("validate that :{attr} lies outside the range ‹{low}› to ‹{high}›")
                }
                Membership::Values(values) if values.len() == 1 => {
                    format!("validate that :{attr} is not {}", quoted_list(values, "", ""))
                }
                Membership::Values(values) => format!(
                    "validate that :{attr} is neither {}",
                    quoted_list(values, " nor ", ", nor ")
                ),
            },
            ConstraintKind::Presence { .. } => {
                format!("validate that :{attr} cannot be empty/falsy")
            }
            ConstraintKind::Format {
                allowed, rejected, ..
            } => {
                let mut parts = Vec::new();
                if !allowed.is_empty() {
                    parts.push(format!("accepts {}", quoted_list(allowed, " and ", ", and ")));
                }
                if !rejected.is_empty() {
                    parts.push(format!("rejects {}", quoted_list(rejected, " and ", ", and ")));
                }
                if parts.is_empty() {
                    format!("validate the format of :{attr}")
                } else {
                    format!("validate that :{attr} {}", parts.join(" and "))
                }
            }
        }
    }

    /// Predict whether the constraint accepts or rejects `value`.
    ///
    /// Returns `None` when the constraint cannot judge the value (a format
    /// constraint only knows its sample values).
    #[must_use]
    pub fn verdict(&self, value: &Value) -> Option<Expectation> {
        let q = self.qualifiers;
        if value.is_nil() && q.allow_nil {
            return Some(Expectation::Accept);
        }
        let blank_exempt = q.allow_blank && value.is_blank();
        let accept_if = |ok: bool| {
            Some(if ok {
                Expectation::Accept
            } else {
                Expectation::Reject
            })
        };
        match &self.kind {
            ConstraintKind::Length(bounds) => {
                if blank_exempt {
                    return Some(Expectation::Accept);
                }
                let len = value.length();
                let long_enough = bounds.minimum.is_none_or(|min| len >= min);
                let short_enough = bounds.maximum.is_none_or(|max| len <= max);
                accept_if(long_enough && short_enough)
            }
            ConstraintKind::Numericality(bounds) => {
                let Some(n) = value.to_number() else {
                    return Some(Expectation::Reject);
                };
                if bounds.only_integer && !n.is_integer() {
                    return Some(Expectation::Reject);
                }
                let parity_ok = match (bounds.parity, n) {
                    (None, _) => true,
                    (Some(Parity::Odd), Number::Int(i)) => i % 2 != 0,
                    (Some(Parity::Even), Number::Int(i)) => i % 2 == 0,
                    (Some(_), Number::Float(_)) => false,
                };
                let compares = bounds.comparisons.iter().all(|(cmp, b)| cmp.holds(n, *b));
                accept_if(parity_ok && compares)
            }
            ConstraintKind::Inclusion { set, .. } => {
                if blank_exempt {
                    return Some(Expectation::Accept);
                }
                accept_if(set.contains(value))
            }
            ConstraintKind::Exclusion { set, .. } => {
                if blank_exempt {
                    return Some(Expectation::Accept);
                }
                accept_if(!set.contains(value))
            }
            ConstraintKind::Presence { .. } => accept_if(!value.is_blank()),
            ConstraintKind::Format {
                allowed, rejected, ..
            } => {
                if blank_exempt || allowed.contains(value) {
                    Some(Expectation::Accept)
                } else if rejected.contains(value) {
                    Some(Expectation::Reject)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

fn a_or_an(noun: &str) -> String {
    let article = match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{article} {noun}")
}

/// `‹a›`, `‹a› or ‹b›`, `‹a›, ‹b›, or ‹c›`
fn quoted_list(values: &[Value], two_connector: &str, last_connector: &str) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("‹{}›", v.inspect())).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first}{two_connector}{second}"),
        [init @ .., last] => format!("{}{last_connector}{last}", init.join(", ")),
    }
}
