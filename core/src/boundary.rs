//! Boundary Value Generator: probes that straddle each configured bound
//!
//! [`generate`] turns a [`Constraint`] into an ordered list of [`Probe`]s.
//! Each probe writes one value and states whether the subject should accept
//! or reject it, and with which message.
//!
//! # Ordering
//!
//! 1. Kind-specific probes. For bounded kinds the lower bound comes first,
//!    then the upper bound. Within each bound, the out-of-bound value comes
//!    before the boundary value.
//! 2. Qualifier probes (`allow_nil`, `allow_blank`) come last.
//!
//! Duplicates (same value, same expectation) are dropped. An exact length
//! `N` therefore yields `N-1`, `N`, `N+1` rather than four probes.

use crate::constraint::{
    Comparison, Constraint, ConstraintKind, Expectation, LengthBounds, Membership, NumericBounds,
    Parity,
};
use crate::{
    Interpolation, Locale, MessageKey, MessageMatcher, Number, Value,
    ARBITRARY_OUTSIDE_INTEGER, ARBITRARY_OUTSIDE_STRING,
};
use std::fmt;

/// Why a probe exists. Carried into traces and debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum ProbeKind {
    /// One below the minimum length.
    BelowMinimum,
    /// Exactly the minimum length.
    AtMinimum,
    /// One above the maximum length.
    AboveMaximum,
    /// Exactly the maximum length.
    AtMaximum,
    /// A non-numeric string.
    NotANumber,
    /// A numeric but fractional value.
    NotAnInteger,
    /// A value of the wrong parity.
    Parity,
    /// A neighbour of a comparison bound.
    Comparison {
        /// The operator under test.
        operator: Comparison,
    },
    /// A member of the inclusion/exclusion set.
    Member,
    /// A value outside the inclusion/exclusion set.
    NonMember,
    /// nil or blank, for presence.
    Blank,
    /// A sample a format must accept.
    AllowedSample,
    /// A sample a format must reject.
    RejectedSample,
    /// nil, from the `allow_nil` qualifier.
    AllowNil,
    /// Blank, from the `allow_blank` qualifier.
    AllowBlank,
}

/// One attempt: write a value, validate, compare against an expectation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Probe {
    /// The attribute to write.
    pub attribute: String,
    /// The value to write.
    pub value: Value,
    /// What the subject should do with it.
    pub expectation: Expectation,
    /// The error a rejection must carry.
    pub message: MessageMatcher,
    /// Why the probe exists.
    pub kind: ProbeKind,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} :{} = {} ({})",
            self.expectation, self.attribute, self.value, self.message
        )
    }
}

/// Whether probe values are strings or collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// `"x" * n`
    #[default]
    Scalar,
    /// `["x"] * n`
    Collection,
}

impl Shape {
    fn sized(self, len: usize) -> Value {
        match self {
            Self::Scalar => Value::string_of_length(len),
            Self::Collection => Value::list_of_length(len),
        }
    }

    fn blank(self) -> Value {
        self.sized(0)
    }
}

/// Everything generation needs besides the constraint itself.
#[derive(Debug, Clone, Copy)]
pub struct ProbeContext<'a> {
    /// The subject's model name, for `%{model}` interpolation.
    pub model_name: &'a str,
    /// The catalog default messages come from.
    pub locale: &'a Locale,
    /// Probe value shape.
    pub shape: Shape,
}

/// Generate the ordered probe list for `constraint`.
///
/// ```
/// use assay::{generate, Constraint, ConstraintKind, Expectation, LengthBounds, Locale};
/// use assay::{ProbeContext, Shape, Value};
///
/// let constraint = Constraint::new(
///     "attr",
///     ConstraintKind::Length(LengthBounds { minimum: Some(4), ..Default::default() }),
/// );
/// let locale = Locale::english();
/// let ctx = ProbeContext { model_name: "Example", locale: &locale, shape: Shape::Scalar };
/// let probes = generate(&constraint, &ctx);
///
/// assert_eq!(probes.len(), 2);
/// assert_eq!(probes[0].value, Value::from("xxx"));
/// assert_eq!(probes[0].expectation, Expectation::Reject);
/// assert_eq!(probes[1].value, Value::from("xxxx"));
/// assert_eq!(probes[1].expectation, Expectation::Accept);
/// ```
#[must_use]
pub fn generate(constraint: &Constraint, ctx: &ProbeContext<'_>) -> Vec<Probe> {
    let mut probes = Probes {
        attribute: &constraint.attribute,
        list: Vec::new(),
    };
    let messages = Messages {
        ctx,
        attribute: &constraint.attribute,
    };
    let q = constraint.qualifiers;

    let qualifier_message = match &constraint.kind {
        ConstraintKind::Length(bounds) => {
            length_probes(&mut probes, bounds, q.allow_blank, ctx.shape, &messages)
        }
        ConstraintKind::Numericality(bounds) => numericality_probes(&mut probes, bounds, &messages),
        ConstraintKind::Inclusion { set, message } => {
            let m = message.resolve(|| messages.exact(MessageKey::Inclusion, None));
            membership_probes(&mut probes, set, &m, Expectation::Accept);
            Some(m)
        }
        ConstraintKind::Exclusion { set, message } => {
            let m = message.resolve(|| messages.exact(MessageKey::Exclusion, None));
            membership_probes(&mut probes, set, &m, Expectation::Reject);
            Some(m)
        }
        ConstraintKind::Presence { message } => {
            let m = message.resolve(|| messages.exact(MessageKey::Blank, None));
            probes.push(Value::Nil, Expectation::Reject, &m, ProbeKind::Blank);
            probes.push(ctx.shape.blank(), Expectation::Reject, &m, ProbeKind::Blank);
            Some(m)
        }
        ConstraintKind::Format {
            allowed,
            rejected,
            message,
        } => {
            let m = message.resolve(|| messages.exact(MessageKey::Invalid, None));
            for value in allowed {
                probes.push(value.clone(), Expectation::Accept, &m, ProbeKind::AllowedSample);
            }
            for value in rejected {
                probes.push(value.clone(), Expectation::Reject, &m, ProbeKind::RejectedSample);
            }
            Some(m)
        }
    };

    // A kind with nothing to check has no message to attach qualifiers to,
    // and no probes at all.
    if let Some(m) = qualifier_message {
        if q.allow_nil {
            probes.push(Value::Nil, Expectation::Accept, &m, ProbeKind::AllowNil);
        }
        if q.allow_blank {
            probes.push(ctx.shape.blank(), Expectation::Accept, &m, ProbeKind::AllowBlank);
        }
    }

    probes.list
}

// ═══════════════════════════════════════════════════════════════════════════════
// Per-kind generation
// ═══════════════════════════════════════════════════════════════════════════════

fn length_probes(
    probes: &mut Probes<'_>,
    bounds: &LengthBounds,
    allow_blank: bool,
    shape: Shape,
    messages: &Messages<'_>,
) -> Option<MessageMatcher> {
    let exact = bounds.exact().is_some();
    let mut first = None;

    if let Some(min) = bounds.minimum {
        let m = bounds.short_message.resolve(|| {
            let family = if exact {
                [MessageKey::WrongLength, MessageKey::TooShort]
            } else {
                [MessageKey::TooShort, MessageKey::WrongLength]
            };
            messages.family(&family, min)
        });
        // A blank value is exempt under allow_blank, so a one-below probe of
        // length zero would prove nothing.
        if min > 0 && !(min == 1 && allow_blank) {
            probes.push(shape.sized(min - 1), Expectation::Reject, &m, ProbeKind::BelowMinimum);
        }
        probes.push(shape.sized(min), Expectation::Accept, &m, ProbeKind::AtMinimum);
        first = Some(m);
    }

    if let Some(max) = bounds.maximum {
        let m = bounds.long_message.resolve(|| {
            let family = if exact {
                [MessageKey::WrongLength, MessageKey::TooLong]
            } else {
                [MessageKey::TooLong, MessageKey::WrongLength]
            };
            messages.family(&family, max)
        });
        probes.push(shape.sized(max + 1), Expectation::Reject, &m, ProbeKind::AboveMaximum);
        probes.push(shape.sized(max), Expectation::Accept, &m, ProbeKind::AtMaximum);
        first.get_or_insert(m);
    }

    first
}

fn numericality_probes(
    probes: &mut Probes<'_>,
    bounds: &NumericBounds,
    messages: &Messages<'_>,
) -> Option<MessageMatcher> {
    let custom = &bounds.message;
    let nan = custom.resolve(|| messages.exact(MessageKey::NotANumber, None));
    probes.push(Value::from("abcd"), Expectation::Reject, &nan, ProbeKind::NotANumber);

    if bounds.only_integer {
        let m = custom.resolve(|| messages.exact(MessageKey::NotAnInteger, None));
        probes.push(Value::from("0.1"), Expectation::Reject, &m, ProbeKind::NotAnInteger);
    }

    match bounds.parity {
        Some(Parity::Odd) => {
            let m = custom.resolve(|| messages.exact(MessageKey::Odd, None));
            probes.push(Value::Int(2), Expectation::Reject, &m, ProbeKind::Parity);
        }
        Some(Parity::Even) => {
            let m = custom.resolve(|| messages.exact(MessageKey::Even, None));
            probes.push(Value::Int(1), Expectation::Reject, &m, ProbeKind::Parity);
        }
        None => {}
    }

    for &(operator, bound) in &bounds.comparisons {
        let m = custom.resolve(|| messages.exact(operator.message_key(), Some(bound)));
        for step in [-1, 0, 1] {
            let value = bound.offset(step);
            let expectation = if operator.holds(value, bound) {
                Expectation::Accept
            } else {
                Expectation::Reject
            };
            probes.push(Value::from(value), expectation, &m, ProbeKind::Comparison { operator });
        }
    }

    Some(nan)
}

/// `member` is the expectation for values inside the set.
fn membership_probes(
    probes: &mut Probes<'_>,
    set: &Membership,
    m: &MessageMatcher,
    member: Expectation,
) {
    let outside = member.inverse();
    match set {
        Membership::Values(values) => {
            for value in values {
                probes.push(value.clone(), member, m, ProbeKind::Member);
            }
            probes.push(outside_value(values), outside, m, ProbeKind::NonMember);
        }
        Membership::Range { low, high } => {
            if let Some(below) = low.checked_sub(1) {
                probes.push(Value::Int(below), outside, m, ProbeKind::NonMember);
            }
            probes.push(Value::Int(*low), member, m, ProbeKind::Member);
            probes.push(Value::Int(*high), member, m, ProbeKind::Member);
            if let Some(above) = high.checked_add(1) {
                probes.push(Value::Int(above), outside, m, ProbeKind::NonMember);
            }
        }
    }
}

/// A value of the same type as the set's members that is not one of them.
fn outside_value(values: &[Value]) -> Value {
    match values.first() {
        Some(Value::Bool(_)) => [Value::Bool(true), Value::Bool(false)]
            .into_iter()
            .find(|b| !values.contains(b))
            .unwrap_or(Value::Nil),
        Some(Value::Int(_)) => {
            let ints = || {
                values.iter().filter_map(|v| match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
            };
            let max = ints().max().unwrap_or(0);
            let min = ints().min().unwrap_or(0);
            let candidate = Value::Int(ARBITRARY_OUTSIDE_INTEGER);
            if values.contains(&candidate) || max >= ARBITRARY_OUTSIDE_INTEGER {
                max.checked_add(1)
                    .or_else(|| min.checked_sub(1))
                    .map_or(Value::Nil, Value::Int)
            } else {
                candidate
            }
        }
        Some(Value::Float(_)) => {
            let max = values
                .iter()
                .filter_map(|v| v.to_number().map(Number::as_f64))
                .fold(0.0_f64, f64::max);
            Value::Float(max + 1.0)
        }
        _ => {
            let mut candidate = ARBITRARY_OUTSIDE_STRING.to_string();
            while values.contains(&Value::String(candidate.clone())) {
                candidate.push('!');
            }
            Value::String(candidate)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

struct Probes<'a> {
    attribute: &'a str,
    list: Vec<Probe>,
}

impl Probes<'_> {
    fn push(
        &mut self,
        value: Value,
        expectation: Expectation,
        message: &MessageMatcher,
        kind: ProbeKind,
    ) {
        let duplicate = self
            .list
            .iter()
            .any(|p| p.value == value && p.expectation == expectation);
        if !duplicate {
            self.list.push(Probe {
                attribute: self.attribute.to_string(),
                value,
                expectation,
                message: message.clone(),
                kind,
            });
        }
    }
}

struct Messages<'a> {
    ctx: &'a ProbeContext<'a>,
    attribute: &'a str,
}

impl Messages<'_> {
    fn vars(&self, count: Option<String>) -> Interpolation {
        let vars = Interpolation::new()
            .attribute(self.attribute)
            .model(self.ctx.model_name);
        match count {
            Some(c) => vars.count(c),
            None => vars,
        }
    }

    fn exact(&self, key: MessageKey, count: Option<Number>) -> MessageMatcher {
        let vars = self.vars(count.map(|n| n.to_string()));
        MessageMatcher::Exact(self.ctx.locale.message(key, &vars))
    }

    fn family(&self, keys: &[MessageKey], count: usize) -> MessageMatcher {
        let vars = self.vars(Some(count.to_string()));
        MessageMatcher::AnyOf(keys.iter().map(|k| self.ctx.locale.message(*k, &vars)).collect())
    }
}
