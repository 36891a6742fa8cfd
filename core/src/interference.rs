//! Writer-Interference Detector
//!
//! A model's writer may change a value as it is set (typecasting, custom
//! setters). The probe then tests something other than what it wrote. The
//! detector compares the written value with the read-back value and asks
//! the constraint whether the change matters.

use crate::{Constraint, Expectation, Value};

/// What happened between writing a probe value and reading it back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "state"))]
pub enum Interference {
    /// The value was stored unchanged.
    Absent,
    /// The value changed, but the constraint judges the stored value the
    /// same way it judges the written one.
    Harmless {
        /// What the subject stored.
        read_back: Value,
    },
    /// The value changed enough to flip the expected outcome.
    Interfering {
        /// What the subject stored.
        read_back: Value,
        /// The expectation the stored value actually deserves.
        adjusted: Expectation,
    },
}

impl Interference {
    /// Returns `true` unless the value was stored unchanged.
    #[must_use]
    pub fn changed_value(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// The stored value, if it differs from the written one.
    #[must_use]
    pub fn read_back(&self) -> Option<&Value> {
        match self {
            Self::Absent => None,
            Self::Harmless { read_back } | Self::Interfering { read_back, .. } => Some(read_back),
        }
    }
}

/// Classify the difference between `written` and `read_back`.
///
/// ```
/// use assay::{detect, Constraint, ConstraintKind, Expectation, Interference, LengthBounds};
/// use assay::Value;
///
/// let c = Constraint::new(
///     "attr",
///     ConstraintKind::Length(LengthBounds { minimum: Some(4), ..Default::default() }),
/// );
/// // "xxx" was upcased: still 3 characters, still too short.
/// let seen = detect(&c, Expectation::Reject, &Value::from("xxx"), &Value::from("XXX"));
/// assert!(matches!(seen, Interference::Harmless { .. }));
///
/// // "xxx" had a character appended: now long enough.
/// let seen = detect(&c, Expectation::Reject, &Value::from("xxx"), &Value::from("xxxa"));
/// assert!(matches!(seen, Interference::Interfering { adjusted: Expectation::Accept, .. }));
/// ```
#[must_use]
pub fn detect(
    constraint: &Constraint,
    expected: Expectation,
    written: &Value,
    read_back: &Value,
) -> Interference {
    if written == read_back {
        return Interference::Absent;
    }
    match constraint.verdict(read_back) {
        Some(adjusted) if adjusted != expected => Interference::Interfering {
            read_back: read_back.clone(),
            adjusted,
        },
        _ => Interference::Harmless {
            read_back: read_back.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstraintKind, LengthBounds, MessageSpec};

    fn minimum(n: usize) -> Constraint {
        Constraint::new(
            "attr",
            ConstraintKind::Length(LengthBounds {
                minimum: Some(n),
                ..LengthBounds::default()
            }),
        )
    }

    #[test]
    fn unchanged_value_is_absent() {
        let seen = detect(
            &minimum(4),
            Expectation::Accept,
            &Value::from("xxxx"),
            &Value::from("xxxx"),
        );
        assert_eq!(seen, Interference::Absent);
        assert!(!seen.changed_value());
        assert!(seen.read_back().is_none());
    }

    #[test]
    fn shortening_an_accepted_value_interferes() {
        let seen = detect(
            &minimum(4),
            Expectation::Accept,
            &Value::from("xxxx"),
            &Value::from("xxx"),
        );
        assert_eq!(
            seen,
            Interference::Interfering {
                read_back: Value::from("xxx"),
                adjusted: Expectation::Reject,
            }
        );
    }

    #[test]
    fn unjudgeable_change_is_harmless() {
        let format = Constraint::new(
            "email",
            ConstraintKind::Format {
                allowed: vec![Value::from("a@b.c")],
                rejected: vec![],
                message: MessageSpec::Default,
            },
        );
        let seen = detect(
            &format,
            Expectation::Accept,
            &Value::from("a@b.c"),
            &Value::from("A@B.C"),
        );
        assert_eq!(seen.read_back(), Some(&Value::from("A@B.C")));
        assert!(matches!(seen, Interference::Harmless { .. }));
    }
}
