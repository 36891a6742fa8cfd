//! Evaluation trace: what every probe did and how the proof ended
//!
//! A [`Trace`] is produced by [`evaluate`](crate::evaluate) and consumed by
//! [`render`](crate::render). It is a plain record; nothing in it refers
//! back to the subject.
//!
//! # Invariants
//!
//! - A proved trace contains only matched results.
//! - A disproved trace ends with exactly one unmatched result, the one the
//!   verdict points at. Evaluation stops there.
//! - An unprovable trace contains no results.

use crate::{Constraint, Expectation, Interference, MessageMatcher, Probe, Value};
use std::fmt;

/// How the subject treated one probe value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// No error on the attribute.
    Accepted,
    /// An error matching the probe's message.
    Rejected,
    /// Errors on the attribute, none of them the expected one.
    OtherErrors,
}

impl Outcome {
    /// Classify the attribute's error messages against `message`.
    #[must_use]
    pub fn classify(attribute_errors: &[String], message: &MessageMatcher) -> Self {
        if message.matches_any(attribute_errors) {
            Self::Rejected
        } else if attribute_errors.is_empty() {
            Self::Accepted
        } else {
            Self::OtherErrors
        }
    }

    /// Whether this outcome is what `expectation` asked for.
    ///
    /// Non-matching errors count as acceptance: the value was not rejected
    /// for the reason under test.
    #[must_use]
    pub fn satisfies(self, expectation: Expectation) -> bool {
        match expectation {
            Expectation::Accept => self != Self::Rejected,
            Expectation::Reject => self == Self::Rejected,
        }
    }
}

/// Why a probe disproved the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Disproof {
    /// Accepted when rejection was expected, or the other way round.
    UnexpectedOutcome,
    /// Rejected, but with errors other than the expected message.
    MessageMismatch,
    /// The writer changed the value enough to invalidate the probe.
    WriterInterference,
}

/// How an evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "verdict"))]
pub enum Verdict {
    /// Every probe matched its expectation.
    Proved,
    /// The probe at `index` did not.
    Disproved {
        /// Index of the counter-example in [`Trace::results`].
        index: usize,
        /// Why it disproved the constraint.
        reason: Disproof,
    },
    /// There was nothing to probe.
    Unprovable,
}

/// The result of applying one probe to the subject.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProbeResult {
    /// The probe that was applied.
    pub probe: Probe,
    /// The value read back after writing.
    pub read_back: Value,
    /// Whether and how the writer changed the value.
    pub interference: Interference,
    /// Overall record validity from the validation run.
    pub valid: bool,
    /// Error messages on the probed attribute.
    pub attribute_errors: Vec<String>,
    /// Error listing for diagnostics: every attribute with errors, in
    /// registration order.
    pub errors: Vec<(String, Vec<String>)>,
    /// How the subject treated the value.
    pub outcome: Outcome,
    /// Whether the outcome matched the probe's expectation.
    pub matched: bool,
}

impl ProbeResult {
    /// The value written, as shown in diagnostics.
    #[must_use]
    pub fn written(&self) -> &Value {
        &self.probe.value
    }

    /// Returns `true` if the stored value differs from the written one.
    #[must_use]
    pub fn changed_value(&self) -> bool {
        self.interference.changed_value()
    }
}

/// Everything one evaluation observed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trace {
    /// Model name reported by the subject.
    pub model_name: String,
    /// Attribute under test.
    pub attribute: String,
    /// Natural-language constraint description.
    pub description: String,
    /// `false` when the matcher ignores interference by the writer.
    pub strict: bool,
    /// Applied probes, in order.
    pub results: Vec<ProbeResult>,
    /// How the evaluation ended.
    pub verdict: Verdict,
}

impl Trace {
    /// An empty, unprovable trace for `constraint` against `model_name`.
    #[must_use]
    pub fn new(constraint: &Constraint, model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            attribute: constraint.attribute.clone(),
            description: constraint.description(),
            strict: !constraint.qualifiers.ignoring_interference_by_writer,
            results: Vec::new(),
            verdict: Verdict::Unprovable,
        }
    }

    /// Returns `true` if every probe matched.
    #[must_use]
    pub fn proves(&self) -> bool {
        self.verdict == Verdict::Proved
    }

    /// Returns `true` if a probe found a genuine counter-example.
    ///
    /// Interference in strict mode is not a counter-example: the subject
    /// was never tested with the intended value, so neither polarity holds.
    #[must_use]
    pub fn disproves(&self) -> bool {
        matches!(
            self.verdict,
            Verdict::Disproved { reason, .. } if reason != Disproof::WriterInterference
        )
    }

    /// The counter-example, if the trace was disproved.
    #[must_use]
    pub fn counter_example(&self) -> Option<(&ProbeResult, Disproof)> {
        match self.verdict {
            Verdict::Disproved { index, reason } => self.results.get(index).map(|r| (r, reason)),
            Verdict::Proved | Verdict::Unprovable => None,
        }
    }

    /// The last applied probe.
    #[must_use]
    pub fn last(&self) -> Option<&ProbeResult> {
        self.results.last()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} :{} ({})", self.model_name, self.attribute, self.description)?;
        for (i, r) in self.results.iter().enumerate() {
            let mark = if r.matched { "ok" } else { "FAIL" };
            write!(f, "  [{i}] {mark} {}", r.probe)?;
            if let Some(read) = r.interference.read_back() {
                write!(f, " read back {read}")?;
            }
            writeln!(f, " -> {:?} {:?}", r.outcome, r.attribute_errors)?;
        }
        write!(f, "  => {:?}", self.verdict)
    }
}
