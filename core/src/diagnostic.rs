//! Diagnostic Message Builder: renders a trace as a failure narrative
//!
//! ```text
//! Expected Example to validate that the length of :attr is at least 4, but
//! this could not be proved.
//!   After setting :attr to ‹"xxx"› -- which was read back as ‹"xxxa"› --
//!   the matcher expected the Example to be invalid, but it was valid
//!   instead.
//! ```
//!
//! The header and the indented reason are wrapped separately. Wording is
//! stable: downstream tests compare these messages verbatim.

use crate::word_wrap::{word_wrap, TERMINAL_WIDTH};
use crate::{Disproof, Expectation, ProbeResult, Trace, Value, Verdict};

/// Which way the matcher was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// `expect(model).to(matcher)`: the trace should prove.
    Positive,
    /// `expect(model).not_to(matcher)`: the trace should disprove.
    Negative,
}

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap width in characters.
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: TERMINAL_WIDTH,
        }
    }
}

/// Render the failure message for `trace` used with `polarity`.
///
/// A positive failure explains the counter-example. A negative failure (the
/// trace proved) explains the last probe with its expectation inverted.
#[must_use]
pub fn render(trace: &Trace, polarity: Polarity, options: &RenderOptions) -> String {
    let not = match polarity {
        Polarity::Positive => "",
        Polarity::Negative => " not",
    };
    let subject = format!("Expected {}{not} to {}", trace.model_name, trace.description);

    let reason = match (polarity, trace.verdict) {
        (_, Verdict::Unprovable) => Some(unprovable_reason()),
        (_, Verdict::Disproved { index, reason: Disproof::WriterInterference }) => trace
            .results
            .get(index)
            .map(|r| interference_explanation(trace, r)),
        (Polarity::Positive, Verdict::Disproved { index, reason }) => trace
            .results
            .get(index)
            .map(|r| probe_reason(trace, r, r.probe.expectation, reason)),
        (Polarity::Negative, Verdict::Proved) => trace.last().map(|r| {
            probe_reason(trace, r, r.probe.expectation.inverse(), Disproof::UnexpectedOutcome)
        }),
        (Polarity::Positive, Verdict::Proved) => None,
        (Polarity::Negative, Verdict::Disproved { .. }) => None,
    };

    match reason {
        Some(reason) => {
            let header = format!("{subject}, but this could not be proved.");
            format!(
                "{}\n{}",
                word_wrap(&header, options.width, 0),
                word_wrap(&reason, options.width, 2)
            )
        }
        None => {
            let closing = match polarity {
                Polarity::Positive => "and this was proved",
                Polarity::Negative => "and this was disproved",
            };
            word_wrap(&format!("{subject}, {closing}."), options.width, 0)
        }
    }
}

fn unprovable_reason() -> String {
    "The matcher was not given anything to check, so there was nothing to \
     prove."
        .to_string()
}

fn probe_reason(
    trace: &Trace,
    result: &ProbeResult,
    expected: Expectation,
    reason: Disproof,
) -> String {
    let mut text = preface(trace, result);
    text.push_str(&format!(" the {} to be", trace.model_name));

    match (expected, reason) {
        (Expectation::Reject, Disproof::MessageMismatch) => {
            text.push_str(&format!(
                " invalid and to produce {} on :{}. The record was indeed invalid, but it \
                 produced these validation errors instead:\n\n{}",
                result.probe.message.describe(),
                trace.attribute,
                error_listing(result)
            ));
        }
        (Expectation::Reject, _) => text.push_str(" invalid, but it was valid instead."),
        (Expectation::Accept, _) => {
            text.push_str(&format!(
                " valid, but it was invalid instead, producing these validation \
                 errors:\n\n{}",
                error_listing(result)
            ));
        }
    }

    if result.changed_value() {
        text.push_str("\n\n");
        text.push_str(&interference_note(&trace.attribute));
    }
    text
}

fn preface(trace: &Trace, result: &ProbeResult) -> String {
    let mut text = format!(
        "After setting :{} to ‹{}›",
        trace.attribute,
        result.written().inspect()
    );
    if result.changed_value() {
        text.push_str(&format!(
            " -- which was read back as ‹{}› -- the matcher expected",
            result.read_back.inspect()
        ));
    } else {
        text.push_str(", the matcher expected");
    }
    text
}

/// `* attr: ["is too short (minimum is 4 characters)"]`, one line per
/// attribute.
fn error_listing(result: &ProbeResult) -> String {
    result
        .errors
        .iter()
        .map(|(attribute, messages)| {
            let list = Value::List(messages.iter().cloned().map(Value::String).collect());
            format!("* {attribute}: {}", list.inspect())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn interference_note(attribute: &str) -> String {
    format!(
        "As indicated in the message above, :{attribute} seems to be changing certain values \
         as they are set, and this could have something to do with why this test is failing. \
         If you've overridden the writer method for this attribute, then you may need to \
         change it to make this test pass, or do something else entirely."
    )
}

fn interference_explanation(trace: &Trace, result: &ProbeResult) -> String {
    let attribute = &trace.attribute;
    format!(
        "The matcher attempted to set :{attribute} on the {model} to {written}, but when the \
         attribute was read back, it had stored {read} instead.\n\n\
         This creates problems because it means that the model is behaving in a way that is \
         interfering with the test -- there's a mismatch between the test that you wrote and \
         test that we actually ran.\n\n\
         There are a couple of reasons why this could be happening:\n\n\
         * The attribute is typecasting the incoming value.\n\
         * The writer method for :{attribute} has been overridden so that incoming values are \
         changed in some way.\n\n\
         If this exception makes sense to you and you wish to bypass it, try adding the \
         `ignoring_interference_by_writer` qualifier to the end of your matcher. If the test \
         still does not pass after that, then you may need to do something different.",
        model = trace.model_name,
        written = result.written().inspect(),
        read = result.read_back.inspect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Constraint, ConstraintKind, Interference, LengthBounds, MessageMatcher, Outcome, Probe,
        ProbeKind,
    };

    fn trace_with(result: ProbeResult, verdict: Verdict, strict: bool) -> Trace {
        let constraint = Constraint::new(
            "attr",
            ConstraintKind::Length(LengthBounds {
                minimum: Some(4),
                ..LengthBounds::default()
            }),
        );
        let mut trace = Trace::new(&constraint, "Example");
        trace.strict = strict;
        trace.results.push(result);
        trace.verdict = verdict;
        trace
    }

    fn result(
        value: &str,
        read_back: &str,
        expectation: Expectation,
        errors: &[&str],
    ) -> ProbeResult {
        let attribute_errors: Vec<String> = errors.iter().map(|e| (*e).to_string()).collect();
        let message = MessageMatcher::Exact("is too short (minimum is 4 characters)".into());
        let outcome = Outcome::classify(&attribute_errors, &message);
        let interference = if value == read_back {
            Interference::Absent
        } else {
            Interference::Interfering {
                read_back: Value::from(read_back),
                adjusted: expectation.inverse(),
            }
        };
        ProbeResult {
            probe: Probe {
                attribute: "attr".into(),
                value: Value::from(value),
                expectation,
                message,
                kind: ProbeKind::BelowMinimum,
            },
            read_back: Value::from(read_back),
            interference,
            valid: attribute_errors.is_empty(),
            errors: if attribute_errors.is_empty() {
                vec![]
            } else {
                vec![("attr".into(), attribute_errors.clone())]
            },
            matched: outcome.satisfies(expectation),
            attribute_errors,
            outcome,
        }
    }

    fn disproved(reason: Disproof) -> Verdict {
        Verdict::Disproved { index: 0, reason }
    }

    #[test]
    fn unexpected_acceptance() {
        let trace = trace_with(
            result("xxx", "xxx", Expectation::Reject, &[]),
            disproved(Disproof::UnexpectedOutcome),
            true,
        );
        assert_eq!(
            render(&trace, Polarity::Positive, &RenderOptions::default()),
            "Expected Example to validate that the length of :attr is at least 4, but\n\
             this could not be proved.\n  \
             After setting :attr to ‹\"xxx\"›, the matcher expected the Example to be\n  \
             invalid, but it was valid instead."
        );
    }

    #[test]
    fn negated_failure_inverts_the_last_probe() {
        let trace = trace_with(
            result("xxxx", "xxxx", Expectation::Accept, &[]),
            Verdict::Proved,
            true,
        );
        assert_eq!(
            render(&trace, Polarity::Negative, &RenderOptions::default()),
            "Expected Example not to validate that the length of :attr is at least 4,\n\
             but this could not be proved.\n  \
             After setting :attr to ‹\"xxxx\"›, the matcher expected the Example to\n  \
             be invalid, but it was valid instead."
        );
    }

    #[test]
    fn unexpected_rejection_lists_errors() {
        let trace = trace_with(
            result("xxxx", "xxxx", Expectation::Accept, &["is too short (minimum is 4 characters)"]),
            disproved(Disproof::UnexpectedOutcome),
            true,
        );
        let message = render(&trace, Polarity::Positive, &RenderOptions::default());
        assert!(message.ends_with(
            "producing these validation\n  errors:\n\n  \
             * attr: [\"is too short (minimum is 4 characters)\"]"
        ));
    }

    #[test]
    fn message_mismatch_names_the_expected_error() {
        let trace = trace_with(
            result("xxx", "xxx", Expectation::Reject, &["is way off"]),
            disproved(Disproof::MessageMismatch),
            true,
        );
        let message = render(&trace, Polarity::Positive, &RenderOptions::default());
        assert!(message.contains("invalid and to produce the validation error \"is too short"));
        assert!(message.ends_with("instead:\n\n  * attr: [\"is way off\"]"));
    }

    #[test]
    fn ignored_interference_appends_the_note() {
        let trace = trace_with(
            result("xxx", "xxxa", Expectation::Reject, &[]),
            disproved(Disproof::UnexpectedOutcome),
            false,
        );
        let message = render(&trace, Polarity::Positive, &RenderOptions::default());
        assert!(message.contains("-- which was read back as ‹\"xxxa\"› --"));
        assert!(message.ends_with("or\n  do something else entirely."));
    }

    #[test]
    fn strict_interference_is_explained() {
        let trace = trace_with(
            result("xxx", "xxxa", Expectation::Reject, &[]),
            disproved(Disproof::WriterInterference),
            true,
        );
        let message = render(&trace, Polarity::Positive, &RenderOptions::default());
        assert!(message.starts_with(
            "Expected Example to validate that the length of :attr is at least 4, but\n\
             this could not be proved.\n  \
             The matcher attempted to set :attr on the Example to \"xxx\", but when"
        ));
        assert!(message.contains("\n\n  * The attribute is typecasting the incoming value.\n"));
        assert!(message.contains("`ignoring_interference_by_writer`"));
    }

    #[test]
    fn unprovable_explains_itself() {
        let constraint = Constraint::new("attr", ConstraintKind::Length(LengthBounds::default()));
        let trace = Trace::new(&constraint, "Example");
        let message = render(&trace, Polarity::Positive, &RenderOptions::default());
        assert!(message.starts_with("Expected Example to validate that the length of :attr,"));
        assert!(message.contains("nothing"));
    }

    #[test]
    fn custom_width() {
        let trace = trace_with(
            result("xxx", "xxx", Expectation::Reject, &[]),
            disproved(Disproof::UnexpectedOutcome),
            true,
        );
        let message = render(&trace, Polarity::Positive, &RenderOptions { width: 40 });
        assert!(message.lines().all(|l| l.chars().count() <= 40));
    }
}
