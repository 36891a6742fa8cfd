//! Proof Evaluator: runs probes against a subject until one disproves
//!
//! ```text
//! for each probe:
//!     set attribute → read back → detect interference
//!     run validations → classify errors → compare with expectation
//!     first mismatch ends the evaluation
//! ```
//!
//! The evaluator is the only component that touches the subject. It takes
//! exclusive access for the whole evaluation and applies probes strictly in
//! generation order.

use crate::{
    generate, Constraint, Disproof, Expectation, Interference, Locale, Outcome, Probe,
    ProbeContext, ProbeResult, Shape, Subject, Trace, Verdict,
};
use crate::{detect, AssayError};
use tracing::{debug, trace};

/// Evaluate `constraint` against `subject`.
///
/// Unprovable and disproved outcomes are reported through the trace's
/// [`Verdict`]; only adapter contract violations and configuration
/// mistakes are errors.
///
/// # Errors
///
/// - [`AssayError::InvalidConstraint`] if the constraint contradicts itself.
/// - [`AssayError::Subject`] if the subject fails a set, get or validation.
pub fn evaluate(
    constraint: &Constraint,
    subject: &mut dyn Subject,
    locale: &Locale,
) -> Result<Trace, AssayError> {
    constraint.validate()?;

    let model_name = subject.model_name().to_string();
    let shape = if constraint.qualifiers.as_array
        || subject.supports_collection_attribute(&constraint.attribute)
    {
        Shape::Collection
    } else {
        Shape::Scalar
    };
    let ctx = ProbeContext {
        model_name: &model_name,
        locale,
        shape,
    };
    let probes = generate(constraint, &ctx);
    let mut trace = Trace::new(constraint, model_name.as_str());

    if probes.is_empty() {
        debug!(
            model = %model_name,
            attribute = %constraint.attribute,
            "no probes generated, constraint is unprovable"
        );
        return Ok(trace);
    }

    for (index, probe) in probes.into_iter().enumerate() {
        let result = apply(constraint, subject, probe)?;
        debug!(
            model = %model_name,
            attribute = %constraint.attribute,
            index,
            value = %result.probe.value,
            expectation = %result.probe.expectation,
            outcome = ?result.outcome,
            matched = result.matched,
            "probe applied"
        );
        let disproof = classify(&result, trace.strict);
        trace.results.push(result);
        if let Some(reason) = disproof {
            trace.verdict = Verdict::Disproved { index, reason };
            debug!(
                model = %model_name,
                attribute = %constraint.attribute,
                index,
                reason = ?reason,
                "constraint disproved"
            );
            return Ok(trace);
        }
    }

    trace.verdict = Verdict::Proved;
    debug!(
        model = %model_name,
        attribute = %constraint.attribute,
        probes = trace.results.len(),
        "constraint proved"
    );
    Ok(trace)
}

fn apply(
    constraint: &Constraint,
    subject: &mut dyn Subject,
    probe: Probe,
) -> Result<ProbeResult, AssayError> {
    let attribute = probe.attribute.as_str();
    subject.set_attribute(attribute, probe.value.clone())?;
    let read_back = subject.get_attribute(attribute)?;
    let interference = detect(constraint, probe.expectation, &probe.value, &read_back);
    if interference.changed_value() {
        trace!(
            attribute,
            written = %probe.value,
            read_back = %read_back,
            "writer changed the probe value"
        );
    }

    let valid = subject.run_validations()?;
    let attribute_errors = subject.errors_for(attribute);
    let outcome = Outcome::classify(&attribute_errors, &probe.message);
    let errors = subject.all_errors().unwrap_or_else(|| {
        if attribute_errors.is_empty() {
            Vec::new()
        } else {
            vec![(attribute.to_string(), attribute_errors.clone())]
        }
    });

    let matched = outcome.satisfies(probe.expectation);

    Ok(ProbeResult {
        probe,
        read_back,
        interference,
        valid,
        attribute_errors,
        errors,
        outcome,
        matched,
    })
}

/// A strict-mode interference only disproves when the subject also
/// disagreed with the written value's expectation.
fn classify(result: &ProbeResult, strict: bool) -> Option<Disproof> {
    if result.matched {
        return None;
    }
    if strict && matches!(result.interference, Interference::Interfering { .. }) {
        return Some(Disproof::WriterInterference);
    }
    if result.probe.expectation == Expectation::Reject && result.outcome == Outcome::OtherErrors {
        return Some(Disproof::MessageMismatch);
    }
    Some(Disproof::UnexpectedOutcome)
}
