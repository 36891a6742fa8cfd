//! Matcher facades: the user-facing builders
//!
//! Each facade is a configuration phase (builder methods) followed by an
//! evaluation phase ([`Matcher::matches`] / [`Matcher::does_not_match`]).
//! Configuration only ever edits the [`Constraint`]; evaluation hands it to
//! the evaluator and keeps the last trace for the failure messages.
//!
//! ```
//! use assay::prelude::*;
//! # use assay::{SubjectError, Value};
//! # struct Post { title: Value, errors: Vec<String> }
//! # impl Subject for Post {
//! #     fn model_name(&self) -> &str { "Post" }
//! #     fn set_attribute(&mut self, _: &str, v: Value) -> Result<(), SubjectError> { self.title = v; Ok(()) }
//! #     fn get_attribute(&self, _: &str) -> Result<Value, SubjectError> { Ok(self.title.clone()) }
//! #     fn run_validations(&mut self) -> Result<bool, SubjectError> {
//! #         self.errors.clear();
//! #         if self.title.length() > 4 { self.errors.push("is too long (maximum is 4 characters)".into()); }
//! #         Ok(self.errors.is_empty())
//! #     }
//! #     fn errors_for(&self, _: &str) -> Vec<String> { self.errors.clone() }
//! # }
//! let mut post = Post { title: Value::Nil, errors: vec![] };
//!
//! let mut matcher = validate_length_of("title").is_at_most(4);
//! assert!(matcher.matches(&mut post).unwrap());
//!
//! let mut wrong = validate_length_of("title").is_at_most(3);
//! assert!(!wrong.matches(&mut post).unwrap());
//! assert!(wrong.failure_message().starts_with("Expected Post to validate"));
//! ```

mod exclusion;
mod format;
mod inclusion;
mod length;
mod numericality;
mod presence;

pub use exclusion::{validate_exclusion_of, ExclusionMatcher};
pub use format::{validate_format_of, FormatMatcher};
pub use inclusion::{validate_inclusion_of, InclusionMatcher};
pub use length::{validate_length_of, LengthMatcher};
pub use numericality::{validate_numericality_of, NumericalityMatcher};
pub use presence::{validate_presence_of, PresenceMatcher};

use crate::{
    evaluate, render, AssayError, Constraint, Locale, Polarity, RenderOptions, Subject, Trace,
};
use std::sync::Arc;

/// A configured validation matcher.
///
/// Facades implement the two accessors; everything else is provided.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a validation matcher",
    label = "expected a matcher such as `validate_length_of(..)`",
    note = "implement `Matcher` by exposing the wrapped `ValidationMatcher`"
)]
pub trait Matcher {
    /// The shared evaluation state.
    fn validation(&self) -> &ValidationMatcher;

    /// The shared evaluation state, mutably.
    fn validation_mut(&mut self) -> &mut ValidationMatcher;

    /// Natural-language description of what is being asserted.
    fn description(&self) -> String {
        self.validation().constraint().description()
    }

    /// Evaluate against `subject`; `true` if the constraint was proved.
    ///
    /// # Errors
    ///
    /// Propagates subject contract violations and invalid configuration.
    fn matches(&mut self, subject: &mut dyn Subject) -> Result<bool, AssayError> {
        Ok(self.validation_mut().run(subject)?.proves())
    }

    /// Evaluate against `subject`; `true` if a counter-example was found.
    ///
    /// An unprovable constraint, or one the writer interferes with, is
    /// neither matched nor unmatched: both this and
    /// [`matches`](Matcher::matches) return `false`.
    ///
    /// # Errors
    ///
    /// Propagates subject contract violations and invalid configuration.
    fn does_not_match(&mut self, subject: &mut dyn Subject) -> Result<bool, AssayError> {
        Ok(self.validation_mut().run(subject)?.disproves())
    }

    /// Why [`matches`](Matcher::matches) returned `false`.
    fn failure_message(&self) -> String {
        self.validation().message(Polarity::Positive)
    }

    /// Why [`does_not_match`](Matcher::does_not_match) returned `false`.
    fn failure_message_when_negated(&self) -> String {
        self.validation().message(Polarity::Negative)
    }

    /// The trace of the most recent evaluation.
    fn last_trace(&self) -> Option<&Trace> {
        self.validation().last_trace()
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn validation(&self) -> &ValidationMatcher {
        (**self).validation()
    }

    fn validation_mut(&mut self) -> &mut ValidationMatcher {
        (**self).validation_mut()
    }
}

/// State shared by every facade: the constraint, the message catalog,
/// rendering options and the last trace.
#[derive(Debug, Clone)]
pub struct ValidationMatcher {
    constraint: Constraint,
    locale: Arc<Locale>,
    render: RenderOptions,
    last: Option<Trace>,
}

impl ValidationMatcher {
    /// Wrap `constraint`, capturing the current process-wide locale.
    #[must_use]
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            locale: Locale::current(),
            render: RenderOptions::default(),
            last: None,
        }
    }

    /// The constraint being asserted.
    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// The constraint being asserted, for builder methods.
    pub fn constraint_mut(&mut self) -> &mut Constraint {
        &mut self.constraint
    }

    /// The catalog default messages come from.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Replace the message catalog.
    pub fn set_locale(&mut self, locale: Arc<Locale>) {
        self.locale = locale;
    }

    /// Replace the rendering options.
    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render = options;
    }

    /// The trace of the most recent evaluation.
    #[must_use]
    pub fn last_trace(&self) -> Option<&Trace> {
        self.last.as_ref()
    }

    /// Evaluate and keep the trace.
    ///
    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn run(&mut self, subject: &mut dyn Subject) -> Result<&Trace, AssayError> {
        let trace = evaluate(&self.constraint, subject, &self.locale)?;
        Ok(self.last.insert(trace))
    }

    fn message(&self, polarity: Polarity) -> String {
        match &self.last {
            Some(trace) => render(trace, polarity, &self.render),
            None => format!(
                "The matcher to {} has not been evaluated yet.",
                self.constraint.description()
            ),
        }
    }
}

impl Matcher for ValidationMatcher {
    fn validation(&self) -> &ValidationMatcher {
        self
    }

    fn validation_mut(&mut self) -> &mut ValidationMatcher {
        self
    }
}
