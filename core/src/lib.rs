//! assay - proof engine for declarative model-validation matchers
//!
//! A test author declares what a model's validation should do
//! ("`:name` must be at most 10 characters"). assay proves or disproves that
//! declaration by writing boundary values into a model instance, running its
//! validations, and comparing the outcome with what was declared.
//!
//! # Architecture
//!
//! ```text
//! facade (validate_length_of(..).is_at_most(10))
//!    │  builds
//!    ▼
//! Constraint ──generate──▶ [Probe] ──evaluate(Subject)──▶ Trace ──render──▶ message
//! ```
//!
//! - [`Constraint`]: The declared validation, pure data
//! - [`generate`]: Boundary values that straddle each bound, in a fixed order
//! - [`Subject`]: Adapter over a model instance (set, get, validate, errors)
//! - [`evaluate`]: Applies probes one at a time and stops at the first counter-example
//! - [`Trace`]: Every probe that ran, plus the verdict
//! - [`render`]: Word-wrapped failure messages
//!
//! # Key Design Insights
//!
//! 1. **Constraints are data**: the facade builders only fill in a
//!    [`Constraint`]. Generation, evaluation and rendering never see the
//!    builder.
//!
//! 2. **The subject is opaque**: normalization and typecasting live in the
//!    model. The engine sees them only through read-back, which is how writer
//!    interference is detected.
//!
//! 3. **Nothing to probe is not a proof**: a constraint that yields no probes
//!    is [`Verdict::Unprovable`], and neither polarity of the matcher passes.
//!
//! # Example
//!
//! ```
//! use assay::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct User { name: Value, errors: Vec<String> }
//!
//! impl Subject for User {
//!     fn model_name(&self) -> &str { "User" }
//!
//!     fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError> {
//!         match name {
//!             "name" => { self.name = value; Ok(()) }
//!             _ => Err(SubjectError::unknown_attribute("User", name)),
//!         }
//!     }
//!
//!     fn get_attribute(&self, name: &str) -> Result<Value, SubjectError> {
//!         match name {
//!             "name" => Ok(self.name.clone()),
//!             _ => Err(SubjectError::unknown_attribute("User", name)),
//!         }
//!     }
//!
//!     fn run_validations(&mut self) -> Result<bool, SubjectError> {
//!         self.errors.clear();
//!         if self.name.length() > 10 {
//!             self.errors.push("is too long (maximum is 10 characters)".into());
//!         }
//!         Ok(self.errors.is_empty())
//!     }
//!
//!     fn errors_for(&self, name: &str) -> Vec<String> {
//!         if name == "name" { self.errors.clone() } else { Vec::new() }
//!     }
//! }
//!
//! let mut user = User::default();
//! let mut matcher = validate_length_of("name").is_at_most(10);
//! assert!(matcher.matches(&mut user).unwrap());
//!
//! let mut too_strict = validate_length_of("name").is_at_most(9);
//! assert!(!too_strict.matches(&mut user).unwrap());
//! assert!(too_strict.failure_message().starts_with("Expected User to validate"));
//! ```
//!
//! # Extensions
//!
//! - [`assay-model`](https://docs.rs/assay-model): Declarative in-memory
//!   models with writers and validations, plus the YAML fixture runner

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod boundary;
mod constraint;
mod diagnostic;
mod evaluator;
mod interference;
mod locale;
mod message;
mod subject;
mod trace;
mod value;
mod word_wrap;

pub mod matchers;

#[cfg(feature = "config")]
mod config;

#[cfg(test)]
pub(crate) mod testing;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use constraint::{
    Comparison, Constraint, ConstraintKind, Expectation, LengthBounds, Membership, NumericBounds,
    Parity, Qualifiers,
};
pub use locale::{humanize, Interpolation, Locale, MessageKey, Template};
pub use message::{MessageMatcher, MessageSpec};
pub use subject::{Subject, SubjectError};
pub use value::{inspect_str, Number, Value, FLOAT_STEP};

// Engine
pub use boundary::{generate, Probe, ProbeContext, ProbeKind, Shape};
pub use evaluator::evaluate;
pub use interference::{detect, Interference};

// Trace types
pub use trace::{Disproof, Outcome, ProbeResult, Trace, Verdict};

// Diagnostics
pub use diagnostic::{render, Polarity, RenderOptions};
pub use word_wrap::{word_wrap, TERMINAL_WIDTH};

// Matchers
pub use matchers::{
    validate_exclusion_of, validate_format_of, validate_inclusion_of, validate_length_of,
    validate_numericality_of, validate_presence_of, ExclusionMatcher, FormatMatcher,
    InclusionMatcher, LengthMatcher, Matcher, NumericalityMatcher, PresenceMatcher,
    ValidationMatcher,
};

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{KindConfig, MatcherConfig, MessageConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use assay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        AssayError,
        // Core types
        Expectation,
        Locale,
        // Traits
        Matcher,
        MessageSpec,
        Number,
        // Diagnostics
        Polarity,
        RenderOptions,
        Subject,
        SubjectError,
        // Trace types
        Trace,
        Value,
        Verdict,
        // Facades
        validate_exclusion_of,
        validate_format_of,
        validate_inclusion_of,
        validate_length_of,
        validate_numericality_of,
        validate_presence_of,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// String written when a membership probe needs a value outside the set.
///
/// If the set happens to contain it, `!` is appended until it no longer does.
pub const ARBITRARY_OUTSIDE_STRING: &str = "assay arbitrary outside value";

/// Integer written when a membership probe needs a value outside the set.
///
/// Falls back to one past the set's maximum on collision.
pub const ARBITRARY_OUTSIDE_INTEGER: i64 = 123_456_789;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from matcher configuration and evaluation.
///
/// None of these are failed proofs. A failed proof is an `Ok(false)` with a
/// failure message; these mean the matcher could not be run at all. Fix the
/// test or the subject adapter and run again.
#[derive(Debug, thiserror::Error)]
pub enum AssayError {
    /// The subject rejected an operation (unknown attribute, raising validation).
    #[error(transparent)]
    Subject(#[from] SubjectError),

    /// A `with_message(/.../)` pattern does not compile.
    #[error("invalid message pattern \"{pattern}\": {source}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The declared constraint contradicts itself.
    #[error("cannot validate :{attribute}: {reason}")]
    InvalidConstraint {
        /// The attribute the constraint was declared on.
        attribute: String,
        /// What is contradictory.
        reason: String,
    },

    /// A configuration file parsed but describes something meaningless.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },

    /// [`Locale::install`] was called after a locale was already installed.
    #[error("a process-wide locale is already installed")]
    LocaleAlreadyInstalled,

    /// A configuration file is not valid YAML for its schema.
    #[cfg(feature = "config")]
    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}
