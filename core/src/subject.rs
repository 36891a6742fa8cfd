//! `Subject`: The model instance under evaluation
//!
//! The engine never builds, saves or inspects models itself. Everything it
//! knows about a model comes through this trait: write an attribute, read it
//! back, run the in-memory validations, and list the resulting messages.
//!
//! Implementations own their normalization logic (custom writers, typecasts).
//! The engine observes that logic only through read-back.

use crate::Value;
use thiserror::Error;

/// Adapter over a model instance.
///
/// One evaluation borrows the subject mutably for its whole duration and
/// mutates it sequentially, one probe at a time. A subject is never shared
/// between concurrent evaluations.
///
/// # Contract
///
/// - `set_attribute` applies the model's own writer/normalization logic.
/// - `get_attribute` returns the stored (possibly normalized) value.
/// - `run_validations` only validates in memory; it must never persist.
/// - `errors_for` reflects the most recent `run_validations` call, in
///   registration order, and is empty when the attribute is valid.
///
/// # Example
///
/// ```
/// use assay::{Subject, SubjectError, Value};
///
/// #[derive(Debug, Default)]
/// struct Post { title: Value, errors: Vec<String> }
///
/// impl Subject for Post {
///     fn model_name(&self) -> &str { "Post" }
///
///     fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError> {
///         match name {
///             "title" => { self.title = value; Ok(()) }
///             _ => Err(SubjectError::unknown_attribute("Post", name)),
///         }
///     }
///
///     fn get_attribute(&self, name: &str) -> Result<Value, SubjectError> {
///         match name {
///             "title" => Ok(self.title.clone()),
///             _ => Err(SubjectError::unknown_attribute("Post", name)),
///         }
///     }
///
///     fn run_validations(&mut self) -> Result<bool, SubjectError> {
///         self.errors.clear();
///         if self.title.is_blank() {
///             self.errors.push("can't be blank".into());
///         }
///         Ok(self.errors.is_empty())
///     }
///
///     fn errors_for(&self, name: &str) -> Vec<String> {
///         if name == "title" { self.errors.clone() } else { Vec::new() }
///     }
/// }
///
/// let mut post = Post::default();
/// post.set_attribute("title", Value::from("")).unwrap();
/// assert!(!post.run_validations().unwrap());
/// assert_eq!(post.errors_for("title"), vec!["can't be blank".to_string()]);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Subject`",
    label = "this type cannot be probed by a validation matcher",
    note = "Subject adapts a model instance: set/get attributes, run validations, list errors"
)]
pub trait Subject {
    /// The model's display name, used in diagnostics ("Expected Example to ...").
    fn model_name(&self) -> &str;

    /// Assign `value` to the attribute, applying the model's writer logic.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::UnknownAttribute`] if the attribute does not exist.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError>;

    /// Read the current (possibly normalized) value of the attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::UnknownAttribute`] if the attribute does not exist.
    fn get_attribute(&self, name: &str) -> Result<Value, SubjectError>;

    /// Run every registered validation in memory. Returns overall validity.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::ValidationRaised`] if a validation blew up.
    fn run_validations(&mut self) -> Result<bool, SubjectError>;

    /// Validation messages for one attribute from the last validation run.
    fn errors_for(&self, name: &str) -> Vec<String>;

    /// Validation messages for every attribute that has any, in
    /// registration order.
    ///
    /// Adapters that cannot enumerate their attributes return `None`; the
    /// engine then lists only the attribute under test.
    fn all_errors(&self) -> Option<Vec<(String, Vec<String>)>> {
        None
    }

    /// Whether the attribute is collection-typed (array column).
    fn supports_collection_attribute(&self, _name: &str) -> bool {
        false
    }
}

impl<S: Subject + ?Sized> Subject for &mut S {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError> {
        (**self).set_attribute(name, value)
    }

    fn get_attribute(&self, name: &str) -> Result<Value, SubjectError> {
        (**self).get_attribute(name)
    }

    fn run_validations(&mut self) -> Result<bool, SubjectError> {
        (**self).run_validations()
    }

    fn errors_for(&self, name: &str) -> Vec<String> {
        (**self).errors_for(name)
    }

    fn all_errors(&self) -> Option<Vec<(String, Vec<String>)>> {
        (**self).all_errors()
    }

    fn supports_collection_attribute(&self, name: &str) -> bool {
        (**self).supports_collection_attribute(name)
    }
}

/// A subject violated its adapter contract.
///
/// These are configuration mistakes made by the test author (probing an
/// attribute that does not exist, a validation that raises). The engine
/// propagates them instead of folding them into a failed proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    /// The attribute is not defined on the model.
    #[error("{model} does not have an attribute named :{attribute}")]
    UnknownAttribute {
        /// Model name.
        model: String,
        /// The missing attribute.
        attribute: String,
    },

    /// A validation raised instead of recording an error.
    #[error("validating {model} raised: {message}")]
    ValidationRaised {
        /// Model name.
        model: String,
        /// What the validation reported.
        message: String,
    },

    /// The attribute cannot hold the given value.
    #[error("cannot assign {value} to :{attribute}: {reason}")]
    IncompatibleValue {
        /// The attribute being written.
        attribute: String,
        /// Inspected form of the rejected value.
        value: String,
        /// Why the value was refused.
        reason: String,
    },
}

impl SubjectError {
    /// Shorthand for [`SubjectError::UnknownAttribute`].
    pub fn unknown_attribute(model: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            model: model.into(),
            attribute: attribute.into(),
        }
    }

    /// Shorthand for [`SubjectError::ValidationRaised`].
    pub fn validation_raised(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationRaised {
            model: model.into(),
            message: message.into(),
        }
    }
}
