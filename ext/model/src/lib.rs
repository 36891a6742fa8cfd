//! assay-model: in-memory reference models for assay
//!
//! A [`Model`] is a named bag of attributes with ORM-style validations and
//! optional attribute writers. It implements [`Subject`], so every assay
//! matcher can be exercised without a database.
//!
//! # Example
//!
//! ```
//! use assay::prelude::*;
//! use assay_model::{Model, Validation, Writer};
//!
//! let mut model = Model::define("Example")
//!     .attribute("attr")
//!     .validates(Validation::length("attr").minimum(4))
//!     .build();
//!
//! let mut matcher = validate_length_of("attr").is_at_least(4);
//! assert!(matcher.matches(&mut model).unwrap());
//!
//! // A writer that appends a character hides the lower bound.
//! let mut model = Model::define("Example")
//!     .attribute("attr")
//!     .writer("attr", Writer::AddCharacter)
//!     .validates(Validation::length("attr").minimum(4))
//!     .build();
//! assert!(!matcher.matches(&mut model).unwrap());
//! ```

use assay::{Locale, Subject, SubjectError, Value};
use std::sync::Arc;
use tracing::trace;

pub mod validation;
pub mod writer;

#[cfg(feature = "fixtures")]
pub mod fixture;

pub use validation::{CheckContext, CustomCheck, Rule, Validation};
pub use writer::Writer;

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    collection: bool,
    writer: Writer,
    value: Value,
    errors: Vec<String>,
}

impl Attribute {
    fn new(name: String, collection: bool) -> Self {
        Self {
            name,
            collection,
            writer: Writer::Identity,
            value: Value::Nil,
            errors: Vec::new(),
        }
    }
}

/// An in-memory model instance.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    attributes: Vec<Attribute>,
    validations: Vec<Validation>,
    locale: Arc<Locale>,
}

impl Model {
    /// Start defining a model named `name`.
    #[must_use]
    pub fn define(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: name.into(),
            attributes: Vec::new(),
            validations: Vec::new(),
            locale: None,
        }
    }

    /// Attribute names in definition order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// The registered validations.
    #[must_use]
    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }

    fn attribute(&self, name: &str) -> Result<&Attribute, SubjectError> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| SubjectError::unknown_attribute(&self.name, name))
    }

    fn attribute_mut(&mut self, name: &str) -> Result<&mut Attribute, SubjectError> {
        let model = &self.name;
        self.attributes
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| SubjectError::unknown_attribute(model, name))
    }
}

impl Subject for Model {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError> {
        let attribute = self.attribute_mut(name)?;
        if attribute.collection && !matches!(value, Value::List(_) | Value::Nil) {
            return Err(SubjectError::IncompatibleValue {
                attribute: name.to_string(),
                value: value.inspect(),
                reason: "the attribute holds a collection".to_string(),
            });
        }
        attribute.value = attribute.writer.apply(value);
        Ok(())
    }

    fn get_attribute(&self, name: &str) -> Result<Value, SubjectError> {
        Ok(self.attribute(name)?.value.clone())
    }

    fn run_validations(&mut self) -> Result<bool, SubjectError> {
        for attribute in &mut self.attributes {
            attribute.errors.clear();
        }

        let ctx = CheckContext {
            model_name: &self.name,
            locale: &self.locale,
        };
        let mut valid = true;
        for validation in &self.validations {
            let Some(index) = self
                .attributes
                .iter()
                .position(|a| a.name == validation.attribute())
            else {
                return Err(SubjectError::unknown_attribute(
                    &self.name,
                    validation.attribute(),
                ));
            };
            let errors = validation
                .check(&self.attributes[index].value, &ctx)
                .map_err(|message| SubjectError::validation_raised(&self.name, message))?;
            trace!(
                model = %self.name,
                attribute = validation.attribute(),
                rule = ?validation.rule(),
                errors = errors.len(),
                "validation ran"
            );
            valid &= errors.is_empty();
            self.attributes[index].errors.extend(errors);
        }
        Ok(valid)
    }

    fn errors_for(&self, name: &str) -> Vec<String> {
        self.attribute(name)
            .map(|a| a.errors.clone())
            .unwrap_or_default()
    }

    fn all_errors(&self) -> Option<Vec<(String, Vec<String>)>> {
        Some(
            self.attributes
                .iter()
                .filter(|a| !a.errors.is_empty())
                .map(|a| (a.name.clone(), a.errors.clone()))
                .collect(),
        )
    }

    fn supports_collection_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_ok_and(|a| a.collection)
    }
}

/// Builder returned by [`Model::define`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    attributes: Vec<Attribute>,
    validations: Vec<Validation>,
    locale: Option<Arc<Locale>>,
}

impl ModelBuilder {
    fn define(&mut self, name: &str, collection: bool) -> &mut Attribute {
        let index = match self.attributes.iter().position(|a| a.name == name) {
            Some(index) => index,
            None => {
                self.attributes.push(Attribute::new(name.to_string(), collection));
                self.attributes.len() - 1
            }
        };
        let attribute = &mut self.attributes[index];
        attribute.collection |= collection;
        attribute
    }

    /// Add a scalar attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str) -> Self {
        self.define(name, false);
        self
    }

    /// Add a collection-typed attribute (an array column).
    #[must_use]
    pub fn collection(mut self, name: &str) -> Self {
        self.define(name, true);
        self
    }

    /// Install `writer` on `name`, defining the attribute if needed.
    #[must_use]
    pub fn writer(mut self, name: &str, writer: Writer) -> Self {
        self.define(name, false).writer = writer;
        self
    }

    /// Register a validation. Validations run in registration order.
    #[must_use]
    pub fn validates(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    /// Render messages from `locale` instead of the process-wide catalog.
    #[must_use]
    pub fn locale(mut self, locale: Arc<Locale>) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Run a customization callback against this builder.
    ///
    /// ```
    /// use assay_model::{Model, ModelBuilder, Validation};
    ///
    /// fn with_title(builder: &mut ModelBuilder) {
    ///     builder.add_attribute("title");
    ///     builder.add_validation(Validation::presence("title"));
    /// }
    ///
    /// let model = Model::define("Post").customize(with_title).build();
    /// assert_eq!(model.attribute_names().collect::<Vec<_>>(), ["title"]);
    /// ```
    #[must_use]
    pub fn customize(mut self, f: impl FnOnce(&mut ModelBuilder)) -> Self {
        f(&mut self);
        self
    }

    /// Add a scalar attribute in place, for customization callbacks.
    pub fn add_attribute(&mut self, name: &str) -> &mut Self {
        self.define(name, false);
        self
    }

    /// Register a validation in place, for customization callbacks.
    pub fn add_validation(&mut self, validation: Validation) -> &mut Self {
        self.validations.push(validation);
        self
    }

    /// Finish the definition and create a fresh instance.
    ///
    /// Validations on attributes that were never declared declare them.
    #[must_use]
    pub fn build(mut self) -> Model {
        let undeclared: Vec<String> = self
            .validations
            .iter()
            .map(|v| v.attribute().to_string())
            .filter(|name| !self.attributes.iter().any(|a| &a.name == name))
            .collect();
        for name in undeclared {
            self.define(&name, false);
        }
        Model {
            name: self.name,
            attributes: self.attributes,
            validations: self.validations,
            locale: self.locale.unwrap_or_else(Locale::current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Model {
        Model::define("Example")
            .attribute("attr")
            .attribute("other")
            .validates(Validation::length("attr").minimum(2))
            .validates(Validation::presence("other"))
            .build()
    }

    #[test]
    fn unknown_attribute() {
        let mut model = example();
        let err = model.set_attribute("missing", Value::Nil).unwrap_err();
        assert_eq!(err, SubjectError::unknown_attribute("Example", "missing"));
        assert!(model.get_attribute("missing").is_err());
    }

    #[test]
    fn validations_record_errors_per_attribute() {
        let mut model = example();
        model.set_attribute("attr", "x".into()).unwrap();
        assert!(!model.run_validations().unwrap());
        assert_eq!(
            model.errors_for("attr"),
            vec!["is too short (minimum is 2 characters)"]
        );
        assert_eq!(
            model.all_errors().unwrap(),
            vec![
                (
                    "attr".to_string(),
                    vec!["is too short (minimum is 2 characters)".to_string()]
                ),
                ("other".to_string(), vec!["can't be blank".to_string()]),
            ]
        );
    }

    #[test]
    fn revalidation_clears_errors() {
        let mut model = example();
        model.run_validations().unwrap();
        model.set_attribute("attr", "xx".into()).unwrap();
        model.set_attribute("other", "y".into()).unwrap();
        assert!(model.run_validations().unwrap());
        assert!(model.errors_for("attr").is_empty());
        assert_eq!(model.all_errors(), Some(Vec::new()));
    }

    #[test]
    fn writer_applies_on_set() {
        let mut model = Model::define("Example")
            .writer("attr", Writer::Upcase)
            .build();
        model.set_attribute("attr", "abc".into()).unwrap();
        assert_eq!(model.get_attribute("attr").unwrap(), Value::from("ABC"));
    }

    #[test]
    fn collection_attributes() {
        let mut model = Model::define("Example").collection("tags").build();
        assert!(model.supports_collection_attribute("tags"));
        assert!(!model.supports_collection_attribute("missing"));
        assert!(matches!(
            model.set_attribute("tags", "x".into()),
            Err(SubjectError::IncompatibleValue { .. })
        ));
        model.set_attribute("tags", Value::list_of_length(2)).unwrap();
    }

    #[test]
    fn raising_validation_is_a_subject_error() {
        let mut model = Model::define("Example")
            .validates(Validation::custom("attr", |_| Err("boom".into())))
            .build();
        assert_eq!(
            model.run_validations(),
            Err(SubjectError::validation_raised("Example", "boom"))
        );
    }

    #[test]
    fn validations_declare_their_attributes() {
        let model = Model::define("Example")
            .validates(Validation::presence("title"))
            .build();
        assert_eq!(model.attribute_names().collect::<Vec<_>>(), ["title"]);
    }

    #[test]
    fn customize_receives_the_builder() {
        let model = Model::define("Example")
            .customize(|b| {
                b.add_attribute("a").add_validation(Validation::presence("a"));
            })
            .build();
        assert_eq!(model.validations().len(), 1);
    }
}
