//! A minimal in-crate subject for unit tests.

use crate::{Interpolation, Locale, MessageKey, Subject, SubjectError, Value};

/// One attribute, `attr`, validated for a minimum length with the English
/// `too_short` message. Optionally appends a suffix on every write.
#[derive(Debug, Clone)]
pub(crate) struct StubSubject {
    minimum: usize,
    suffix: Option<String>,
    value: Value,
    errors: Vec<String>,
}

impl StubSubject {
    pub(crate) fn minimum_length(minimum: usize) -> Self {
        Self {
            minimum,
            suffix: None,
            value: Value::Nil,
            errors: Vec::new(),
        }
    }

    /// Append `suffix` to every string written to `attr`.
    pub(crate) fn appending(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    fn check(&self, name: &str) -> Result<(), SubjectError> {
        if name == "attr" {
            Ok(())
        } else {
            Err(SubjectError::unknown_attribute("Stub", name))
        }
    }
}

impl Subject for StubSubject {
    fn model_name(&self) -> &str {
        "Stub"
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), SubjectError> {
        self.check(name)?;
        self.value = match (&self.suffix, value) {
            (Some(suffix), Value::String(s)) => Value::String(s + suffix),
            (_, value) => value,
        };
        Ok(())
    }

    fn get_attribute(&self, name: &str) -> Result<Value, SubjectError> {
        self.check(name)?;
        Ok(self.value.clone())
    }

    fn run_validations(&mut self) -> Result<bool, SubjectError> {
        self.errors.clear();
        if self.value.length() < self.minimum {
            let vars = Interpolation::new().count(self.minimum);
            self.errors
                .push(Locale::english().message(MessageKey::TooShort, &vars));
        }
        Ok(self.errors.is_empty())
    }

    fn errors_for(&self, name: &str) -> Vec<String> {
        if name == "attr" {
            self.errors.clone()
        } else {
            Vec::new()
        }
    }
}
