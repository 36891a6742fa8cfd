//! Conformance fixture runner
//!
//! Loads YAML fixtures (a model definition plus matcher cases) and runs them
//! against the assay engine.
//!
//! ```yaml
//! name: length minimum
//! model:
//!   name: Example
//!   attributes: [attr]
//!   validations:
//!     - { kind: length, attribute: attr, minimum: 4 }
//! cases:
//!   - name: accepts the correct minimum
//!     matcher: { kind: length, attribute: attr, is_at_least: 4 }
//!     expect: pass
//!   - name: fails when negated
//!     matcher: { kind: length, attribute: attr, is_at_least: 4 }
//!     negated: true
//!     expect: fail
//!     message: |
//!       Expected Example not to validate that the length of :attr is at least 4,
//!       ...
//! ```

use crate::{Model, Validation, Writer};
use assay::{
    AssayError, Comparison, Locale, Matcher, MatcherConfig, MessageKey, Number, Template, Trace,
    Value,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A complete test fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Fixture name, reported with every case.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Message catalog overrides shared by the model and the matchers.
    #[serde(default)]
    pub locale: Option<LocaleConfig>,
    /// The model every case runs against. Each case gets a fresh instance.
    pub model: ModelConfig,
    /// The cases.
    pub cases: Vec<TestCase>,
}

/// Message catalog overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Catalog name.
    #[serde(default = "default_locale_name")]
    pub name: String,
    /// Templates by catalog key (`too_short`, `inclusion`, ...).
    #[serde(default)]
    pub messages: BTreeMap<String, Template>,
}

fn default_locale_name() -> String {
    "en".to_string()
}

/// Model definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model name.
    pub name: String,
    /// Scalar attributes.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Collection-typed attributes.
    #[serde(default)]
    pub collections: Vec<String>,
    /// Built-in writers by attribute (`upcase`, `add_character`, ...).
    #[serde(default)]
    pub writers: BTreeMap<String, String>,
    /// Validations in registration order.
    #[serde(default)]
    pub validations: Vec<ValidationConfig>,
}

/// One model validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// The attribute validated.
    pub attribute: String,
    /// What is checked.
    #[serde(flatten)]
    pub rule: RuleConfig,
    /// Skip nil.
    #[serde(default)]
    pub allow_nil: bool,
    /// Skip blank values.
    #[serde(default)]
    pub allow_blank: bool,
    /// `message:` option.
    #[serde(default)]
    pub message: Option<String>,
}

/// Rule configuration, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// `validates_length_of`
    Length {
        #[serde(default)]
        minimum: Option<usize>,
        #[serde(default)]
        maximum: Option<usize>,
        #[serde(default)]
        is: Option<usize>,
        #[serde(default)]
        too_short: Option<String>,
        #[serde(default)]
        too_long: Option<String>,
        #[serde(default)]
        wrong_length: Option<String>,
    },
    /// `validates_numericality_of`
    Numericality {
        #[serde(default)]
        only_integer: bool,
        #[serde(default)]
        odd: bool,
        #[serde(default)]
        even: bool,
        #[serde(default)]
        greater_than: Option<Number>,
        #[serde(default)]
        greater_than_or_equal_to: Option<Number>,
        #[serde(default)]
        equal_to: Option<Number>,
        #[serde(default)]
        less_than: Option<Number>,
        #[serde(default)]
        less_than_or_equal_to: Option<Number>,
        #[serde(default)]
        other_than: Option<Number>,
    },
    /// `validates_inclusion_of`
    Inclusion {
        #[serde(default)]
        in_array: Option<Vec<Value>>,
        #[serde(default)]
        in_range: Option<(i64, i64)>,
    },
    /// `validates_exclusion_of`
    Exclusion {
        #[serde(default)]
        in_array: Option<Vec<Value>>,
        #[serde(default)]
        in_range: Option<(i64, i64)>,
    },
    /// `validates_presence_of`
    Presence,
    /// `validates_format_of`
    Format {
        /// The regex the value's text must match.
        with: String,
    },
    /// A validation that raises instead of recording an error.
    Raising {
        /// What it raises.
        reason: String,
    },
}

/// Expected outcome of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    /// The matcher (or negated matcher) passes.
    Pass,
    /// It fails with a message.
    Fail,
    /// It cannot run (subject or configuration error).
    Error,
}

/// Test case.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    /// Case name.
    pub name: String,
    /// The matcher under test.
    pub matcher: MatcherConfig,
    /// Use the matcher negated (`not_to`).
    #[serde(default)]
    pub negated: bool,
    /// Expected outcome.
    pub expect: Expect,
    /// Golden failure message, compared after trimming trailing whitespace.
    #[serde(default)]
    pub message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert config to model types
// ═══════════════════════════════════════════════════════════════════════════════

fn invalid(reason: String) -> AssayError {
    AssayError::InvalidConfig { reason }
}

impl LocaleConfig {
    /// Build the catalog, overlaying the built-in English templates.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::InvalidConfig`] for unknown message keys.
    pub fn build(&self) -> Result<Locale, AssayError> {
        let mut locale = Locale::named(&self.name);
        for (name, template) in &self.messages {
            let key = MessageKey::from_name(name)
                .ok_or_else(|| invalid(format!("unknown message key \"{name}\"")))?;
            locale = locale.with_template(key, template.clone());
        }
        Ok(locale)
    }
}

impl ModelConfig {
    /// Build a fresh model instance.
    ///
    /// # Errors
    ///
    /// - [`AssayError::InvalidConfig`] for unknown writers.
    /// - [`AssayError::InvalidPattern`] for format regexes that do not compile.
    pub fn build(&self, locale: Arc<Locale>) -> Result<Model, AssayError> {
        let mut builder = Model::define(&self.name).locale(locale);
        for name in &self.attributes {
            builder = builder.attribute(name);
        }
        for name in &self.collections {
            builder = builder.collection(name);
        }
        for (attribute, name) in &self.writers {
            let writer = Writer::from_name(name)
                .ok_or_else(|| invalid(format!("unknown writer \"{name}\" on :{attribute}")))?;
            builder = builder.writer(attribute, writer);
        }
        for validation in &self.validations {
            builder = builder.validates(validation.build()?);
        }
        Ok(builder.build())
    }
}

impl ValidationConfig {
    fn build(&self) -> Result<Validation, AssayError> {
        let attribute = self.attribute.as_str();
        let mut v = match &self.rule {
            RuleConfig::Length {
                minimum,
                maximum,
                is,
                too_short,
                too_long,
                wrong_length,
            } => {
                let mut v = Validation::length(attribute);
                if let Some(n) = minimum {
                    v = v.minimum(*n);
                }
                if let Some(n) = maximum {
                    v = v.maximum(*n);
                }
                if let Some(n) = is {
                    v = v.is(*n);
                }
                if let Some(m) = too_short {
                    v = v.too_short(m);
                }
                if let Some(m) = too_long {
                    v = v.too_long(m);
                }
                if let Some(m) = wrong_length {
                    v = v.wrong_length(m);
                }
                v
            }
            RuleConfig::Numericality {
                only_integer,
                odd,
                even,
                greater_than,
                greater_than_or_equal_to,
                equal_to,
                less_than,
                less_than_or_equal_to,
                other_than,
            } => {
                let mut v = Validation::numericality(attribute);
                if *only_integer {
                    v = v.only_integer();
                }
                if *odd {
                    v = v.odd();
                }
                if *even {
                    v = v.even();
                }
                let comparisons = [
                    (Comparison::GreaterThan, greater_than),
                    (Comparison::GreaterThanOrEqualTo, greater_than_or_equal_to),
                    (Comparison::EqualTo, equal_to),
                    (Comparison::LessThan, less_than),
                    (Comparison::LessThanOrEqualTo, less_than_or_equal_to),
                    (Comparison::OtherThan, other_than),
                ];
                for (operator, bound) in comparisons {
                    if let Some(bound) = bound {
                        v = v.compare(operator, *bound);
                    }
                }
                v
            }
            RuleConfig::Inclusion { in_array, in_range } => match (in_array, in_range) {
                (Some(values), None) => Validation::inclusion(attribute, values.iter().cloned()),
                (None, Some((low, high))) => {
                    Validation::inclusion_in_range(attribute, *low..=*high)
                }
                _ => return Err(invalid(format!(":{attribute}: one of in_array or in_range"))),
            },
            RuleConfig::Exclusion { in_array, in_range } => match (in_array, in_range) {
                (Some(values), None) => Validation::exclusion(attribute, values.iter().cloned()),
                (None, Some((low, high))) => {
                    Validation::exclusion_in_range(attribute, *low..=*high)
                }
                _ => return Err(invalid(format!(":{attribute}: one of in_array or in_range"))),
            },
            RuleConfig::Presence => Validation::presence(attribute),
            RuleConfig::Format { with } => {
                let re = Regex::new(with).map_err(|source| AssayError::InvalidPattern {
                    pattern: with.clone(),
                    source,
                })?;
                Validation::format(attribute, re)
            }
            RuleConfig::Raising { reason } => {
                let reason = reason.clone();
                Validation::custom(attribute, move |_| Err(reason.clone()))
            }
        };
        if self.allow_nil {
            v = v.allow_nil();
        }
        if self.allow_blank {
            v = v.allow_blank();
        }
        if let Some(m) = &self.message {
            v = v.message(m);
        }
        Ok(v)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// Fixture the case belongs to.
    pub fixture: String,
    /// Case name.
    pub case_name: String,
    /// Whether outcome and golden message both matched.
    pub passed: bool,
    /// What the case expected.
    pub expected: Expect,
    /// What happened.
    pub actual: Expect,
    /// The failure message (or the error, for [`Expect::Error`]).
    pub message: String,
    /// Whether the golden message matched. `None` when the case has none.
    pub message_matched: Option<bool>,
    /// The evaluation trace, when the matcher ran.
    pub trace: Option<Trace>,
}

impl Fixture {
    /// Parse a fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the document is not a fixture.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    ///
    /// # Errors
    ///
    /// Returns the first parse error.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// The catalog cases run with.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::InvalidConfig`] for unknown message keys.
    pub fn locale(&self) -> Result<Arc<Locale>, AssayError> {
        match &self.locale {
            Some(config) => Ok(Arc::new(config.build()?)),
            None => Ok(Locale::current()),
        }
    }

    /// Check that the model and every matcher build, without running anything.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error.
    pub fn check(&self) -> Result<(), AssayError> {
        let locale = self.locale()?;
        self.model.build(locale)?;
        for case in &self.cases {
            case.matcher.build()?;
        }
        Ok(())
    }

    /// Run all test cases and return results.
    #[must_use]
    pub fn run(&self) -> Vec<CaseResult> {
        self.cases.iter().map(|case| self.run_case(case)).collect()
    }

    fn run_case(&self, case: &TestCase) -> CaseResult {
        let (actual, message, trace) = match self.evaluate(case) {
            Ok((passed, message, trace)) => {
                let actual = if passed { Expect::Pass } else { Expect::Fail };
                (actual, message, Some(trace))
            }
            Err(err) => (Expect::Error, err.to_string(), None),
        };
        let message_matched = case
            .message
            .as_ref()
            .map(|golden| golden.trim_end() == message.trim_end());
        CaseResult {
            fixture: self.name.clone(),
            case_name: case.name.clone(),
            passed: actual == case.expect && message_matched.unwrap_or(true),
            expected: case.expect,
            actual,
            message,
            message_matched,
            trace,
        }
    }

    fn evaluate(&self, case: &TestCase) -> Result<(bool, String, Trace), AssayError> {
        let locale = self.locale()?;
        let mut model = self.model.build(Arc::clone(&locale))?;
        let mut matcher = case.matcher.build()?;
        matcher.validation_mut().set_locale(locale);

        let (passed, message) = if case.negated {
            let passed = matcher.does_not_match(&mut model)?;
            (passed, matcher.failure_message_when_negated())
        } else {
            let passed = matcher.matches(&mut model)?;
            (passed, matcher.failure_message())
        };
        let trace = matcher
            .last_trace()
            .cloned()
            .ok_or_else(|| invalid(format!("case \"{}\" produced no trace", case.name)))?;
        Ok((passed, message, trace))
    }

    /// Run all test cases and panic on first failure.
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}\n--- message ---\n{}",
                self.name, result.case_name, result.expected, result.actual, result.message
            );
        }
    }
}
