//! Attribute writers: the normalization a model applies on assignment
//!
//! A writer sits between `set_attribute` and storage. Anything other than
//! [`Writer::Identity`] can make the read-back value differ from the written
//! one, which is what the engine's interference detection observes.

use assay::Value;
use std::fmt;
use std::sync::Arc;

/// Transforms a value as it is assigned.
#[derive(Clone, Default)]
pub enum Writer {
    /// Store the value unchanged.
    #[default]
    Identity,
    /// Upcase strings (and strings inside lists).
    Upcase,
    /// Append `"a"` to strings, or an `"a"` element to lists.
    AddCharacter,
    /// Drop the last character of strings, or the last element of lists.
    RemoveCharacter,
    /// Any other normalization.
    Custom(Arc<dyn Fn(Value) -> Value + Send + Sync>),
}

impl Writer {
    /// Wrap a closure as a writer.
    pub fn custom(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Apply the writer.
    #[must_use]
    pub fn apply(&self, value: Value) -> Value {
        match self {
            Self::Identity => value,
            Self::Upcase => upcase(value),
            Self::AddCharacter => match value {
                Value::String(s) => Value::String(s + "a"),
                Value::List(mut items) => {
                    items.push(Value::from("a"));
                    Value::List(items)
                }
                other => other,
            },
            Self::RemoveCharacter => match value {
                Value::String(mut s) => {
                    s.pop();
                    Value::String(s)
                }
                Value::List(mut items) => {
                    items.pop();
                    Value::List(items)
                }
                other => other,
            },
            Self::Custom(f) => f(value),
        }
    }

    /// The writer's config name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Upcase => "upcase",
            Self::AddCharacter => "add_character",
            Self::RemoveCharacter => "remove_character",
            Self::Custom(_) => "custom",
        }
    }

    /// Look up a built-in writer by config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "identity" => Some(Self::Identity),
            "upcase" => Some(Self::Upcase),
            "add_character" => Some(Self::AddCharacter),
            "remove_character" => Some(Self::RemoveCharacter),
            _ => None,
        }
    }
}

fn upcase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        Value::List(items) => Value::List(items.into_iter().map(upcase).collect()),
        other => other,
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
