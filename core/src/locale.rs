//! `Locale`: Validation message catalog
//!
//! Default expected messages ("is too short (minimum is 4 characters)") come
//! from a catalog of templates. A catalog is an explicit value: matchers hold
//! an `Arc<Locale>` and every lookup takes the interpolation variables as
//! arguments. The only process-wide state is the catalog installed once at
//! startup via [`Locale::install`].
//!
//! # Templates
//!
//! Templates interpolate `%{count}`, `%{attribute}`, `%{model}` and
//! `%{value}`. A template may be pluralised on `count`:
//!
//! ```yaml
//! messages:
//!   too_short:
//!     one: "is too short (minimum is %{count} character)"
//!     other: "is too short (minimum is %{count} characters)"
//!   blank: "can't be blank"
//! ```

use crate::AssayError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Keys of the built-in message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MessageKey {
    /// Shorter than the minimum length.
    TooShort,
    /// Longer than the maximum length.
    TooLong,
    /// Not exactly the required length.
    WrongLength,
    /// Not numeric.
    NotANumber,
    /// Numeric but not an integer.
    NotAnInteger,
    /// Not greater than the bound.
    GreaterThan,
    /// Not greater than or equal to the bound.
    GreaterThanOrEqualTo,
    /// Not equal to the bound.
    EqualTo,
    /// Not less than the bound.
    LessThan,
    /// Not less than or equal to the bound.
    LessThanOrEqualTo,
    /// Equal to a forbidden bound.
    OtherThan,
    /// Not odd.
    Odd,
    /// Not even.
    Even,
    /// Outside the allowed set.
    Inclusion,
    /// Inside the forbidden set.
    Exclusion,
    /// Blank.
    Blank,
    /// Does not match the expected format.
    Invalid,
}

impl MessageKey {
    /// Every key, in catalog order.
    pub const ALL: [MessageKey; 17] = [
        Self::TooShort,
        Self::TooLong,
        Self::WrongLength,
        Self::NotANumber,
        Self::NotAnInteger,
        Self::GreaterThan,
        Self::GreaterThanOrEqualTo,
        Self::EqualTo,
        Self::LessThan,
        Self::LessThanOrEqualTo,
        Self::OtherThan,
        Self::Odd,
        Self::Even,
        Self::Inclusion,
        Self::Exclusion,
        Self::Blank,
        Self::Invalid,
    ];

    /// The catalog name of this key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::WrongLength => "wrong_length",
            Self::NotANumber => "not_a_number",
            Self::NotAnInteger => "not_an_integer",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            Self::EqualTo => "equal_to",
            Self::LessThan => "less_than",
            Self::LessThanOrEqualTo => "less_than_or_equal_to",
            Self::OtherThan => "other_than",
            Self::Odd => "odd",
            Self::Even => "even",
            Self::Inclusion => "inclusion",
            Self::Exclusion => "exclusion",
            Self::Blank => "blank",
            Self::Invalid => "invalid",
        }
    }

    /// Look a key up by its catalog name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message template, optionally pluralised on `%{count}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Template {
    /// One form for every count.
    Plain(String),
    /// Singular and plural forms.
    Plural {
        /// Used when `count == 1`.
        one: String,
        /// Used otherwise.
        other: String,
    },
}

impl Template {
    fn select(&self, count: Option<&str>) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Plural { one, other } => {
                if count == Some("1") {
                    one
                } else {
                    other
                }
            }
        }
    }
}

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct Interpolation {
    count: Option<String>,
    attribute: Option<String>,
    model: Option<String>,
    value: Option<String>,
}

impl Interpolation {
    /// No variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `%{count}`.
    #[must_use]
    pub fn count(mut self, count: impl fmt::Display) -> Self {
        self.count = Some(count.to_string());
        self
    }

    /// Set `%{attribute}` to the humanised form of `attribute`.
    #[must_use]
    pub fn attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(humanize(attribute));
        self
    }

    /// Set `%{model}`.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set `%{value}`.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Substitute every known `%{name}` in `template`. Unknown or unset
    /// variables are left verbatim.
    #[must_use]
    pub fn apply(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("%{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = &after[..end];
            match self.lookup(name) {
                Some(v) => out.push_str(v),
                None => {
                    out.push_str("%{");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "count" => self.count.as_deref(),
            "attribute" => self.attribute.as_deref(),
            "model" => self.model.as_deref(),
            "value" => self.value.as_deref(),
            _ => None,
        }
    }
}

/// Humanise an attribute name: `first_name` → `First name`, `user_id` → `User`.
#[must_use]
pub fn humanize(attribute: &str) -> String {
    let trimmed = attribute.strip_suffix("_id").unwrap_or(attribute);
    let spaced = trimmed.replace('_', " ");
    let spaced = spaced.trim();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A validation message catalog.
///
/// Lookups that miss the catalog fall back to the built-in English
/// templates, so a partial catalog only needs to carry its overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    name: String,
    messages: HashMap<MessageKey, Template>,
}

static INSTALLED: OnceLock<Arc<Locale>> = OnceLock::new();
static BUILT_IN: OnceLock<Arc<Locale>> = OnceLock::new();

impl Locale {
    /// The built-in English catalog.
    #[must_use]
    pub fn english() -> Self {
        let mut messages = HashMap::new();
        for key in MessageKey::ALL {
            messages.insert(key, english_template(key));
        }
        Self {
            name: "en".to_string(),
            messages,
        }
    }

    /// An empty catalog named `name`. Every lookup falls back to English
    /// until templates are added with [`Locale::with_template`].
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: HashMap::new(),
        }
    }

    /// Override one template (builder pattern).
    #[must_use]
    pub fn with_template(mut self, key: MessageKey, template: Template) -> Self {
        self.messages.insert(key, template);
        self
    }

    /// The catalog's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw template for `key`.
    #[must_use]
    pub fn template(&self, key: MessageKey) -> Template {
        self.messages
            .get(&key)
            .cloned()
            .unwrap_or_else(|| english_template(key))
    }

    /// Render the message for `key`.
    ///
    /// ```
    /// use assay::{Interpolation, Locale, MessageKey};
    ///
    /// let locale = Locale::english();
    /// let vars = Interpolation::new().count(1);
    /// assert_eq!(
    ///     locale.message(MessageKey::TooShort, &vars),
    ///     "is too short (minimum is 1 character)"
    /// );
    /// ```
    #[must_use]
    pub fn message(&self, key: MessageKey, vars: &Interpolation) -> String {
        let template = self.template(key);
        vars.apply(template.select(vars.count.as_deref()))
    }

    /// Install the process-wide catalog. May be called once, at startup.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::LocaleAlreadyInstalled`] on a second call.
    pub fn install(locale: Locale) -> Result<(), AssayError> {
        INSTALLED
            .set(Arc::new(locale))
            .map_err(|_| AssayError::LocaleAlreadyInstalled)
    }

    /// The installed catalog, or the built-in English one.
    #[must_use]
    pub fn current() -> Arc<Locale> {
        let locale = INSTALLED
            .get()
            .unwrap_or_else(|| BUILT_IN.get_or_init(|| Arc::new(Locale::english())));
        Arc::clone(locale)
    }

    /// Parse a catalog from YAML and overlay it on the English defaults.
    ///
    /// ```yaml
    /// name: en-custom
    /// messages:
    ///   too_long: "The %{attribute} of your %{model} is too long"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::Config`] for malformed YAML and
    /// [`AssayError::InvalidConfig`] for unknown message keys.
    #[cfg(feature = "config")]
    pub fn from_yaml(yaml: &str) -> Result<Self, AssayError> {
        #[derive(serde::Deserialize)]
        struct LocaleFile {
            #[serde(default = "default_locale_name")]
            name: String,
            #[serde(default)]
            messages: HashMap<String, Template>,
        }

        fn default_locale_name() -> String {
            "en".to_string()
        }

        let file: LocaleFile = serde_yaml::from_str(yaml)?;
        let mut locale = Locale::english();
        locale.name = file.name;
        for (name, template) in file.messages {
            let key = MessageKey::from_name(&name).ok_or_else(|| AssayError::InvalidConfig {
                reason: format!("unknown message key \"{name}\""),
            })?;
            locale.messages.insert(key, template);
        }
        Ok(locale)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

fn plural(one: &str, other: &str) -> Template {
    Template::Plural {
        one: one.to_string(),
        other: other.to_string(),
    }
}

fn english_template(key: MessageKey) -> Template {
    match key {
        MessageKey::TooShort => plural(
            "is too short (minimum is %{count} character)",
            "is too short (minimum is %{count} characters)",
        ),
        MessageKey::TooLong => plural(
            "is too long (maximum is %{count} character)",
            "is too long (maximum is %{count} characters)",
        ),
        MessageKey::WrongLength => plural(
            "is the wrong length (should be %{count} character)",
            "is the wrong length (should be %{count} characters)",
        ),
        MessageKey::NotANumber => Template::Plain("is not a number".into()),
        MessageKey::NotAnInteger => Template::Plain("must be an integer".into()),
        MessageKey::GreaterThan => Template::Plain("must be greater than %{count}".into()),
        MessageKey::GreaterThanOrEqualTo => {
            Template::Plain("must be greater than or equal to %{count}".into())
        }
        MessageKey::EqualTo => Template::Plain("must be equal to %{count}".into()),
        MessageKey::LessThan => Template::Plain("must be less than %{count}".into()),
        MessageKey::LessThanOrEqualTo => {
            Template::Plain("must be less than or equal to %{count}".into())
        }
        MessageKey::OtherThan => Template::Plain("must be other than %{count}".into()),
        MessageKey::Odd => Template::Plain("must be odd".into()),
        MessageKey::Even => Template::Plain("must be even".into()),
        MessageKey::Inclusion => Template::Plain("is not included in the list".into()),
        MessageKey::Exclusion => Template::Plain("is reserved".into()),
        MessageKey::Blank => Template::Plain("can't be blank".into()),
        MessageKey::Invalid => Template::Plain("is invalid".into()),
    }
}
