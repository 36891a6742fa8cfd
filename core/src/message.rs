//! Message expectations: which validation error a rejection must produce
//!
//! # Naming: Spec vs Matcher
//!
//! - [`MessageSpec`] = what the test author wrote (`with_message(/foo/)`, or nothing)
//! - [`MessageMatcher`] = what a probe checks the subject's errors against
//!
//! A `MessageSpec::Default` resolves to the catalog message for the probe's
//! bound, so every probe carries a concrete `MessageMatcher`.

use crate::AssayError;
use regex::Regex;
use std::fmt;

/// A custom-message qualifier from the test author.
///
/// # Example
///
/// ```
/// use assay::MessageSpec;
///
/// let exact = MessageSpec::from("is way too short");
/// let pattern = MessageSpec::pattern("foo").unwrap();
/// let keep_default = MessageSpec::from(None::<&str>);
/// assert!(keep_default.is_default());
/// # let _ = (exact, pattern);
/// ```
#[derive(Debug, Clone, Default)]
pub enum MessageSpec {
    /// Expect the catalog's default message.
    #[default]
    Default,
    /// Expect exactly this message.
    Exact(String),
    /// Expect any message matching this pattern.
    Pattern(Regex),
}

impl MessageSpec {
    /// Compile a pattern spec.
    ///
    /// # Errors
    ///
    /// Returns [`AssayError::InvalidPattern`] if the regex is invalid.
    pub fn pattern(pattern: &str) -> Result<Self, AssayError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| AssayError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns `true` for [`MessageSpec::Default`].
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Resolve into a runtime matcher, using `default` when no custom
    /// message was configured.
    #[must_use]
    pub fn resolve(&self, default: impl FnOnce() -> MessageMatcher) -> MessageMatcher {
        match self {
            Self::Default => default(),
            Self::Exact(message) => MessageMatcher::Exact(message.clone()),
            Self::Pattern(re) => MessageMatcher::Pattern(re.clone()),
        }
    }
}

impl From<&str> for MessageSpec {
    fn from(message: &str) -> Self {
        Self::Exact(message.to_string())
    }
}

impl From<String> for MessageSpec {
    fn from(message: String) -> Self {
        Self::Exact(message)
    }
}

impl From<Regex> for MessageSpec {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

/// `None` keeps the default message, like passing nil.
impl<T: Into<MessageSpec>> From<Option<T>> for MessageSpec {
    fn from(message: Option<T>) -> Self {
        message.map_or(Self::Default, Into::into)
    }
}

impl fmt::Display for MessageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("(default)"),
            Self::Exact(m) => write!(f, "{}", crate::value::inspect_str(m)),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// The validation error a probe looks for among the attribute's errors.
#[derive(Debug, Clone)]
pub enum MessageMatcher {
    /// Message equality.
    Exact(String),
    /// Regex match anywhere in the message.
    Pattern(Regex),
    /// Equality with any of a family of equivalent default messages.
    /// The first entry is the one reported in diagnostics.
    AnyOf(Vec<String>),
}

impl MessageMatcher {
    /// Check a single validation message.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == message,
            Self::Pattern(re) => re.is_match(message),
            Self::AnyOf(family) => family.iter().any(|m| m == message),
        }
    }

    /// Check whether any of `messages` matches.
    #[must_use]
    pub fn matches_any(&self, messages: &[String]) -> bool {
        messages.iter().any(|m| self.matches(m))
    }

    /// Returns `true` for pattern matchers.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// Diagnostic phrase naming the expected error:
    /// `the validation error "..."` or `a validation error matching ‹/re/›`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Pattern(re) => format!("a validation error matching ‹/{}/›", re.as_str()),
            Self::Exact(m) => format!("the validation error {}", crate::value::inspect_str(m)),
            Self::AnyOf(family) => {
                let primary = family.first().map_or("", String::as_str);
                format!("the validation error {}", crate::value::inspect_str(primary))
            }
        }
    }
}

impl PartialEq for MessageMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            (Self::AnyOf(a), Self::AnyOf(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for MessageMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(m) => write!(f, "{}", crate::value::inspect_str(m)),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Self::AnyOf(family) => {
                let quoted: Vec<String> = family.iter().map(|m| crate::value::inspect_str(m)).collect();
                write!(f, "any of [{}]", quoted.join(", "))
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MessageMatcher {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_equality() {
        let m = MessageMatcher::Exact("foobar".into());
        assert!(m.matches("foobar"));
        assert!(!m.matches("foobar!"));
    }

    #[test]
    fn pattern_matches_substring() {
        let MessageSpec::Pattern(re) = MessageSpec::pattern("foo").unwrap() else {
            panic!("expected a pattern spec");
        };
        let m = MessageMatcher::Pattern(re);
        assert!(m.matches("foobar"));
        assert!(!m.matches("bar"));
    }

    #[test]
    fn any_of_matches_family() {
        let m = MessageMatcher::AnyOf(vec!["a".into(), "b".into()]);
        assert!(m.matches_any(&["c".into(), "b".into()]));
        assert!(!m.matches_any(&["c".into()]));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = MessageSpec::pattern("[bad").unwrap_err();
        assert!(matches!(err, AssayError::InvalidPattern { .. }));
    }

    #[test]
    fn default_resolves_lazily() {
        let spec = MessageSpec::Default;
        let resolved = spec.resolve(|| MessageMatcher::Exact("is invalid".into()));
        assert_eq!(resolved, MessageMatcher::Exact("is invalid".into()));

        let custom = MessageSpec::from("nope");
        let resolved = custom.resolve(|| unreachable!("custom message must win"));
        assert_eq!(resolved, MessageMatcher::Exact("nope".into()));
    }

    #[test]
    fn none_keeps_default() {
        assert!(MessageSpec::from(None::<String>).is_default());
        assert!(!MessageSpec::from(Some("x")).is_default());
    }

    #[test]
    fn describe_phrases() {
        let exact = MessageMatcher::Exact("is too short".into());
        assert_eq!(exact.describe(), r#"the validation error "is too short""#);
        let pattern = MessageMatcher::Pattern(Regex::new("foo").unwrap());
        assert_eq!(pattern.describe(), "a validation error matching ‹/foo/›");
        let family = MessageMatcher::AnyOf(vec!["first".into(), "second".into()]);
        assert_eq!(family.describe(), r#"the validation error "first""#);
    }
}
