//! `Value`: Dynamic attribute value that flows between probes and subjects
//!
//! Probes write `Value`s into a [`Subject`](crate::Subject) and read them back.
//! The engine only needs three things from a value: equality (interference
//! detection), a length/magnitude (boundary semantics) and an `inspect` form
//! for diagnostics.

use std::fmt;

/// A dynamically-typed attribute value.
///
/// # Variants
///
/// - `Nil`: No value (the attribute was never set, or set to nil)
/// - `Bool`: Boolean
/// - `Int`: Integer (numericality and range probes)
/// - `Float`: Floating point (numericality probes against float bounds)
/// - `String`: The most common case for length probes
/// - `List`: Collection-typed attributes (array columns, `as_array`)
///
/// # Example
///
/// ```
/// use assay::Value;
///
/// let value = Value::from("xxxx");
/// assert_eq!(value.length(), 4);
/// assert_eq!(value.inspect(), r#""xxxx""#);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// No value.
    #[default]
    Nil,
    /// Boolean data.
    Bool(bool),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// String data.
    String(String),
    /// An ordered collection of values.
    List(Vec<Value>),
}

impl Value {
    /// A string of `len` copies of `"x"`.
    #[must_use]
    pub fn string_of_length(len: usize) -> Self {
        Self::String("x".repeat(len))
    }

    /// A list of `len` copies of `"x"`.
    #[must_use]
    pub fn list_of_length(len: usize) -> Self {
        Self::List(vec![Self::String("x".into()); len])
    }

    /// Returns `true` if this is the `Nil` variant.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns `true` if this value is blank: nil, `false`, an empty or
    /// whitespace-only string, or an empty list.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Nil | Self::Bool(false) => true,
            Self::String(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(true) | Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Returns the string slice if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The measured length of this value.
    ///
    /// Characters for strings, elements for lists, zero for nil, and the
    /// width of the inspected form for other scalars.
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            Self::Nil => 0,
            Self::String(s) => s.chars().count(),
            Self::List(items) => items.len(),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => self.inspect().chars().count(),
        }
    }

    /// Interpret this value as a number.
    ///
    /// Strings are parsed after trimming surrounding whitespace.
    #[must_use]
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Float(f) => Some(Number::Float(*f)),
            Self::String(s) => Number::parse(s),
            Self::Nil | Self::Bool(_) | Self::List(_) => None,
        }
    }

    /// Inspected form used in diagnostics.
    ///
    /// ```
    /// use assay::Value;
    ///
    /// assert_eq!(Value::Nil.inspect(), "nil");
    /// assert_eq!(Value::list_of_length(2).inspect(), r#"["x", "x"]"#);
    /// assert_eq!(Value::Float(0.5).inspect(), "0.5");
    /// ```
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::String(s) => inspect_str(s),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// Returns a static string naming the variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

/// Double-quote a string, escaping the characters that would make the
/// quoted form ambiguous.
#[must_use]
pub fn inspect_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Nil, Into::into)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Self::Int(i),
            Number::Float(f) => Self::Float(f),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Number
// ═══════════════════════════════════════════════════════════════════════════════

/// A numeric bound or value: integer or float.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Number {
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
}

impl Number {
    /// Parse a trimmed decimal string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Self::Int(i));
        }
        // Rust accepts "inf"/"NaN"; a numericality check does not.
        if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return None;
        }
        trimmed.parse::<f64>().ok().map(Self::Float)
    }

    /// The value as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns `true` for integers. A float with no fractional part
    /// (`2.0`) is still a float.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Offset this number by `steps` boundary increments.
    ///
    /// Integer bounds move by 1, float bounds by 0.000001.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn offset(self, steps: i64) -> Self {
        match self {
            Self::Int(i) => Self::Int(i.saturating_add(steps)),
            Self::Float(f) => Self::Float(f + steps as f64 * FLOAT_STEP),
        }
    }
}

/// Distance between a float bound and its neighbouring probes.
pub const FLOAT_STEP: f64 = 0.000_001;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}
