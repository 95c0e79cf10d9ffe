//! `Value` and `Literal` — the data that flows between attributes and comparisons
//!
//! An [`Attribute`](crate::Attribute) reads a [`Value`] out of an entity. A
//! [`Comparison`](crate::Comparison) holds a [`Literal`] captured when the rule
//! was built and tests the extracted `Value` against it.
//!
//! The two types differ in exactly one way: `Value` has an absence variant,
//! `Literal` does not. A rule always compares against something; an entity may
//! simply not have the attribute.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The erased value an attribute selector produces for an entity.
///
/// # Variants
///
/// - `None` — The attribute is absent (missing, unset, `Option::None`)
/// - `Bool` — Boolean data
/// - `Int` — Integer data
/// - `Float` — Floating point data
/// - `String` — String data (names, enum members rendered as text, …)
///
/// # INV: None → false
///
/// Every comparison against [`Value::None`] evaluates to `false`. Absence is a
/// defined outcome, never an error.
///
/// # Example
///
/// ```
/// use sieve::Value;
///
/// let data = Value::from(25_i64);
/// assert_eq!(data.as_int(), Some(25));
/// assert!(!data.is_none());
/// assert!(Value::from(None::<i64>).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The attribute is absent.
    None,
    /// Boolean data.
    Bool(bool),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// String data.
    String(String),
}

impl Value {
    /// Returns `true` if this is the `None` variant.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => Option::None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => Option::None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => Option::None,
        }
    }

    /// Returns a static string describing the variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Order this value against a literal.
    ///
    /// Returns `None` when the two are not comparable: an absent value, a
    /// cross-type pair, or a NaN. Integers and floats compare numerically.
    #[must_use]
    pub fn compare(&self, literal: &Literal) -> Option<Ordering> {
        match (self, literal) {
            (Self::None, _) => Option::None,
            (Self::Bool(a), Literal::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Literal::Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Literal::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Literal::Float(b)) => a.partial_cmp(b),
            (Self::String(a), Literal::String(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => Option::None,
        }
    }
}

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

impl From<u32> for Value {
    fn from(i: u32) -> Self {
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Self::Bool(b),
            Literal::Int(i) => Self::Int(i),
            Literal::Float(f) => Self::Float(f),
            Literal::String(s) => Self::String(s),
        }
    }
}

/// A comparison operand, captured by value when a leaf is built.
///
/// Serializes untagged, so structured forms read naturally:
/// `18`, `1.5`, `true`, `"Doctor"`.
///
/// # Example
///
/// ```
/// use sieve::Literal;
///
/// let threshold = 18_i64;
/// let literal = Literal::from(threshold);
/// assert_eq!(literal, Literal::Int(18));
/// assert_eq!(literal.to_string(), "18");
/// assert_eq!(Literal::from("Doctor").to_string(), "\"Doctor\"");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    String(String),
}

impl Literal {
    /// Returns a static string describing the variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Try to get the literal as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Literal {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Literal {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Literal types that are always valid operands for an ordering or equality
/// comparison.
///
/// Floats are left out: NaN and infinities have no structured form, so a float
/// operand goes through the checked [`Comparison::new`](crate::Comparison::new).
pub trait ExactLiteral: Into<Literal> {}

impl ExactLiteral for &str {}
impl ExactLiteral for String {}
impl ExactLiteral for i64 {}
impl ExactLiteral for i32 {}
impl ExactLiteral for u32 {}
impl ExactLiteral for bool {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_converts_to_none() {
        assert_eq!(Value::from(None::<u32>), Value::None);
        assert_eq!(Value::from(Some(7_u32)), Value::Int(7));
    }

    #[test]
    fn compare_same_type() {
        assert_eq!(Value::Int(25).compare(&Literal::Int(18)), Some(Ordering::Greater));
        assert_eq!(
            Value::from("abc").compare(&Literal::from("abd")),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Bool(true).compare(&Literal::Bool(false)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn compare_int_and_float_numerically() {
        assert_eq!(Value::Int(2).compare(&Literal::Float(1.5)), Some(Ordering::Greater));
        assert_eq!(Value::Float(1.0).compare(&Literal::Int(1)), Some(Ordering::Equal));
    }

    #[test]
    fn compare_none_and_mismatch_is_incomparable() {
        assert_eq!(Value::None.compare(&Literal::Int(1)), None);
        assert_eq!(Value::from("18").compare(&Literal::Int(18)), None);
        assert_eq!(Value::Float(f64::NAN).compare(&Literal::Float(1.0)), None);
    }

    #[test]
    fn literal_deserializes_untagged() {
        let l: Literal = serde_json::from_str("18").unwrap();
        assert_eq!(l, Literal::Int(18));
        let l: Literal = serde_json::from_str("18.5").unwrap();
        assert_eq!(l, Literal::Float(18.5));
        let l: Literal = serde_json::from_str("true").unwrap();
        assert_eq!(l, Literal::Bool(true));
        let l: Literal = serde_json::from_str("\"Doctor\"").unwrap();
        assert_eq!(l, Literal::String("Doctor".into()));
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::Int(18).to_string(), "18");
        assert_eq!(Literal::Bool(false).to_string(), "false");
        assert_eq!(Literal::from("a\"b").to_string(), "\"a\\\"b\"");
    }
}
