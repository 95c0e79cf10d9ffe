//! `Comparison` — Entity-agnostic value testing
//!
//! A `Comparison` tests an extracted [`Value`] against a [`Literal`] captured at
//! construction. It is intentionally **non-generic**: the same comparison works
//! for any entity type, which is what lets a structured form be compiled by a
//! collection that knows nothing about the entity's Rust type.
//!
//! # Semantics
//!
//! | Value | Result |
//! |-------|--------|
//! | `Value::None` | `false` for every operator |
//! | cross-type pair (e.g. string vs int) | `false` |
//! | int vs float | compared numerically |
//! | bool ordering | `false < true` |
//! | string ordering | lexicographic (byte order) |

use crate::{ExactLiteral, Literal, SpecError, Value, MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The kind of comparison a leaf performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal (still `false` for an absent value).
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// String starts with the literal.
    Prefix,
    /// String ends with the literal.
    Suffix,
    /// String contains the literal.
    Contains,
    /// String matches the literal as a regular expression.
    Regex,
}

impl CompareOp {
    /// Returns `true` for operators that only apply to string literals.
    #[must_use]
    pub fn is_string_op(self) -> bool {
        matches!(self, Self::Prefix | Self::Suffix | Self::Contains | Self::Regex)
    }

    /// The infix symbol used when rendering expressions.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Prefix => "starts_with",
            Self::Suffix => "ends_with",
            Self::Contains => "contains",
            Self::Regex => "matches",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operator plus the literal it compares against.
///
/// # Example
///
/// ```
/// use sieve::{Comparison, Value};
///
/// let adult = Comparison::gt(18);
/// assert!(adult.matches(&Value::Int(25)));
/// assert!(!adult.matches(&Value::Int(10)));
/// assert!(!adult.matches(&Value::None)); // INV: None → false
/// ```
#[derive(Clone)]
pub struct Comparison {
    op: CompareOp,
    literal: Literal,
    pattern: Option<regex::Regex>,
}

impl Comparison {
    /// Create a comparison, validating the operator/literal pairing.
    ///
    /// # Errors
    ///
    /// - [`SpecError::Construction`] if a string operator gets a non-string
    ///   literal, or the literal is a NaN or infinite float
    /// - [`SpecError::PatternTooLong`] if a string pattern exceeds the length limit
    /// - [`SpecError::InvalidPattern`] if a regex fails to compile
    pub fn new(op: CompareOp, literal: Literal) -> Result<Self, SpecError> {
        if let Literal::Float(f) = &literal {
            if !f.is_finite() {
                return Err(SpecError::Construction {
                    reason: format!("literal {f} is not a finite number"),
                });
            }
        }
        if op.is_string_op() {
            let Some(pattern) = literal.as_str() else {
                return Err(SpecError::Construction {
                    reason: format!(
                        "operator `{op}` requires a string literal, got {}",
                        literal.type_name()
                    ),
                });
            };
            let max = if op == CompareOp::Regex {
                MAX_REGEX_PATTERN_LENGTH
            } else {
                MAX_PATTERN_LENGTH
            };
            if pattern.len() > max {
                return Err(SpecError::PatternTooLong {
                    len: pattern.len(),
                    max,
                });
            }
        }

        let pattern = match (&literal, op) {
            (Literal::String(p), CompareOp::Regex) => {
                Some(regex::Regex::new(p).map_err(|e| SpecError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };

        Ok(Self {
            op,
            literal,
            pattern,
        })
    }

    fn unchecked(op: CompareOp, literal: Literal) -> Self {
        Self {
            op,
            literal,
            pattern: None,
        }
    }

    /// Equality.
    pub fn eq(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Eq, literal.into())
    }

    /// Inequality. An absent value is still `false`.
    pub fn ne(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Ne, literal.into())
    }

    /// Greater than.
    pub fn gt(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Gt, literal.into())
    }

    /// Greater than or equal.
    pub fn ge(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Ge, literal.into())
    }

    /// Less than.
    pub fn lt(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Lt, literal.into())
    }

    /// Less than or equal.
    pub fn le(literal: impl ExactLiteral) -> Self {
        Self::unchecked(CompareOp::Le, literal.into())
    }

    /// String prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::PatternTooLong`] past [`MAX_PATTERN_LENGTH`].
    pub fn prefix(prefix: impl Into<String>) -> Result<Self, SpecError> {
        Self::new(CompareOp::Prefix, Literal::String(prefix.into()))
    }

    /// String suffix.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::PatternTooLong`] past [`MAX_PATTERN_LENGTH`].
    pub fn suffix(suffix: impl Into<String>) -> Result<Self, SpecError> {
        Self::new(CompareOp::Suffix, Literal::String(suffix.into()))
    }

    /// Substring.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::PatternTooLong`] past [`MAX_PATTERN_LENGTH`].
    pub fn contains(substring: impl Into<String>) -> Result<Self, SpecError> {
        Self::new(CompareOp::Contains, Literal::String(substring.into()))
    }

    /// Regular expression match (Rust `regex` crate syntax, linear time).
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, SpecError> {
        Self::new(CompareOp::Regex, Literal::String(pattern.to_string()))
    }

    /// The comparison operator.
    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The captured literal.
    #[must_use]
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Test a value against this comparison.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        if value.is_none() {
            return false; // INV: None → false
        }
        match self.op {
            CompareOp::Eq => value.compare(&self.literal) == Some(Ordering::Equal),
            CompareOp::Ne => value
                .compare(&self.literal)
                .is_some_and(|o| o != Ordering::Equal),
            CompareOp::Gt => value.compare(&self.literal) == Some(Ordering::Greater),
            CompareOp::Ge => value
                .compare(&self.literal)
                .is_some_and(|o| o != Ordering::Less),
            CompareOp::Lt => value.compare(&self.literal) == Some(Ordering::Less),
            CompareOp::Le => value
                .compare(&self.literal)
                .is_some_and(|o| o != Ordering::Greater),
            CompareOp::Prefix => self.string_test(value, |s, p| s.starts_with(p)),
            CompareOp::Suffix => self.string_test(value, |s, p| s.ends_with(p)),
            CompareOp::Contains => self.string_test(value, |s, p| s.contains(p)),
            CompareOp::Regex => match (&self.pattern, value.as_str()) {
                (Some(re), Some(s)) => re.is_match(s),
                _ => false,
            },
        }
    }

    fn string_test(&self, value: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
        match (value.as_str(), self.literal.as_str()) {
            (Some(s), Some(p)) => test(s, p),
            _ => false,
        }
    }
}

impl fmt::Debug for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("op", &self.op)
            .field("literal", &self.literal)
            .finish()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.literal)
    }
}
