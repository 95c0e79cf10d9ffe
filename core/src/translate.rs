//! Translators — structured form to native filter expressions.
//!
//! A [`Translator`] turns a [`StructuredPredicate`] into something a store can
//! execute directly. Translation is only allowed where it is semantically
//! equivalent to running the evaluator entity by entity; anything without an
//! exact native equivalent fails with [`SpecError::TranslationUnsupported`]
//! instead of silently mis-filtering.
//!
//! Two translators ship with the crate:
//!
//! | Translator | Output | Unsupported |
//! |------------|--------|-------------|
//! | [`NativeTranslator`] | [`NativeFilter`] over [`Record`]s | `custom` |
//! | [`SqlTranslator`] | parameterized `WHERE` clause ([`SqlFilter`]) | `custom`, `regex`, non-identifier attribute names |

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::{CompareOp, Comparison, Literal, Record, SpecError, StructuredPredicate};

/// Turns a structured form into a native filter.
pub trait Translator {
    /// The native filter produced.
    type Output;

    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Translate the structured form.
    ///
    /// # Errors
    ///
    /// [`SpecError::TranslationUnsupported`] if any node has no exact native
    /// equivalent. Implementations must never drop or approximate a node.
    fn translate(&self, form: &StructuredPredicate) -> Result<Self::Output, SpecError>;
}

fn unsupported(translator: &'static str, node: String) -> SpecError {
    debug!(translator, %node, "translation unsupported");
    SpecError::TranslationUnsupported { node, translator }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Native filter
// ═══════════════════════════════════════════════════════════════════════════════

/// A compiled filter over [`Record`]s, produced by [`NativeTranslator`].
///
/// Leaves look attributes up by name and reuse [`Comparison`] semantics, so
/// for any record whose [`Record::attribute`] agrees with the entity's
/// attributes, the result equals the evaluator's.
#[derive(Debug, Clone)]
pub enum NativeFilter {
    /// Compare a named attribute.
    Leaf {
        /// Attribute name.
        attribute: String,
        /// Compiled comparison.
        comparison: Comparison,
    },
    /// Both must hold (short-circuit).
    And(Box<NativeFilter>, Box<NativeFilter>),
    /// Either must hold (short-circuit).
    Or(Box<NativeFilter>, Box<NativeFilter>),
    /// Negation.
    Not(Box<NativeFilter>),
}

impl NativeFilter {
    /// Test a record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::Leaf {
                attribute,
                comparison,
            } => comparison.matches(&record.attribute(attribute)),
            Self::And(l, r) => l.matches(record) && r.matches(record),
            Self::Or(l, r) => l.matches(record) || r.matches(record),
            Self::Not(inner) => !inner.matches(record),
        }
    }
}

/// Compiles a structured form into a [`NativeFilter`].
///
/// Refuses `custom` nodes: a record store has no way to run an opaque closure
/// written against the entity type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTranslator;

impl Translator for NativeTranslator {
    type Output = NativeFilter;

    fn name(&self) -> &'static str {
        "native"
    }

    fn translate(&self, form: &StructuredPredicate) -> Result<NativeFilter, SpecError> {
        match form {
            StructuredPredicate::Leaf {
                attribute,
                op,
                value,
            } => Ok(NativeFilter::Leaf {
                attribute: attribute.clone(),
                comparison: Comparison::new(*op, value.clone())?,
            }),
            StructuredPredicate::Custom { .. } => Err(unsupported(self.name(), form.to_string())),
            StructuredPredicate::And { left, right } => Ok(NativeFilter::And(
                Box::new(self.translate(left)?),
                Box::new(self.translate(right)?),
            )),
            StructuredPredicate::Or { left, right } => Ok(NativeFilter::Or(
                Box::new(self.translate(left)?),
                Box::new(self.translate(right)?),
            )),
            StructuredPredicate::Not { predicate } => {
                Ok(NativeFilter::Not(Box::new(self.translate(predicate)?)))
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SQL
// ═══════════════════════════════════════════════════════════════════════════════

/// Placeholder style for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` (SQLite).
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL).
    Numbered,
}

/// A parameterized SQL boolean expression, ready for a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    /// The expression text.
    pub clause: String,
    /// Bound parameters, in placeholder order.
    pub params: Vec<Literal>,
}

impl fmt::Display for SqlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clause)
    }
}

/// Renders a structured form as a SQL boolean expression.
///
/// Every leaf is guarded with `IS NOT NULL`, so a leaf is never SQL `NULL`
/// and `NOT` keeps the evaluator's absence semantics: `NOT (age > 18)` is true
/// for a row with a `NULL` age, exactly as `not(age > 18)` is for an entity
/// without one.
///
/// String operators render with `substr`, `replace` and `length` and compare
/// with `=`, never `LIKE`: they stay case-exact under the default collations
/// of SQLite and PostgreSQL, matching the evaluator. Stores whose default
/// collation folds case (MySQL) are not a target. Cross-type comparisons are
/// store-dependent; columns are assumed to hold the type the literal has.
///
/// # Example
///
/// ```
/// use sieve::{CompareOp, SqlTranslator, StructuredPredicate as P, Translator};
///
/// let form = P::and(
///     P::leaf("profession", CompareOp::Eq, "Doctor"),
///     P::leaf("age", CompareOp::Gt, 18),
/// );
/// let sql = SqlTranslator::new().translate(&form).unwrap();
/// assert_eq!(
///     sql.clause,
///     r#"(("profession" IS NOT NULL AND "profession" = ?) AND ("age" IS NOT NULL AND "age" > ?))"#
/// );
/// assert_eq!(sql.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlTranslator {
    placeholder: Placeholder,
    columns: HashMap<String, String>,
}

impl SqlTranslator {
    /// Create a translator using `?` placeholders and attribute names as columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder style.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Map an attribute name to a different column name.
    #[must_use]
    pub fn column(mut self, attribute: &str, column: &str) -> Self {
        self.columns.insert(attribute.to_owned(), column.to_owned());
        self
    }

    fn render(
        &self,
        form: &StructuredPredicate,
        params: &mut Vec<Literal>,
    ) -> Result<String, SpecError> {
        match form {
            StructuredPredicate::Leaf {
                attribute,
                op,
                value,
            } => self.render_leaf(attribute, *op, value, params),
            StructuredPredicate::Custom { .. } => Err(unsupported(self.name(), form.to_string())),
            StructuredPredicate::And { left, right } => Ok(format!(
                "({} AND {})",
                self.render(left, params)?,
                self.render(right, params)?
            )),
            StructuredPredicate::Or { left, right } => Ok(format!(
                "({} OR {})",
                self.render(left, params)?,
                self.render(right, params)?
            )),
            StructuredPredicate::Not { predicate } => {
                Ok(format!("NOT {}", self.render(predicate, params)?))
            }
        }
    }

    fn render_leaf(
        &self,
        attribute: &str,
        op: CompareOp,
        value: &Literal,
        params: &mut Vec<Literal>,
    ) -> Result<String, SpecError> {
        let column = self
            .columns
            .get(attribute)
            .map_or(attribute, String::as_str);
        if !is_identifier(column) {
            return Err(unsupported(
                self.name(),
                format!("attribute {attribute:?} is not a plain SQL identifier"),
            ));
        }

        let col = format!("\"{column}\"");
        let test = match op {
            CompareOp::Eq => format!("{col} = {}", self.bind(params, value)),
            CompareOp::Ne => format!("{col} <> {}", self.bind(params, value)),
            CompareOp::Gt => format!("{col} > {}", self.bind(params, value)),
            CompareOp::Ge => format!("{col} >= {}", self.bind(params, value)),
            CompareOp::Lt => format!("{col} < {}", self.bind(params, value)),
            CompareOp::Le => format!("{col} <= {}", self.bind(params, value)),
            CompareOp::Prefix | CompareOp::Suffix | CompareOp::Contains => {
                let Some(pattern) = value.as_str() else {
                    return Err(SpecError::Construction {
                        reason: format!("operator `{op}` requires a string literal"),
                    });
                };
                // An empty pattern matches every string; `replace` with an
                // empty needle would not.
                let op = if pattern.is_empty() {
                    CompareOp::Prefix
                } else {
                    op
                };
                match op {
                    CompareOp::Prefix => {
                        let len = self.bind(params, value);
                        let eq = self.bind(params, value);
                        format!("substr({col}, 1, length(CAST({len} AS TEXT))) = {eq}")
                    }
                    CompareOp::Suffix => {
                        let len = self.bind(params, value);
                        let eq = self.bind(params, value);
                        format!(
                            "substr({col}, length({col}) - length(CAST({len} AS TEXT)) + 1) = {eq}"
                        )
                    }
                    _ => {
                        let needle = self.bind(params, value);
                        format!("length(replace({col}, {needle}, '')) < length({col})")
                    }
                }
            }
            CompareOp::Regex => {
                return Err(unsupported(
                    self.name(),
                    format!("{attribute} {op} {value}"),
                ))
            }
        };

        Ok(format!("({col} IS NOT NULL AND {test})"))
    }

    fn bind(&self, params: &mut Vec<Literal>, value: &Literal) -> String {
        params.push(value.clone());
        match self.placeholder {
            Placeholder::Question => "?".to_string(),
            Placeholder::Numbered => format!("${}", params.len()),
        }
    }
}

impl Translator for SqlTranslator {
    type Output = SqlFilter;

    fn name(&self) -> &'static str {
        "sql"
    }

    fn translate(&self, form: &StructuredPredicate) -> Result<SqlFilter, SpecError> {
        let mut params = Vec::new();
        let clause = self.render(form, &mut params)?;
        trace!(%clause, params = params.len(), "translated to sql");
        Ok(SqlFilter { clause, params })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
