//! Evaluation trace for debugging specification behavior.
//!
//! [`SpecTrace`] mirrors the [`Specification`](crate::Specification) tree but
//! captures evaluation results instead of inputs. Use
//! [`Specification::evaluate_with_trace`](crate::Specification::evaluate_with_trace)
//! to see which sub-expressions decided the outcome.
//!
//! # Example
//!
//! ```ignore
//! let trace = spec.evaluate_with_trace(&person);
//! println!("matched: {}", trace.matched());
//! println!("{trace:#?}");
//! ```

use std::fmt;

/// Trace of a specification evaluation.
///
/// Short-circuiting is preserved: when an And's left side is `false` (or an
/// Or's left side is `true`) the right side is `None` and was never invoked.
pub enum SpecTrace {
    /// An attribute comparison.
    Leaf {
        /// Whether this leaf matched.
        matched: bool,
        /// Attribute name.
        attribute: String,
        /// The extracted value (Debug format).
        value: String,
        /// The comparison, e.g. `"> 18"`.
        comparison: String,
    },
    /// A named custom test.
    Custom {
        /// Whether the test passed.
        matched: bool,
        /// The test's name.
        name: String,
    },
    /// AND of two children.
    And {
        /// Whether both children matched.
        matched: bool,
        /// Trace of the left child.
        left: Box<SpecTrace>,
        /// Trace of the right child, `None` if skipped.
        right: Option<Box<SpecTrace>>,
    },
    /// OR of two children.
    Or {
        /// Whether either child matched.
        matched: bool,
        /// Trace of the left child.
        left: Box<SpecTrace>,
        /// Trace of the right child, `None` if skipped.
        right: Option<Box<SpecTrace>>,
    },
    /// NOT: inverts inner result.
    Not {
        /// Whether the NOT matched (i.e., inner did NOT match).
        matched: bool,
        /// Trace of the inner specification.
        inner: Box<SpecTrace>,
    },
}

impl SpecTrace {
    /// Get the overall match result.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Leaf { matched, .. }
            | Self::Custom { matched, .. }
            | Self::And { matched, .. }
            | Self::Or { matched, .. }
            | Self::Not { matched, .. } => *matched,
        }
    }

    /// Number of leaves that were actually evaluated.
    #[must_use]
    pub fn evaluated_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } | Self::Custom { .. } => 1,
            Self::And { left, right, .. } | Self::Or { left, right, .. } => {
                left.evaluated_leaves() + right.as_ref().map_or(0, |r| r.evaluated_leaves())
            }
            Self::Not { inner, .. } => inner.evaluated_leaves(),
        }
    }
}

impl fmt::Debug for SpecTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf {
                matched,
                attribute,
                value,
                comparison,
            } => f
                .debug_struct("Leaf")
                .field("matched", matched)
                .field("attribute", attribute)
                .field("value", value)
                .field("comparison", comparison)
                .finish(),
            Self::Custom { matched, name } => f
                .debug_struct("Custom")
                .field("matched", matched)
                .field("name", name)
                .finish(),
            Self::And {
                matched,
                left,
                right,
            } => f
                .debug_struct("And")
                .field("matched", matched)
                .field("left", left)
                .field("right", right)
                .finish(),
            Self::Or {
                matched,
                left,
                right,
            } => f
                .debug_struct("Or")
                .field("matched", matched)
                .field("left", left)
                .field("right", right)
                .finish(),
            Self::Not { matched, inner } => f
                .debug_struct("Not")
                .field("matched", matched)
                .field("inner", inner)
                .finish(),
        }
    }
}
