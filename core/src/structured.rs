//! Structured form — the inspectable, non-executable mirror of a specification.
//!
//! [`StructuredPredicate`] is the handoff artifact for anything that needs to
//! understand a rule without calling it: query translators, persistence,
//! the registry that loads rules back from JSON or YAML.
//!
//! # Relationship to runtime types
//!
//! | Structured variant | Runtime node |
//! |--------------------|--------------|
//! | `leaf` | [`Condition::Compare`](crate::Condition::Compare) |
//! | `custom` | [`Condition::Custom`](crate::Condition::Custom) (name only) |
//! | `and` / `or` / `not` | [`Node::And`](crate::Node::And) / [`Node::Or`](crate::Node::Or) / [`Node::Not`](crate::Node::Not) |
//!
//! Uses `#[serde(tag = "type")]` for discriminated union (de)serialization:
//!
//! ```json
//! { "type": "leaf", "attribute": "age", "op": "gt", "value": 18 }
//! { "type": "custom", "name": "has_license" }
//! { "type": "and", "left": { ... }, "right": { ... } }
//! { "type": "or", "left": { ... }, "right": { ... } }
//! { "type": "not", "predicate": { ... } }
//! ```

use crate::{CompareOp, Condition, Literal, Node, Specification};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tagged tree mirroring a [`Specification`]'s shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredPredicate {
    /// Attribute comparison.
    Leaf {
        /// Attribute name.
        attribute: String,
        /// Comparison kind.
        op: CompareOp,
        /// The literal compared against.
        value: Literal,
    },

    /// Opaque named test; only its name is known.
    Custom {
        /// Name of the test.
        name: String,
    },

    /// Both children must hold.
    And {
        /// Left operand.
        left: Box<StructuredPredicate>,
        /// Right operand.
        right: Box<StructuredPredicate>,
    },

    /// Either child must hold.
    Or {
        /// Left operand.
        left: Box<StructuredPredicate>,
        /// Right operand.
        right: Box<StructuredPredicate>,
    },

    /// The child must not hold.
    Not {
        /// The predicate to negate.
        predicate: Box<StructuredPredicate>,
    },
}

impl StructuredPredicate {
    /// Leaf constructor.
    pub fn leaf(attribute: impl Into<String>, op: CompareOp, value: impl Into<Literal>) -> Self {
        Self::Leaf {
            attribute: attribute.into(),
            op,
            value: value.into(),
        }
    }

    /// `And` constructor.
    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `Or` constructor.
    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `Not` constructor.
    #[must_use]
    pub fn negate(predicate: Self) -> Self {
        Self::Not {
            predicate: Box::new(predicate),
        }
    }

    /// Depth of the tree; a lone leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } | Self::Custom { .. } => 1,
            Self::And { left, right } | Self::Or { left, right } => {
                1 + left.depth().max(right.depth())
            }
            Self::Not { predicate } => 1 + predicate.depth(),
        }
    }

    /// Number of leaves (including custom ones).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } | Self::Custom { .. } => 1,
            Self::And { left, right } | Self::Or { left, right } => {
                left.leaf_count() + right.leaf_count()
            }
            Self::Not { predicate } => predicate.leaf_count(),
        }
    }

    /// Distinct attribute names referenced by leaves, in first-seen order.
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_attributes(&mut names);
        names
    }

    fn collect_attributes<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Leaf { attribute, .. } => {
                if !names.contains(&attribute.as_str()) {
                    names.push(attribute);
                }
            }
            Self::Custom { .. } => {}
            Self::And { left, right } | Self::Or { left, right } => {
                left.collect_attributes(names);
                right.collect_attributes(names);
            }
            Self::Not { predicate } => predicate.collect_attributes(names),
        }
    }

    /// Returns `true` if any leaf is a custom test.
    #[must_use]
    pub fn has_custom(&self) -> bool {
        match self {
            Self::Leaf { .. } => false,
            Self::Custom { .. } => true,
            Self::And { left, right } | Self::Or { left, right } => {
                left.has_custom() || right.has_custom()
            }
            Self::Not { predicate } => predicate.has_custom(),
        }
    }

    /// Rewrite into negation normal form.
    ///
    /// Double negations are removed and `not` is pushed through `and`/`or`
    /// (De Morgan) until it sits directly above a leaf. Leaf comparisons are
    /// never flipped: `not(age > 18)` holds for a missing age, `age <= 18`
    /// does not.
    ///
    /// This is an explicit pass. Nothing in the crate calls it implicitly.
    ///
    /// ```
    /// use sieve::{CompareOp, StructuredPredicate as P};
    ///
    /// let a = P::leaf("age", CompareOp::Gt, 18);
    /// let b = P::leaf("profession", CompareOp::Eq, "Doctor");
    /// let p = P::negate(P::and(a.clone(), P::negate(b.clone())));
    ///
    /// assert_eq!(p.simplify(), P::or(P::negate(a), b));
    /// ```
    #[must_use]
    pub fn simplify(&self) -> Self {
        match self {
            Self::Leaf { .. } | Self::Custom { .. } => self.clone(),
            Self::And { left, right } => Self::and(left.simplify(), right.simplify()),
            Self::Or { left, right } => Self::or(left.simplify(), right.simplify()),
            Self::Not { predicate } => predicate.negated_normal_form(),
        }
    }

    fn negated_normal_form(&self) -> Self {
        match self {
            Self::Leaf { .. } | Self::Custom { .. } => Self::negate(self.clone()),
            Self::And { left, right } => {
                Self::or(left.negated_normal_form(), right.negated_normal_form())
            }
            Self::Or { left, right } => {
                Self::and(left.negated_normal_form(), right.negated_normal_form())
            }
            Self::Not { predicate } => predicate.simplify(),
        }
    }
}

impl fmt::Display for StructuredPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf {
                attribute,
                op,
                value,
            } => write!(f, "{attribute} {op} {value}"),
            Self::Custom { name } => write!(f, "{name}(..)"),
            Self::And { left, right } => write!(f, "({left} AND {right})"),
            Self::Or { left, right } => write!(f, "({left} OR {right})"),
            Self::Not { predicate } => write!(f, "NOT {predicate}"),
        }
    }
}

impl<E> Specification<E> {
    /// Extract the structured form of this specification.
    ///
    /// A pure structural transform: no attribute is read and no custom test
    /// is invoked.
    #[must_use]
    pub fn to_structured_form(&self) -> StructuredPredicate {
        match self.node() {
            Node::Leaf(Condition::Compare {
                attribute,
                comparison,
            }) => StructuredPredicate::Leaf {
                attribute: attribute.name().to_string(),
                op: comparison.op(),
                value: comparison.literal().clone(),
            },
            Node::Leaf(Condition::Custom { name, .. }) => {
                StructuredPredicate::Custom { name: name.clone() }
            }
            Node::And(l, r) => StructuredPredicate::and(l.to_structured_form(), r.to_structured_form()),
            Node::Or(l, r) => StructuredPredicate::or(l.to_structured_form(), r.to_structured_form()),
            Node::Not(inner) => StructuredPredicate::negate(inner.to_structured_form()),
        }
    }
}
