//! Specification — Boolean rules over entities
//!
//! A [`Specification`] is an immutable, shareable rule tree. Leaves test one
//! [`Condition`]; composites combine child specifications with AND, OR and NOT.
//! Composition never mutates its operands and never evaluates anything: it
//! allocates one node and shares the children by reference count.

use crate::{Attribute, CompareOp, Comparison, Literal, SpecError, SpecTrace};
use std::fmt::{self, Debug};
use std::ops;
use std::sync::Arc;

/// An opaque boolean test, shared between every tree that references it.
type CustomTest<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// An atomic test over a single entity.
///
/// Two kinds exist:
///
/// - `Compare` — an attribute, an operator and a literal. Fully inspectable,
///   so it survives translation into a structured form.
/// - `Custom` — a named closure. Callable but opaque: translators only see the
///   name and must refuse it.
///
/// # INV: None → false
///
/// If the attribute yields [`Value::None`](crate::Value::None), a `Compare`
/// condition evaluates to `false`.
pub enum Condition<E> {
    /// Attribute comparison against a literal captured at construction.
    Compare {
        /// The attribute to read from the entity.
        attribute: Arc<dyn Attribute<E>>,
        /// How to test the attribute's value.
        comparison: Comparison,
    },
    /// A named opaque test.
    Custom {
        /// Name shown in structured forms and traces.
        name: String,
        /// The test itself.
        test: CustomTest<E>,
    },
}

impl<E> Condition<E> {
    /// Evaluate this condition against the given entity.
    pub fn evaluate(&self, entity: &E) -> bool {
        match self {
            Self::Compare {
                attribute,
                comparison,
            } => comparison.matches(&attribute.get(entity)),
            Self::Custom { test, .. } => test(entity),
        }
    }

    fn evaluate_with_trace(&self, entity: &E) -> SpecTrace {
        match self {
            Self::Compare {
                attribute,
                comparison,
            } => {
                let value = attribute.get(entity);
                SpecTrace::Leaf {
                    matched: comparison.matches(&value),
                    attribute: attribute.name().to_string(),
                    value: format!("{value:?}"),
                    comparison: comparison.to_string(),
                }
            }
            Self::Custom { name, test } => SpecTrace::Custom {
                matched: test(entity),
                name: name.clone(),
            },
        }
    }
}

impl<E> Debug for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                attribute,
                comparison,
            } => write!(f, "{} {comparison}", attribute.name()),
            Self::Custom { name, .. } => write!(f, "{name}(..)"),
        }
    }
}

/// The shape of a specification node.
///
/// Obtained through [`Specification::node`]. Evaluation and translation are
/// exhaustive matches over these four variants.
pub enum Node<E> {
    /// An atomic condition.
    Leaf(Condition<E>),
    /// Satisfied iff both children are satisfied.
    And(Specification<E>, Specification<E>),
    /// Satisfied iff either child is satisfied.
    Or(Specification<E>, Specification<E>),
    /// Satisfied iff the child is not.
    Not(Specification<E>),
}

/// A composable, immutable boolean rule over entities of type `E`.
///
/// Cloning is O(1) and shares the tree. The same leaf or subtree may appear in
/// any number of composite rules.
///
/// # Example
///
/// ```
/// use sieve::{Comparison, FnAttribute, Specification, Value};
///
/// struct Person { age: u32, profession: &'static str }
///
/// let adult = Specification::leaf(
///     FnAttribute::new("age", |p: &Person| Value::from(p.age)),
///     Comparison::gt(18),
/// );
/// let doctor = Specification::leaf(
///     FnAttribute::new("profession", |p: &Person| Value::from(p.profession)),
///     Comparison::eq("Doctor"),
/// );
///
/// let adult_doctor = adult.and(&doctor);
/// assert!(adult_doctor.is_satisfied_by(&Person { age: 30, profession: "Doctor" }));
/// assert!(!adult_doctor.is_satisfied_by(&Person { age: 30, profession: "Dentist" }));
/// ```
pub struct Specification<E> {
    node: Arc<Node<E>>,
}

impl<E> Clone for Specification<E> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<E> Specification<E> {
    fn from_node(node: Node<E>) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Build a leaf that compares an attribute against a literal.
    pub fn leaf(attribute: impl Attribute<E> + 'static, comparison: Comparison) -> Self {
        Self::leaf_shared(Arc::new(attribute), comparison)
    }

    /// Build a leaf from an attribute that is already shared.
    pub fn leaf_shared(attribute: Arc<dyn Attribute<E>>, comparison: Comparison) -> Self {
        Self::from_node(Node::Leaf(Condition::Compare {
            attribute,
            comparison,
        }))
    }

    /// Build a leaf from an operator and literal, validating the pairing.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Comparison::new`] if the operator cannot take
    /// the literal or the pattern is invalid.
    pub fn compare(
        attribute: impl Attribute<E> + 'static,
        op: CompareOp,
        literal: impl Into<Literal>,
    ) -> Result<Self, SpecError> {
        Ok(Self::leaf(attribute, Comparison::new(op, literal.into())?))
    }

    /// Build a leaf from a named closure.
    ///
    /// The closure must be a pure function of the entity. Custom leaves cannot
    /// be translated into a native filter.
    pub fn custom<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self::custom_shared(name, Arc::new(test))
    }

    pub(crate) fn custom_shared(name: impl Into<String>, test: CustomTest<E>) -> Self {
        Self::from_node(Node::Leaf(Condition::Custom {
            name: name.into(),
            test,
        }))
    }

    /// Returns a new `And` node with `self` on the left and `other` on the right.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        Self::from_node(Node::And(self.clone(), other.clone()))
    }

    /// Returns a new `Or` node with `self` on the left and `other` on the right.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        Self::from_node(Node::Or(self.clone(), other.clone()))
    }

    /// Returns a new `Not` node wrapping `self`.
    #[must_use]
    pub fn not(&self) -> Self {
        Self::from_node(Node::Not(self.clone()))
    }

    /// Fold specifications with AND into a left-leaning chain.
    ///
    /// - Empty → `None`
    /// - Single → returned as is
    /// - Multiple → `((a AND b) AND c) ...`
    pub fn all(specs: impl IntoIterator<Item = Self>) -> Option<Self> {
        specs.into_iter().reduce(|acc, s| acc.and(&s))
    }

    /// Fold specifications with OR into a left-leaning chain.
    ///
    /// Symmetric with [`all`](Self::all).
    pub fn any(specs: impl IntoIterator<Item = Self>) -> Option<Self> {
        specs.into_iter().reduce(|acc, s| acc.or(&s))
    }

    /// The node at the root of this specification.
    #[must_use]
    pub fn node(&self) -> &Node<E> {
        &self.node
    }

    /// Returns `true` if both handles point at the same tree.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Evaluate this specification against the given entity.
    ///
    /// And short-circuits on a `false` left operand, Or on a `true` one: the
    /// right operand is never invoked in those cases.
    ///
    /// # Safety Consideration
    ///
    /// This uses recursion. Trees loaded from configuration are depth-checked
    /// against [`MAX_DEPTH`](crate::MAX_DEPTH); trees built in code are the
    /// caller's responsibility.
    pub fn is_satisfied_by(&self, entity: &E) -> bool {
        match self.node() {
            Node::Leaf(condition) => condition.evaluate(entity),
            Node::And(left, right) => left.is_satisfied_by(entity) && right.is_satisfied_by(entity),
            Node::Or(left, right) => left.is_satisfied_by(entity) || right.is_satisfied_by(entity),
            Node::Not(inner) => !inner.is_satisfied_by(entity),
        }
    }

    /// The directly callable form of this specification.
    ///
    /// The returned closure shares the tree and is cheap to clone, so it can
    /// be handed to iterator adapters or other threads.
    ///
    /// ```
    /// use sieve::Specification;
    ///
    /// let even = Specification::custom("even", |n: &i64| n % 2 == 0);
    /// let evens: Vec<i64> = (1..=6).filter(even.as_fn()).collect();
    /// assert_eq!(evens, vec![2, 4, 6]);
    /// ```
    pub fn as_fn(&self) -> impl Fn(&E) -> bool + Clone + Send + Sync {
        let spec = self.clone();
        move |entity: &E| spec.is_satisfied_by(entity)
    }

    /// Evaluate with a full trace for debugging.
    ///
    /// The trace follows the same short-circuit rules as
    /// [`is_satisfied_by`](Self::is_satisfied_by): a skipped right operand is
    /// recorded as `None` and never invoked.
    #[must_use]
    pub fn evaluate_with_trace(&self, entity: &E) -> SpecTrace {
        match self.node() {
            Node::Leaf(condition) => condition.evaluate_with_trace(entity),
            Node::And(left, right) => {
                let left = left.evaluate_with_trace(entity);
                let right = left
                    .matched()
                    .then(|| Box::new(right.evaluate_with_trace(entity)));
                SpecTrace::And {
                    matched: right.as_ref().is_some_and(|r| r.matched()),
                    left: Box::new(left),
                    right,
                }
            }
            Node::Or(left, right) => {
                let left = left.evaluate_with_trace(entity);
                let right = (!left.matched()).then(|| Box::new(right.evaluate_with_trace(entity)));
                SpecTrace::Or {
                    matched: left.matched() || right.as_ref().is_some_and(|r| r.matched()),
                    left: Box::new(left),
                    right,
                }
            }
            Node::Not(inner) => {
                let inner = inner.evaluate_with_trace(entity);
                SpecTrace::Not {
                    matched: !inner.matched(),
                    inner: Box::new(inner),
                }
            }
        }
    }

    /// Returns `true` if this is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.node(), Node::Leaf(_))
    }

    /// Returns `true` if this is an `And` node.
    #[must_use]
    pub fn is_and(&self) -> bool {
        matches!(self.node(), Node::And(..))
    }

    /// Returns `true` if this is an `Or` node.
    #[must_use]
    pub fn is_or(&self) -> bool {
        matches!(self.node(), Node::Or(..))
    }

    /// Returns `true` if this is a `Not` node.
    #[must_use]
    pub fn is_not(&self) -> bool {
        matches!(self.node(), Node::Not(_))
    }

    /// Depth of the tree; a lone leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.node() {
            Node::Leaf(_) => 1,
            Node::And(l, r) | Node::Or(l, r) => 1 + l.depth().max(r.depth()),
            Node::Not(inner) => 1 + inner.depth(),
        }
    }

    /// Number of leaves, counting shared leaves once per reference.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self.node() {
            Node::Leaf(_) => 1,
            Node::And(l, r) | Node::Or(l, r) => l.leaf_count() + r.leaf_count(),
            Node::Not(inner) => inner.leaf_count(),
        }
    }
}

/// Evaluate `spec` against `entity`.
///
/// Free-function form of [`Specification::is_satisfied_by`].
pub fn is_satisfied_by<E>(spec: &Specification<E>, entity: &E) -> bool {
    spec.is_satisfied_by(entity)
}

impl<E> Debug for Specification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Leaf(c) => f.debug_tuple("Leaf").field(c).finish(),
            Node::And(l, r) => f.debug_tuple("And").field(l).field(r).finish(),
            Node::Or(l, r) => f.debug_tuple("Or").field(l).field(r).finish(),
            Node::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl<E> ops::BitAnd for Specification<E> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Specification::and(&self, &rhs)
    }
}

impl<E> ops::BitAnd for &Specification<E> {
    type Output = Specification<E>;

    fn bitand(self, rhs: Self) -> Specification<E> {
        self.and(rhs)
    }
}

impl<E> ops::BitOr for Specification<E> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Specification::or(&self, &rhs)
    }
}

impl<E> ops::BitOr for &Specification<E> {
    type Output = Specification<E>;

    fn bitor(self, rhs: Self) -> Specification<E> {
        self.or(rhs)
    }
}

impl<E> ops::Not for Specification<E> {
    type Output = Self;

    fn not(self) -> Self {
        Specification::not(&self)
    }
}

impl<E> ops::Not for &Specification<E> {
    type Output = Specification<E>;

    fn not(self) -> Specification<E> {
        Specification::not(self)
    }
}

// Note: No unsafe impl needed. `Arc<dyn Attribute<E>>` and the custom test
// closure are both `Send + Sync` by bound, so `Specification<E>` is too.
