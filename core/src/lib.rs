//! sieve - composable business-rule specifications
//!
//! A specification is a named, reusable boolean predicate over a domain
//! entity. Specifications compose with `and`, `or` and `not` into new
//! specifications without mutating their operands, evaluate against one
//! entity at a time, and can be extracted into a [`StructuredPredicate`] so a
//! store can translate them into its own filter language.
//!
//! # Architecture
//!
//! - [`Attribute<E>`] — reads a [`Value`] out of an entity
//! - [`Comparison`] — an operator plus a [`Literal`], domain-agnostic
//! - [`Specification<E>`] — immutable tree of leaves and `And`/`Or`/`Not` nodes
//! - [`StructuredPredicate`] — serializable, entity-free form of a specification
//! - [`Registry<E>`] — rebuilds specifications from structured forms by name
//! - [`Collection<E>`] / [`Translator`] — filtering a store by a specification
//!
//! # Key invariants
//!
//! 1. **Absent → false**: a comparison against [`Value::None`] is `false`.
//!    `not` of that leaf is `true`.
//!
//! 2. **Short-circuit**: `And` skips its right child when the left is `false`,
//!    `Or` skips it when the left is `true`.
//!
//! 3. **Immutability**: composing never changes an operand. Subtrees are
//!    shared through `Arc`, so composition is cheap.
//!
//! # Example
//!
//! ```
//! use sieve::prelude::*;
//!
//! #[derive(Debug)]
//! struct Person { age: Option<u32>, profession: &'static str }
//!
//! let adults = Specification::compare(
//!     FnAttribute::new("age", |p: &Person| Value::from(p.age)),
//!     CompareOp::Gt,
//!     18,
//! )
//! .unwrap();
//! let doctors = Specification::compare(
//!     FnAttribute::new("profession", |p: &Person| Value::from(p.profession)),
//!     CompareOp::Eq,
//!     "Doctor",
//! )
//! .unwrap();
//!
//! let adult_doctors = &adults & &doctors;
//! assert!(adult_doctors.is_satisfied_by(&Person { age: Some(40), profession: "Doctor" }));
//! assert!(!adult_doctors.is_satisfied_by(&Person { age: None, profession: "Doctor" }));
//! assert_eq!(
//!     adult_doctors.to_structured_form().to_string(),
//!     r#"(age > 18 AND profession == "Doctor")"#
//! );
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod attribute;
mod collection;
mod comparison;
mod registry;
mod specification;
mod structured;
mod trace;
mod translate;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use attribute::{Attribute, FnAttribute, Record};
pub use comparison::{CompareOp, Comparison};
pub use specification::{is_satisfied_by, Condition, Node, Specification};
pub use structured::StructuredPredicate;
pub use value::{ExactLiteral, Literal, Value};

// Registry
pub use registry::{Registry, RegistryBuilder};

// Trace types
pub use trace::SpecTrace;

// Stores and translators
pub use collection::{Collection, InMemoryCollection, RecordStore};
pub use translate::{
    NativeFilter, NativeTranslator, Placeholder, SqlFilter, SqlTranslator, Translator,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use sieve::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Traits
        Attribute,
        Collection,
        // Core types
        CompareOp,
        Comparison,
        FnAttribute,
        InMemoryCollection,
        Literal,
        Record,
        RecordStore,
        Registry,
        RegistryBuilder,
        // Errors
        SpecError,
        SpecTrace,
        Specification,
        StructuredPredicate,
        Translator,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum depth of a specification loaded from a structured form.
///
/// Protects the recursive evaluator from stack overflow on hostile rule
/// files. Checked by [`Registry::load`].
pub const MAX_DEPTH: usize = 32;

/// Maximum length for non-regex string literals (prefix, suffix, contains).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex patterns.
///
/// Shorter than [`MAX_PATTERN_LENGTH`] because regex compilation cost grows
/// faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from building, loading and translating specifications.
///
/// Evaluation itself never fails: every variant is raised at construction,
/// load, or translation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// An operator was paired with a literal it cannot take.
    #[error("invalid comparison: {reason}")]
    Construction {
        /// What was wrong.
        reason: String,
    },
    /// A regex failed to compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },
    /// A string literal exceeds the allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// A structured leaf names an attribute the registry does not know.
    #[error("unknown attribute \"{name}\"{}", registered(.available))]
    UnknownAttribute {
        /// The unregistered name.
        name: String,
        /// Names that ARE registered, sorted.
        available: Vec<String>,
    },
    /// A structured custom node names a test the registry does not know.
    #[error("unknown condition \"{name}\"{}", registered(.available))]
    UnknownCondition {
        /// The unregistered name.
        name: String,
        /// Names that ARE registered, sorted.
        available: Vec<String>,
    },
    /// A structured form nests deeper than [`MAX_DEPTH`].
    #[error("specification depth is {depth}, but maximum allowed is {max}; flatten the rule")]
    DepthExceeded {
        /// Actual depth.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// A rule document did not parse as a structured form.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },
    /// A translator met a node it has no exact equivalent for.
    #[error("{translator} translator cannot express {node}")]
    TranslationUnsupported {
        /// The offending node, rendered.
        node: String,
        /// Which translator refused.
        translator: &'static str,
    },
}

/// Result alias for fallible sieve operations.
pub type Result<T> = std::result::Result<T, SpecError>;

fn registered(available: &[String]) -> String {
    if available.is_empty() {
        " (none registered)".to_string()
    } else {
        format!(" (registered: {})", available.join(", "))
    }
}
