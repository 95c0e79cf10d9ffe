//! Attribute registry for loading specifications from their structured form.
//!
//! A [`StructuredPredicate`] names attributes and custom tests but carries no
//! code. The registry maps those names back to [`Attribute`] implementations
//! and closures, turning a persisted rule (JSON, YAML, a database column) into
//! a runnable [`Specification`].
//!
//! # Arch constraint: immutability after build
//!
//! Registration happens on [`RegistryBuilder`]; [`build()`](RegistryBuilder::build)
//! freezes it. A `Registry` can be shared across threads and never changes.
//!
//! # Example
//!
//! ```
//! use sieve::{RegistryBuilder, Value};
//!
//! struct Person { age: u32 }
//!
//! let registry = RegistryBuilder::new()
//!     .attribute_fn("age", |p: &Person| Value::from(p.age))
//!     .build();
//!
//! let adults = registry
//!     .load_json(r#"{ "type": "leaf", "attribute": "age", "op": "gt", "value": 18 }"#)
//!     .unwrap();
//! assert!(adults.is_satisfied_by(&Person { age: 25 }));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    Attribute, Comparison, FnAttribute, SpecError, Specification, StructuredPredicate, Value,
    MAX_DEPTH,
};

/// Type-erased custom test.
type BoxedCustomTest<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Builder for constructing a [`Registry`].
pub struct RegistryBuilder<E> {
    attributes: HashMap<String, Arc<dyn Attribute<E>>>,
    conditions: HashMap<String, BoxedCustomTest<E>>,
}

impl<E: 'static> RegistryBuilder<E> {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
            conditions: HashMap::new(),
        }
    }

    /// Register an attribute under its own [`name()`](Attribute::name).
    ///
    /// Registering a second attribute with the same name replaces the first.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Attribute<E> + 'static) -> Self {
        self.attributes
            .insert(attribute.name().to_owned(), Arc::new(attribute));
        self
    }

    /// Register a plain selector function as an attribute.
    #[must_use]
    pub fn attribute_fn(self, name: &str, selector: fn(&E) -> Value) -> Self {
        self.attribute(FnAttribute::new(name, selector))
    }

    /// Register a named custom test, resolvable from `custom` nodes.
    #[must_use]
    pub fn custom<F>(mut self, name: &str, test: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.conditions.insert(name.to_owned(), Arc::new(test));
        self
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn build(self) -> Registry<E> {
        Registry {
            attributes: self.attributes,
            conditions: self.conditions,
        }
    }
}

impl<E: 'static> Default for RegistryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable registry of attributes and custom tests.
///
/// Constructed via [`RegistryBuilder`]. Use [`load()`](Self::load) to turn a
/// structured form into a runtime [`Specification`].
pub struct Registry<E> {
    attributes: HashMap<String, Arc<dyn Attribute<E>>>,
    conditions: HashMap<String, BoxedCustomTest<E>>,
}

impl<E: 'static> Registry<E> {
    /// Load a specification from its structured form.
    ///
    /// # Errors
    ///
    /// - [`SpecError::DepthExceeded`] — tree deeper than [`MAX_DEPTH`]
    /// - [`SpecError::UnknownAttribute`] — a leaf names an unregistered attribute
    /// - [`SpecError::UnknownCondition`] — a custom node names an unregistered test
    /// - [`SpecError::Construction`] / [`SpecError::InvalidPattern`] /
    ///   [`SpecError::PatternTooLong`] — a leaf's operator/literal pairing is invalid
    pub fn load(&self, form: &StructuredPredicate) -> Result<Specification<E>, SpecError> {
        let depth = form.depth();
        if depth > MAX_DEPTH {
            return Err(SpecError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        let spec = self.load_node(form)?;
        debug!(depth, leaves = spec.leaf_count(), "loaded specification");
        Ok(spec)
    }

    /// Parse a JSON structured form and load it.
    ///
    /// # Errors
    ///
    /// [`SpecError::InvalidConfig`] if the JSON does not describe a structured
    /// form, otherwise the errors of [`load()`](Self::load).
    pub fn load_json(&self, json: &str) -> Result<Specification<E>, SpecError> {
        let form: StructuredPredicate =
            serde_json::from_str(json).map_err(|e| SpecError::InvalidConfig {
                reason: e.to_string(),
            })?;
        self.load(&form)
    }

    /// Parse a YAML structured form and load it.
    ///
    /// # Errors
    ///
    /// [`SpecError::InvalidConfig`] if the YAML does not describe a structured
    /// form, otherwise the errors of [`load()`](Self::load).
    pub fn load_yaml(&self, yaml: &str) -> Result<Specification<E>, SpecError> {
        let form: StructuredPredicate =
            serde_yaml::from_str(yaml).map_err(|e| SpecError::InvalidConfig {
                reason: e.to_string(),
            })?;
        self.load(&form)
    }

    fn load_node(&self, form: &StructuredPredicate) -> Result<Specification<E>, SpecError> {
        match form {
            StructuredPredicate::Leaf {
                attribute,
                op,
                value,
            } => {
                let attr = self.attributes.get(attribute).ok_or_else(|| {
                    SpecError::UnknownAttribute {
                        name: attribute.clone(),
                        available: self.attribute_names().into_iter().map(str::to_owned).collect(),
                    }
                })?;
                let comparison = Comparison::new(*op, value.clone())?;
                Ok(Specification::leaf_shared(Arc::clone(attr), comparison))
            }
            StructuredPredicate::Custom { name } => {
                let test = self.conditions.get(name).ok_or_else(|| {
                    SpecError::UnknownCondition {
                        name: name.clone(),
                        available: self.condition_names().into_iter().map(str::to_owned).collect(),
                    }
                })?;
                Ok(Specification::custom_shared(name.as_str(), Arc::clone(test)))
            }
            StructuredPredicate::And { left, right } => {
                Ok(self.load_node(left)?.and(&self.load_node(right)?))
            }
            StructuredPredicate::Or { left, right } => {
                Ok(self.load_node(left)?.or(&self.load_node(right)?))
            }
            StructuredPredicate::Not { predicate } => Ok(self.load_node(predicate)?.not()),
        }
    }

    /// Look up a registered attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Arc<dyn Attribute<E>>> {
        self.attributes.get(name).cloned()
    }

    /// Returns `true` if the given attribute name is registered.
    #[must_use]
    pub fn contains_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns `true` if the given custom test name is registered.
    #[must_use]
    pub fn contains_condition(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// Returns all registered attribute names (sorted).
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns all registered custom test names (sorted).
    #[must_use]
    pub fn condition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conditions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.conditions.is_empty()
    }
}
