//! `Attribute` — Entity-specific value extraction
//!
//! The `Attribute` trait reads one named value out of an entity and returns an
//! erased [`Value`]. Leaf specifications pair an attribute with a
//! [`Comparison`](crate::Comparison); the name is what ends up in the
//! structured form that translators see.
//!
//! [`Record`] is the other direction: by-name lookup on an entity, the only
//! view a store-backed collection has of the rows it filters.

use crate::Value;
use std::fmt::{self, Debug};

/// Extracts a named value from an entity of type `E`.
///
/// # Purity
///
/// `get` must be a pure function of the entity's current attribute values:
/// no hidden mutable state, no randomness, no I/O. Evaluation determinism
/// rests on this.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so a specification tree can be
/// shared across threads.
///
/// # Example
///
/// ```
/// use sieve::{Attribute, Value};
///
/// #[derive(Debug)]
/// struct Person { age: Option<u32> }
///
/// #[derive(Debug)]
/// struct AgeAttribute;
///
/// impl Attribute<Person> for AgeAttribute {
///     fn name(&self) -> &str { "age" }
///     fn get(&self, person: &Person) -> Value { person.age.into() }
/// }
///
/// assert_eq!(AgeAttribute.get(&Person { age: Some(25) }), Value::Int(25));
/// assert!(AgeAttribute.get(&Person { age: None }).is_none());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Attribute<{E}>`",
    label = "this type cannot extract a value from `{E}`",
    note = "Attribute<E> extracts a named value from a specific entity type"
)]
pub trait Attribute<E>: Send + Sync + Debug {
    /// The attribute name, as it appears in structured forms.
    fn name(&self) -> &str;

    /// Extract the value from the given entity.
    ///
    /// Returns [`Value::None`] if the entity has no value for this attribute.
    fn get(&self, entity: &E) -> Value;
}

/// An [`Attribute`] built from a name and a plain selector function.
///
/// # Example
///
/// ```
/// use sieve::{Attribute, FnAttribute, Value};
///
/// struct Item { price: i64 }
///
/// let price = FnAttribute::new("price", |item: &Item| Value::Int(item.price));
/// assert_eq!(price.name(), "price");
/// assert_eq!(price.get(&Item { price: 3 }), Value::Int(3));
/// ```
pub struct FnAttribute<E> {
    name: String,
    selector: fn(&E) -> Value,
}

impl<E> FnAttribute<E> {
    /// Create an attribute from a name and selector.
    pub fn new(name: impl Into<String>, selector: fn(&E) -> Value) -> Self {
        Self {
            name: name.into(),
            selector,
        }
    }
}

impl<E> Attribute<E> for FnAttribute<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, entity: &E) -> Value {
        (self.selector)(entity)
    }
}

impl<E> Debug for FnAttribute<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnAttribute").field(&self.name).finish()
    }
}

/// By-name attribute lookup, as seen by a store-backed collection.
///
/// Implementations must agree with the entity's [`Attribute`]s: for every
/// registered attribute `a`, `record.attribute(a.name()) == a.get(record)`.
/// Unknown names return [`Value::None`].
pub trait Record {
    /// Look up the value stored under `name`.
    fn attribute(&self, name: &str) -> Value;
}
