//! Collection filters — "give me everything that satisfies this specification".
//!
//! [`InMemoryCollection`] runs the evaluator over each entity. [`RecordStore`]
//! compiles the specification once through [`NativeTranslator`] and filters
//! [`Record`]s with the result, which is what a database-backed store does
//! with its own query language. Both return matches in original order.

use tracing::debug;

use crate::{
    NativeFilter, NativeTranslator, Record, SpecError, Specification, StructuredPredicate,
    Translator,
};

/// A store that can be filtered by a [`Specification`].
pub trait Collection<E> {
    /// Every entity satisfying `spec`, in the store's iteration order.
    ///
    /// # Errors
    ///
    /// [`SpecError::TranslationUnsupported`] if the store cannot execute some
    /// node of `spec` exactly. Stores never return a partially-filtered result.
    fn find(&self, spec: &Specification<E>) -> Result<Vec<&E>, SpecError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════════════════════════════════════════

/// A `Vec`-backed collection filtered by running the evaluator.
///
/// Accepts every specification, custom leaves included.
///
/// ```
/// use sieve::{Collection, FnAttribute, InMemoryCollection, Specification, Value};
///
/// let ages: InMemoryCollection<u32> = [4, 19, 40].into_iter().collect();
/// let adult = Specification::compare(
///     FnAttribute::new("age", |a: &u32| Value::from(*a)),
///     sieve::CompareOp::Gt,
///     18,
/// )
/// .unwrap();
/// assert_eq!(ages.find(&adult).unwrap(), vec![&19, &40]);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCollection<E> {
    items: Vec<E>,
}

impl<E> InMemoryCollection<E> {
    /// Wrap a vector.
    #[must_use]
    pub fn new(items: Vec<E>) -> Self {
        Self { items }
    }

    /// Append an entity.
    pub fn push(&mut self, item: E) {
        self.items.push(item);
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    /// Every entity satisfying `spec`. Never fails.
    #[must_use]
    pub fn filter(&self, spec: &Specification<E>) -> Vec<&E> {
        let matched: Vec<&E> = self
            .items
            .iter()
            .filter(|e| spec.is_satisfied_by(e))
            .collect();
        debug!(
            scanned = self.items.len(),
            matched = matched.len(),
            "filtered in-memory collection"
        );
        matched
    }

    /// How many entities satisfy `spec`.
    #[must_use]
    pub fn count(&self, spec: &Specification<E>) -> usize {
        self.items.iter().filter(|e| spec.is_satisfied_by(e)).count()
    }

    /// Whether at least one entity satisfies `spec`.
    #[must_use]
    pub fn any(&self, spec: &Specification<E>) -> bool {
        self.items.iter().any(|e| spec.is_satisfied_by(e))
    }

    /// Whether every entity satisfies `spec`. True for an empty collection.
    #[must_use]
    pub fn all(&self, spec: &Specification<E>) -> bool {
        self.items.iter().all(|e| spec.is_satisfied_by(e))
    }

    /// Unwrap into the backing vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<E> {
        self.items
    }
}

impl<E> Default for InMemoryCollection<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E> FromIterator<E> for InMemoryCollection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, E> IntoIterator for &'a InMemoryCollection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E> Collection<E> for InMemoryCollection<E> {
    fn find(&self, spec: &Specification<E>) -> Result<Vec<&E>, SpecError> {
        Ok(self.filter(spec))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Record store
// ═══════════════════════════════════════════════════════════════════════════════

/// A store of [`Record`]s filtered through the structured form.
///
/// The specification is never evaluated against entities directly: it is
/// extracted with [`Specification::to_structured_form`], compiled into a
/// [`NativeFilter`], and the filter runs over records by attribute name.
/// Custom leaves have no structured body and fail with
/// [`SpecError::TranslationUnsupported`].
///
/// For records whose [`Record::attribute`] agrees with the attributes the
/// specification was built from, `find` returns the same entities as
/// [`InMemoryCollection::find`].
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    /// Wrap a vector of records.
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Filter by a structured form directly.
    ///
    /// # Errors
    ///
    /// Whatever [`NativeTranslator::translate`] returns for `form`.
    pub fn find_structured(&self, form: &StructuredPredicate) -> Result<Vec<&R>, SpecError> {
        let filter = NativeTranslator.translate(form)?;
        Ok(self.run(&filter))
    }

    fn run(&self, filter: &NativeFilter) -> Vec<&R> {
        let matched: Vec<&R> = self.records.iter().filter(|r| filter.matches(*r)).collect();
        debug!(
            scanned = self.records.len(),
            matched = matched.len(),
            "filtered record store"
        );
        matched
    }
}

impl<R: Record> FromIterator<R> for RecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R: Record> Collection<R> for RecordStore<R> {
    fn find(&self, spec: &Specification<R>) -> Result<Vec<&R>, SpecError> {
        self.find_structured(&spec.to_structured_form())
    }
}
