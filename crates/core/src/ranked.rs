//! Ordered collection of (item, rank) pairs, highest rank first.

use std::sync::{Arc, RwLock};

/// One entry of a [`RankedSequence`].
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    item: T,
    rank: i32,
}

impl<T> Ranked<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }
}

/// Thread-safe sequence sorted by descending rank; ties keep insertion order.
///
/// Mutation is copy-on-write over a shared `Arc<Vec>`, so a [`snapshot`]
/// taken at any moment is immutable and safe to iterate while the live
/// sequence keeps changing.
///
/// [`snapshot`]: RankedSequence::snapshot
pub struct RankedSequence<T> {
    inner: RwLock<Arc<Vec<Ranked<T>>>>,
}

impl<T: Clone> RankedSequence<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Insert the item at its rank position: after existing entries of equal
    /// or higher rank, before lower-ranked ones.
    pub fn insert(&self, item: T, rank: i32) {
        let mut guard = self.inner.write().expect("ranked sequence lock poisoned");
        let mut items = guard.as_ref().clone();
        let at = items.partition_point(|entry| entry.rank >= rank);
        items.insert(at, Ranked { item, rank });
        *guard = Arc::new(items);
    }

    /// Remove the first item matching the predicate, returning it.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let mut guard = self.inner.write().expect("ranked sequence lock poisoned");
        let at = guard.iter().position(|entry| pred(&entry.item))?;
        let mut items = guard.as_ref().clone();
        let removed = items.remove(at);
        *guard = Arc::new(items);
        Some(removed.item)
    }

    pub fn contains_where(&self, pred: impl Fn(&T) -> bool) -> bool {
        let guard = self.inner.read().expect("ranked sequence lock poisoned");
        guard.iter().any(|entry| pred(&entry.item))
    }

    /// Immutable point-in-time view; never reflects later mutations.
    pub fn snapshot(&self) -> RankedSnapshot<T> {
        let guard = self.inner.read().expect("ranked sequence lock poisoned");
        RankedSnapshot {
            items: guard.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("ranked sequence lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for RankedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view over a [`RankedSequence`] at one point in time.
#[derive(Debug, Clone)]
pub struct RankedSnapshot<T> {
    items: Arc<Vec<Ranked<T>>>,
}

impl<T> RankedSnapshot<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, Ranked<T>> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Ranked<T>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a RankedSnapshot<T> {
    type Item = &'a Ranked<T>;
    type IntoIter = std::slice::Iter<'a, Ranked<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
