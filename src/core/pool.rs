//! The per-invocation value pool.
//!
//! A pool maps each [`TypeToken`] to the single most-recently-produced value
//! of that type. It is created fresh for every pipeline invocation and never
//! shared between calls.

use crate::core::types::{BoxedValue, TypeToken};
use indexmap::IndexMap;
use std::fmt;

/// Type-keyed storage for the values produced during one invocation.
///
/// Only the latest value per type is retained: inserting a value whose type
/// is already present overwrites the previous one. Iteration order is
/// insertion order, which for a running pipeline is execution order.
#[derive(Clone, Default)]
pub struct ValuePool {
    values: IndexMap<TypeToken, BoxedValue>,
}

impl ValuePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Create an empty pool with room for `capacity` distinct types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert an erased value, returning the previous value of that type.
    pub fn insert(&mut self, value: BoxedValue) -> Option<BoxedValue> {
        self.values.insert(value.token(), value)
    }

    /// Insert a sequence of erased values in order.
    pub fn insert_all(&mut self, values: impl IntoIterator<Item = BoxedValue>) {
        for value in values {
            self.insert(value);
        }
    }

    /// Insert a concrete value, returning the previous value of that type.
    pub fn put<T: Clone + Send + 'static>(&mut self, value: T) -> Option<BoxedValue> {
        self.insert(BoxedValue::new(value))
    }

    /// Get the latest value of a type by token.
    pub fn get(&self, token: TypeToken) -> Option<&BoxedValue> {
        self.values.get(&token)
    }

    /// Borrow the latest value of a concrete type.
    pub fn get_as<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeToken::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Clone the latest value of a concrete type out of the pool.
    pub fn clone_out<T: Clone + Send + 'static>(&self) -> Option<T> {
        self.get_as::<T>().cloned()
    }

    /// Check whether a value of the given type is present.
    pub fn contains(&self, token: TypeToken) -> bool {
        self.values.contains_key(&token)
    }

    /// Tokens of all present values, in insertion order.
    pub fn tokens(&self) -> impl Iterator<Item = TypeToken> + '_ {
        self.values.keys().copied()
    }

    /// Number of distinct types in the pool.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the pool holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ValuePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.keys().map(|token| token.name()))
            .finish()
    }
}
