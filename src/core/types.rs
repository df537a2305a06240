//! Type tokens, erased values, and value-list packing.
//!
//! The wiring engine never sees concrete value types at run time. Instead it
//! works with:
//! - [`TypeToken`]: a comparable identifier for a static type (nominal — two
//!   structurally identical named structs get distinct tokens)
//! - [`BoxedValue`]: a clonable, type-erased value tagged with its token
//! - [`ValueList`] / [`DefaultedList`]: tuple traits that pack and unpack
//!   heterogeneous value lists (pipeline inputs/outputs, step arguments and
//!   returns) for arities 0 through 6

use crate::core::pool::ValuePool;
use serde::{Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;

/// Comparable identifier for a value's static type.
///
/// Two values are "the same type" iff their tokens compare equal. The token
/// carries the full type path purely for diagnostics; equality is decided by
/// [`TypeId`] alone, so renaming a type never changes wiring behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Get the token for a static type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full path of the type (e.g. `my_app::model::User`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name (e.g. `User`).
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // TypeId is process-local, so only the name is meaningful outside
        serializer.serialize_str(self.name)
    }
}

/// Strip the module path from a full type path.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    match full.rfind("::") {
        Some(idx) if !full[idx + 2..].is_empty() => &full[idx + 2..],
        _ => full,
    }
}

/// Trait object for values held in a [`ValuePool`].
///
/// Every value that flows through a pipeline must be `Clone + Send + 'static`;
/// this trait erases the concrete type while keeping those capabilities
/// reachable through the object.
pub trait PoolValue: Any + Send {
    /// Clone this value into a new boxed trait object.
    fn clone_boxed(&self) -> Box<dyn PoolValue>;

    /// Borrow as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into [`Any`] for owned downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> PoolValue for T
where
    T: Any + Send + Clone,
{
    fn clone_boxed(&self) -> Box<dyn PoolValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// Allow cloning Box<dyn PoolValue>
impl Clone for Box<dyn PoolValue> {
    fn clone(&self) -> Self {
        // Deref to the trait object so this dispatches dynamically to the
        // concrete value's `clone_boxed`. Calling `self.clone_boxed()`
        // directly would resolve to the blanket `PoolValue` impl for
        // `Box<dyn PoolValue>` itself and recurse forever.
        (**self).clone_boxed()
    }
}

/// A type-erased value tagged with its [`TypeToken`].
///
/// This is the unit of data the executor routes: step outputs become
/// `BoxedValue`s, the pool stores them keyed by token, and step arguments are
/// cloned back out into concrete types.
#[derive(Clone)]
pub struct BoxedValue {
    token: TypeToken,
    value: Box<dyn PoolValue>,
}

impl BoxedValue {
    /// Erase a concrete value.
    pub fn new<T: Clone + Send + 'static>(value: T) -> Self {
        Self {
            token: TypeToken::of::<T>(),
            value: Box::new(value),
        }
    }

    /// Token of the contained value.
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Borrow the contained value as a concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        // Deref the box so `as_any` dispatches to the concrete value rather
        // than the blanket `PoolValue` impl for `Box<dyn PoolValue>`.
        (*self.value).as_any().downcast_ref::<T>()
    }

    /// Take the contained value as a concrete type, or get `self` back.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        if !(*self.value).as_any().is::<T>() {
            return Err(self);
        }
        match self.value.into_any().downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => unreachable!("downcast checked against the value's TypeId"),
        }
    }
}

impl fmt::Debug for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedValue").field(&self.token.name()).finish()
    }
}

/// A heterogeneous, ordered list of values, represented as a tuple.
///
/// Implemented for tuples of arity 0 through 6 whose elements are
/// `Clone + Send + 'static`. This is how typed shapes cross the erasure
/// boundary: signature inputs are packed with [`ValueList::into_values`],
/// step arguments are gathered with [`ValueList::from_pool`].
///
/// A single value is written as a 1-tuple (`(User,)`), no values as `()`.
pub trait ValueList: Sized {
    /// Tokens of the element types, in tuple order.
    fn tokens() -> Vec<TypeToken>;

    /// Erase the elements, in tuple order.
    fn into_values(self) -> Vec<BoxedValue>;

    /// Clone each element type's latest value out of the pool.
    ///
    /// Returns `None` if any element type has no value in the pool.
    fn from_pool(pool: &ValuePool) -> Option<Self>;
}

/// A [`ValueList`] whose elements can fall back to their zero values.
///
/// Used where the engine must produce a value even when none was ever
/// inserted: deferred-step arguments after a short-circuit, and declared
/// outputs of a truncated run.
pub trait DefaultedList: ValueList {
    /// Like [`ValueList::from_pool`], but missing element types resolve to
    /// `Default::default()`.
    fn from_pool_or_default(pool: &ValuePool) -> Self;
}

macro_rules! impl_value_list {
    ($($name:ident),*) => {
        impl<$($name,)*> ValueList for ($($name,)*)
        where
            $($name: Clone + Send + 'static,)*
        {
            fn tokens() -> Vec<TypeToken> {
                vec![$(TypeToken::of::<$name>()),*]
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<BoxedValue> {
                let ($($name,)*) = self;
                vec![$(BoxedValue::new($name)),*]
            }

            #[allow(unused_variables)]
            fn from_pool(pool: &ValuePool) -> Option<Self> {
                Some(($(pool.clone_out::<$name>()?,)*))
            }
        }

        impl<$($name,)*> DefaultedList for ($($name,)*)
        where
            $($name: Clone + Send + Default + 'static,)*
        {
            #[allow(unused_variables)]
            fn from_pool_or_default(pool: &ValuePool) -> Self {
                ($(pool.clone_out::<$name>().unwrap_or_default(),)*)
            }
        }
    };
}

impl_value_list!();
impl_value_list!(A);
impl_value_list!(A, B);
impl_value_list!(A, B, C);
impl_value_list!(A, B, C, D);
impl_value_list!(A, B, C, D, E);
impl_value_list!(A, B, C, D, E, F);
