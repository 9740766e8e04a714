// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prop values.
//!
//! This module provides [`PropValue`], the value type stored in [`Props`](crate::Props),
//! and [`SharedValue`] for reference-counted objects that are compared by identity.

use alloc::rc::Rc;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

/// A reference-counted, type-erased object stored in a prop.
///
/// Two `SharedValue`s are equal only when they point at the same allocation,
/// so cloning a `SharedValue` keeps it equal to the original while building a
/// new one from an equal value does not.
///
/// # Example
///
/// ```rust
/// use understory_dnd::SharedValue;
///
/// let value = SharedValue::new(vec![1, 2, 3]);
/// assert!(value.is::<Vec<i32>>());
/// assert_eq!(value.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
///
/// assert_eq!(value.clone(), value);
/// assert_ne!(SharedValue::new(vec![1, 2, 3]), value);
/// ```
#[derive(Clone)]
pub struct SharedValue {
    inner: Rc<dyn Any>,
    type_id: TypeId,
}

impl SharedValue {
    /// Wraps `value` in a new shared allocation.
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Wraps an existing reference-counted value without reallocating.
    #[must_use]
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Self {
            inner: value,
            type_id: TypeId::of::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Returns `true` if both values share one allocation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("type_id", &self.type_id)
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// A single prop value.
///
/// Every variant except [`PropValue::Shared`] is a *scalar*: it is compared by
/// value. `Shared` values are compared by identity and are never considered
/// equal by [`shallow_equal_scalar`](crate::shallow_equal_scalar).
///
/// Numbers of different variants never compare equal (`Int(1) != Float(1.0)`),
/// and `Float(NaN)` is not equal to itself.
#[derive(Clone, Debug, Default)]
pub enum PropValue {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// An object compared by identity.
    Shared(SharedValue),
}

impl PropValue {
    /// Returns `true` for values compared by value rather than identity.
    #[must_use]
    #[inline]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Shared(_))
    }

    /// Returns `true` for [`PropValue::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is a [`PropValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`PropValue::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number, if this is a [`PropValue::Float`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`PropValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the shared object, if this is a [`PropValue::Shared`].
    #[must_use]
    pub fn as_shared(&self) -> Option<&SharedValue> {
        match self {
            Self::Shared(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Shared(a), Self::Shared(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<Rc<str>> for PropValue {
    fn from(value: Rc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<SharedValue> for PropValue {
    fn from(value: SharedValue) -> Self {
        Self::Shared(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
