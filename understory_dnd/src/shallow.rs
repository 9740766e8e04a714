// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shallow comparisons between prop maps.
//!
//! These are the change-detection gates of a binding:
//!
//! - [`shallow_equal`] decides whether freshly collected state differs from
//!   the current state.
//! - [`shallow_equal_scalar`] is the default props predicate. It only treats
//!   two maps as equal when every value is a scalar, so any prop holding a
//!   [`SharedValue`](crate::SharedValue) forces the handlers to be rebuilt.

use alloc::rc::Rc;
use core::ptr;

use crate::props::Props;

/// Predicate deciding whether `next` props are equal to `prev` props.
///
/// Called as `predicate(next, prev)`.
pub type PropsEq = Rc<dyn Fn(&Props, &Props) -> bool>;

/// Returns `true` if `a` and `b` hold the same keys with equal values.
///
/// Values are compared the way [`PropValue`](crate::PropValue) compares them:
/// scalars by value, shared objects by identity.
#[must_use]
pub fn shallow_equal(a: &Props, b: &Props) -> bool {
    ptr::eq(a, b) || a == b
}

/// Returns `true` if `a` and `b` hold the same keys with equal, scalar values.
///
/// Two distinct maps holding a shared object are never equal, even when it is
/// the same object in both. The same map is always equal to itself.
///
/// # Example
///
/// ```rust
/// use understory_dnd::{Props, SharedValue, shallow_equal, shallow_equal_scalar};
///
/// let a = Props::new().with("id", 2);
/// let b = Props::new().with("id", 2);
/// assert!(shallow_equal_scalar(&a, &b));
///
/// let shared = SharedValue::new(());
/// let a = Props::new().with("item", shared.clone());
/// let b = Props::new().with("item", shared);
/// assert!(shallow_equal(&a, &b));
/// assert!(!shallow_equal_scalar(&a, &b));
/// ```
#[must_use]
pub fn shallow_equal_scalar(a: &Props, b: &Props) -> bool {
    if ptr::eq(a, b) {
        return true;
    }
    a.len() == b.len()
        && a.iter().all(|(key, value)| {
            b.get(key)
                .is_some_and(|other| value.is_scalar() && other.is_scalar() && value == other)
        })
}

/// Returns the default props predicate, [`shallow_equal_scalar`].
#[must_use]
pub fn default_props_eq() -> PropsEq {
    Rc::new(shallow_equal_scalar)
}
