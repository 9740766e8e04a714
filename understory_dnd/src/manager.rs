// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the coordination manager and its handler maps.
//!
//! The binding never registers handlers itself. It hands each wrapper's
//! [`HandlerCollection`] to a [`HandlerMap`] built by the application's
//! [`DragDropManager`], and reads handler state back through monitors.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;
use hashbrown::HashMap;

use crate::handler::{HandlerCollection, HandlerKey};

/// Callback a handler map invokes whenever one of its handlers may have changed.
///
/// It may be called any number of times, including zero, between props updates.
pub type ChangeListener = Rc<dyn Fn()>;

/// Per-handler monitors keyed like the [`HandlerCollection`] they were built from.
pub type MonitorMap<HM> = HashMap<HandlerKey, HM>;

/// The shared object coordinating every drag source and drop target of a tree.
///
/// One manager is created by the application, provided through a
/// [`DragDropContext`](crate::DragDropContext), and shared by reference with
/// every wrapper below it. Wrappers never mutate it and never own its lifecycle.
pub trait DragDropManager: Sized + 'static {
    /// Read-only monitor describing global drag state.
    type Monitor;

    /// Monitor describing the state of a single registered handler.
    type HandlerMonitor;

    /// Returns the global monitor.
    fn monitor(&self) -> &Self::Monitor;

    /// Registers `handlers` and returns the map that owns those registrations.
    ///
    /// The map must call `on_change` whenever the state observed through its
    /// monitors may have changed, and must stop calling it once disposed.
    fn create_handler_map<I: Clone + 'static>(
        self: Rc<Self>,
        handlers: HandlerCollection<Self, I>,
        on_change: ChangeListener,
    ) -> Box<dyn HandlerMap<Self, I>>;
}

/// The registrations of one wrapper instance.
///
/// A handler map diffs successive collections: handlers under new keys are
/// registered, handlers under removed keys are unregistered, and retained keys
/// receive their new spec.
pub trait HandlerMap<M: DragDropManager, I> {
    /// Reconciles the registrations with `handlers`.
    fn receive_handlers(&mut self, handlers: HandlerCollection<M, I>);

    /// Returns one monitor per registered handler.
    fn handler_monitors(&self) -> MonitorMap<M::HandlerMonitor>;

    /// Returns the action that releases every registration of this map.
    fn disposable(&mut self) -> Disposable;
}

/// A teardown action that runs at most once.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_dnd::Disposable;
///
/// let released = Rc::new(Cell::new(0));
/// let counter = released.clone();
/// let mut disposable = Disposable::new(move || counter.set(counter.get() + 1));
///
/// disposable.dispose();
/// disposable.dispose();
/// assert_eq!(released.get(), 1);
/// assert!(disposable.is_disposed());
/// ```
pub struct Disposable {
    action: Option<Box<dyn FnOnce()>>,
}

impl Disposable {
    /// Creates a disposable running `action` on first disposal.
    #[must_use]
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// Creates a disposable with nothing to release.
    #[must_use]
    pub fn empty() -> Self {
        Self { action: None }
    }

    /// Runs the teardown action if it has not run yet.
    pub fn dispose(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Returns `true` once there is nothing left to release.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.action.is_none()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
