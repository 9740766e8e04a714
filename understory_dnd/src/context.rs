// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provisioning the manager to wrappers.

use alloc::rc::Rc;
use alloc::string::String;
use core::any::{Any, type_name};
use core::fmt;

use crate::error::BindError;
use crate::manager::DragDropManager;

/// The root providing one drag and drop manager to every wrapper mounted with it.
///
/// The context is type-erased so that a tree can be assembled before the
/// concrete manager type is known to every part of it. Wrappers look their
/// manager up by type when they mount.
///
/// Cloning is cheap; clones share the manager.
#[derive(Clone, Default)]
pub struct DragDropContext {
    manager: Option<Rc<dyn Any>>,
    manager_type: &'static str,
}

impl DragDropContext {
    /// Creates a context owning `manager`.
    #[must_use]
    pub fn new<M: DragDropManager>(manager: M) -> Self {
        Self::from_shared(Rc::new(manager))
    }

    /// Creates a context sharing an existing manager.
    #[must_use]
    pub fn from_shared<M: DragDropManager>(manager: Rc<M>) -> Self {
        let manager: Rc<dyn Any> = manager;
        Self {
            manager: Some(manager),
            manager_type: type_name::<M>(),
        }
    }

    /// Creates a context without a manager.
    ///
    /// Mounting a wrapper with it fails with [`BindError::MissingManager`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if a manager was provided.
    #[must_use]
    pub fn has_manager(&self) -> bool {
        self.manager.is_some()
    }

    /// Looks up the manager on behalf of `component`.
    ///
    /// # Errors
    ///
    /// [`BindError::MissingManager`] if there is no manager, and
    /// [`BindError::WrongManagerKind`] if it is not an `M`.
    pub fn manager<M: DragDropManager>(&self, component: &str) -> Result<Rc<M>, BindError> {
        let manager = self
            .manager
            .clone()
            .ok_or_else(|| BindError::MissingManager {
                component: String::from(component),
            })?;
        manager
            .downcast::<M>()
            .map_err(|_| BindError::WrongManagerKind {
                component: String::from(component),
                expected: type_name::<M>(),
                found: self.manager_type,
            })
    }
}

impl fmt::Debug for DragDropContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("DragDropContext");
        if self.has_manager() {
            debug.field("manager", &self.manager_type);
        } else {
            debug.field("manager", &None::<()>);
        }
        debug.finish_non_exhaustive()
    }
}
