// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registration pass.
//!
//! Every time a wrapper needs handlers for a set of props it snapshots those
//! props, hands a [`Register`] to the registration function, and normalizes
//! what comes back into a [`HandlerCollection`].

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use crate::binding::ConfigureFn;
use crate::error::{BindError, HandlerViolation};
use crate::handler::{
    DEFAULT_KEY, DragSourceHandler, DragSourceSpec, DropTargetHandler, DropTargetSpec,
    HandlerCollection, HandlerSpec, Handlers, ItemType,
};
use crate::manager::DragDropManager;
use crate::props::Props;

/// Shared slot holding the mounted instance of a decorated component.
///
/// The wrapper passes its `ComponentRef` to the decorated component on every
/// render, and the component stores whatever handle it wants handler specs to
/// see. Handler specs hold clones of the same slot, so they always observe the
/// current instance, including one mounted after they were registered.
///
/// # Example
///
/// ```rust
/// use understory_dnd::ComponentRef;
///
/// let slot = ComponentRef::<u32>::new();
/// let seen_by_spec = slot.clone();
/// assert_eq!(seen_by_spec.get(), None);
///
/// slot.set(Some(7));
/// assert_eq!(seen_by_spec.get(), Some(7));
/// ```
pub struct ComponentRef<I> {
    slot: Rc<RefCell<Option<I>>>,
}

impl<I> ComponentRef<I> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Stores the mounted instance, or clears it with `None`.
    pub fn set(&self, instance: Option<I>) {
        *self.slot.borrow_mut() = instance;
    }

    /// Returns `true` while an instance is stored.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Returns `true` if both refs share one slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<I: Clone> ComponentRef<I> {
    /// Returns the mounted instance, if any.
    #[must_use]
    pub fn get(&self) -> Option<I> {
        self.slot.borrow().clone()
    }
}

impl<I> Clone for ComponentRef<I> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<I> Default for ComponentRef<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for ComponentRef<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

/// Capability handed to a registration function for building handler specs.
///
/// Specs built by a `Register` are bound to the props snapshot of its pass
/// and to the component that is being registered.
pub struct Register<M, I> {
    props: Rc<Props>,
    component: ComponentRef<I>,
    _manager: PhantomData<fn() -> M>,
}

impl<M: DragDropManager, I: Clone + 'static> Register<M, I> {
    /// Creates a register for one pass, snapshotting `props` by value.
    pub(crate) fn new(props: &Props, component: &ComponentRef<I>) -> Self {
        Self {
            props: Rc::new(props.clone()),
            component: component.clone(),
            _manager: PhantomData,
        }
    }

    /// Returns the props snapshot of this pass.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Builds a drag source producing items of `item_type`.
    pub fn drag_source(
        &self,
        item_type: impl Into<ItemType>,
        spec: impl DragSourceSpec<M, I> + 'static,
    ) -> HandlerSpec<M, I> {
        HandlerSpec::DragSource(DragSourceHandler::new(
            item_type.into(),
            Rc::new(spec),
            self.props.clone(),
            self.component.clone(),
        ))
    }

    /// Builds a drop target accepting items of `item_type`.
    pub fn drop_target(
        &self,
        item_type: impl Into<ItemType>,
        spec: impl DropTargetSpec<M, I> + 'static,
    ) -> HandlerSpec<M, I> {
        HandlerSpec::DropTarget(DropTargetHandler::new(
            item_type.into(),
            Rc::new(spec),
            self.props.clone(),
            self.component.clone(),
        ))
    }

    fn validate(&self, handlers: &Handlers<M, I>, component: &str) -> Result<(), BindError> {
        match handlers {
            Handlers::Single(spec) => self.check(DEFAULT_KEY, spec, component),
            Handlers::Keyed(collection) => {
                for (key, spec) in collection {
                    if key == DEFAULT_KEY {
                        return Err(invalid(component, key, HandlerViolation::ReservedKey));
                    }
                    self.check(key, spec, component)?;
                }
                Ok(())
            }
        }
    }

    fn check(&self, key: &str, spec: &HandlerSpec<M, I>, component: &str) -> Result<(), BindError> {
        if !spec.component_ref().ptr_eq(&self.component) {
            return Err(invalid(component, key, HandlerViolation::ForeignComponent));
        }
        if !Rc::ptr_eq(spec.props_snapshot(), &self.props) {
            return Err(invalid(component, key, HandlerViolation::StaleProps));
        }
        Ok(())
    }
}

impl<M, I> fmt::Debug for Register<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

fn invalid(component: &str, key: &str, violation: HandlerViolation) -> BindError {
    BindError::InvalidHandlers {
        component: String::from(component),
        key: String::from(key),
        violation,
    }
}

/// Runs one registration pass for `props`.
///
/// When `validate` is set, handlers not built by this pass's [`Register`] are
/// rejected with [`BindError::InvalidHandlers`] naming `component`.
pub(crate) fn next_handlers<M: DragDropManager, I: Clone + 'static>(
    configure: &ConfigureFn<M, I>,
    props: &Props,
    component_ref: &ComponentRef<I>,
    validate: bool,
    component: &str,
) -> Result<HandlerCollection<M, I>, BindError> {
    let register = Register::new(props, component_ref);
    let handlers = configure(&register, register.props());
    if validate {
        register.validate(&handlers, component)?;
    }
    Ok(handlers.into_collection())
}
