// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapper instances: the lifecycle of one mounted, decorated component.
//!
//! A [`DragDropHandler`] owns the handler map of its component, listens to it
//! for changes, and re-renders the component when the collected props or the
//! incoming props change.
//!
//! ## Re-entrancy
//!
//! Handler maps may notify at any time, including synchronously from inside
//! `receive_handlers` or while the component renders. Such notifications are
//! not processed re-entrantly: they raise a single pending flag that is
//! drained once the wrapper is idle again. A flag raised while props are
//! being reconciled is cleared, since reconciliation recomputes the state
//! anyway.
//!
//! Unmounting, or dropping the wrapper, while it is busy works the same way:
//! teardown is requested and runs as soon as the busy section ends. The
//! accessors of [`DragDropHandler`] need the wrapper to be idle and panic
//! when called from inside `render` or the collection function.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;
use tracing::{debug, trace, warn};

use crate::binding::{BindingInner, CollectFn, DecoratedComponent};
use crate::context::DragDropContext;
use crate::error::BindError;
use crate::handler::Monitors;
use crate::manager::{ChangeListener, DragDropManager, HandlerMap};
use crate::props::Props;
use crate::register::{ComponentRef, next_handlers};
use crate::shallow::shallow_equal;

/// Lifecycle phase of a wrapper instance.
///
/// Phases only ever advance, in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lifecycle {
    /// The handler map is being created and the initial state collected.
    Constructing,
    /// Rendered and listening for changes.
    Mounted,
    /// Registrations are being released.
    Unmounting,
    /// Torn down. Notifications and props are ignored.
    Disposed,
}

/// A mounted wrapper around a decorated component.
///
/// Created by [`WrapperType::mount`](crate::WrapperType::mount). Dropping it
/// unmounts it.
pub struct DragDropHandler<M: DragDropManager, C: DecoratedComponent> {
    shared: Rc<Shared<M, C>>,
    display_name: Rc<str>,
}

struct Shared<M: DragDropManager, C: DecoratedComponent> {
    core: RefCell<Core<M, C>>,
    pending: Cell<bool>,
    teardown: Cell<bool>,
}

struct Core<M: DragDropManager, C: DecoratedComponent> {
    binding: Rc<BindingInner<M, C::Instance>>,
    component_name: &'static str,
    display_name: Rc<str>,
    manager: Rc<M>,
    handler_map: Box<dyn HandlerMap<M, C::Instance>>,
    component: C,
    component_ref: ComponentRef<C::Instance>,
    props: Props,
    state: Props,
    lifecycle: Lifecycle,
    renders: u64,
}

fn derive_state<M: DragDropManager, I>(
    collect: &CollectFn<M>,
    handler_map: &dyn HandlerMap<M, I>,
    manager: &M,
) -> Props {
    let monitors = Monitors::from_map(handler_map.handler_monitors());
    collect(monitors, manager.monitor())
}

impl<M: DragDropManager, C: DecoratedComponent> DragDropHandler<M, C> {
    pub(crate) fn mount(
        binding: Rc<BindingInner<M, C::Instance>>,
        component_name: &'static str,
        display_name: Rc<str>,
        component: C,
        props: Props,
        context: &DragDropContext,
    ) -> Result<Self, BindError> {
        let manager = context.manager::<M>(component_name)?;
        let component_ref = ComponentRef::new();
        let handlers = next_handlers(
            &*binding.configure,
            &props,
            &component_ref,
            binding.options.validates_handlers(),
            component_name,
        )?;
        let handler_count = handlers.len();

        let shared = Rc::new_cyclic(|weak: &Weak<Shared<M, C>>| {
            let weak = weak.clone();
            let on_change: ChangeListener = Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.notify();
                }
            });
            let handler_map = manager.clone().create_handler_map(handlers, on_change);
            let state = derive_state(&*binding.collect, &*handler_map, &manager);
            Shared {
                core: RefCell::new(Core {
                    binding,
                    component_name,
                    display_name: display_name.clone(),
                    manager,
                    handler_map,
                    component,
                    component_ref,
                    props,
                    state,
                    lifecycle: Lifecycle::Constructing,
                    renders: 0,
                }),
                pending: Cell::new(false),
                teardown: Cell::new(false),
            }
        });

        {
            let mut core = shared.core.borrow_mut();
            core.lifecycle = Lifecycle::Mounted;
            core.render();
        }
        debug!(component = %display_name, handlers = handler_count, "mounted");
        shared.drain();
        Ok(Self {
            shared,
            display_name,
        })
    }

    /// Returns the name of the wrapper type, `<name>DragDropHandler`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the current props.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn props(&self) -> Props {
        self.shared.core.borrow().props.clone()
    }

    /// Returns the current collected state.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn state(&self) -> Props {
        self.shared.core.borrow().state.clone()
    }

    /// Returns the lifecycle phase.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.core.borrow().lifecycle
    }

    /// Returns `true` once the wrapper has been unmounted.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposed
    }

    /// Returns how many times the decorated component has rendered.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.shared.core.borrow().renders
    }

    /// Returns the slot through which handler specs reach the mounted instance.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn component_ref(&self) -> ComponentRef<C::Instance> {
        self.shared.core.borrow().component_ref.clone()
    }

    /// Runs `f` with the decorated component.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    pub fn with_component<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let result = f(&self.shared.core.borrow().component);
        self.shared.drain();
        result
    }

    /// Pushes new props from the parent.
    ///
    /// Props that differ under the binding's predicate trigger a registration
    /// pass, one `receive_handlers` call, and one state recomputation. The
    /// component re-renders unless both props and state are unchanged.
    /// Props pushed after unmounting are ignored.
    ///
    /// # Errors
    ///
    /// [`BindError::InvalidHandlers`] if the registration pass is rejected.
    /// The handler map and the current props are left untouched then.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    pub fn receive_props(&self, next: Props) -> Result<(), BindError> {
        let result = self
            .shared
            .core
            .borrow_mut()
            .receive_props(next, &self.shared.pending);
        self.shared.drain();
        result
    }

    /// Recomputes the collected state, re-rendering if it changed.
    ///
    /// This is what the handler map's change listener calls. It does nothing
    /// unless the wrapper is mounted.
    pub fn handle_change(&self) {
        self.shared.notify();
    }

    /// Returns whether moving to `next_props` and `next_state` requires a render.
    ///
    /// # Panics
    ///
    /// If called from inside `render` or the collection function.
    #[must_use]
    pub fn should_update(&self, next_props: &Props, next_state: &Props) -> bool {
        self.shared.core.borrow().should_update(next_props, next_state)
    }

    /// Releases the handler registrations and clears the component ref.
    ///
    /// Runs at most once; later calls, and dropping, do nothing. Called from
    /// inside `render` or the collection function, teardown happens as soon
    /// as that call returns.
    pub fn unmount(&self) {
        self.shared.unmount();
    }
}

impl<M: DragDropManager, C: DecoratedComponent> Drop for DragDropHandler<M, C> {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

impl<M: DragDropManager, C: DecoratedComponent> fmt::Debug for DragDropHandler<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("DragDropHandler");
        debug.field("display_name", &self.display_name);
        if let Ok(core) = self.shared.core.try_borrow() {
            debug
                .field("lifecycle", &core.lifecycle)
                .field("props", &core.props)
                .field("state", &core.state);
        }
        debug.finish_non_exhaustive()
    }
}

impl<M: DragDropManager, C: DecoratedComponent> Shared<M, C> {
    fn notify(&self) {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.handle_change(),
            Err(_) => {
                self.pending.set(true);
                return;
            }
        }
        self.drain();
    }

    fn unmount(&self) {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.unmount(),
            Err(_) => {
                trace!("teardown requested while busy");
                self.teardown.set(true);
                return;
            }
        }
        self.pending.set(false);
    }

    /// Runs deferred work: teardown first, then coalesced notifications.
    fn drain(&self) {
        loop {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                return;
            };
            if self.teardown.replace(false) {
                core.unmount();
                self.pending.set(false);
                return;
            }
            if !self.pending.replace(false) {
                return;
            }
            core.handle_change();
        }
    }
}

impl<M: DragDropManager, C: DecoratedComponent> Core<M, C> {
    fn derive_state(&self) -> Props {
        derive_state(&*self.binding.collect, &*self.handler_map, &self.manager)
    }

    fn should_update(&self, next_props: &Props, next_state: &Props) -> bool {
        !self.binding.options.props_equal(next_props, &self.props)
            || !shallow_equal(next_state, &self.state)
    }

    fn commit(&mut self, props: Props, state: Props) {
        let render = self.should_update(&props, &state);
        self.props = props;
        self.state = state;
        if render {
            self.render();
        } else {
            trace!(component = %self.display_name, "skipped render");
        }
    }

    fn render(&mut self) {
        let merged = self.props.merged(&self.state);
        self.component.render(&merged, &self.component_ref);
        self.renders += 1;
    }

    fn handle_change(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        let state = self.derive_state();
        if shallow_equal(&state, &self.state) {
            trace!(component = %self.display_name, "collected state unchanged");
            return;
        }
        let props = self.props.clone();
        self.commit(props, state);
    }

    fn receive_props(&mut self, next: Props, pending: &Cell<bool>) -> Result<(), BindError> {
        if self.lifecycle != Lifecycle::Mounted {
            warn!(
                component = %self.display_name,
                lifecycle = ?self.lifecycle,
                "ignoring props pushed into an unmounted wrapper"
            );
            return Ok(());
        }

        let mut state = None;
        if !self.binding.options.props_equal(&next, &self.props) {
            let handlers = next_handlers(
                &*self.binding.configure,
                &next,
                &self.component_ref,
                self.binding.options.validates_handlers(),
                self.component_name,
            )?;
            debug!(
                component = %self.display_name,
                handlers = handlers.len(),
                "reconciling handlers"
            );
            self.handler_map.receive_handlers(handlers);
            pending.set(false);
            state = Some(self.derive_state()).filter(|next| !shallow_equal(next, &self.state));
        }

        let state = state.unwrap_or_else(|| self.state.clone());
        self.commit(next, state);
        Ok(())
    }

    fn unmount(&mut self) {
        if self.lifecycle >= Lifecycle::Unmounting {
            return;
        }
        self.lifecycle = Lifecycle::Unmounting;
        self.handler_map.disposable().dispose();
        self.component_ref.set(None);
        self.lifecycle = Lifecycle::Disposed;
        debug!(component = %self.display_name, renders = self.renders, "unmounted");
    }
}
