// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DnD: drag source and drop target bindings for declarative components.
//!
//! This crate attaches imperative drag and drop handlers to components of a
//! declarative tree, and keeps the props a component derives from handler
//! state in sync with that state. It does not detect gestures, resolve
//! overlapping targets, or track drags itself: that is the job of a
//! [`DragDropManager`] and the [`HandlerMap`]s it creates.
//!
//! ## Core Concepts
//!
//! - A **registration function** receives a [`Register`] and the component's
//!   props, and returns the [`Handlers`] the component needs: one anonymous
//!   [`HandlerSpec`] or a map of named ones.
//! - A **collection function** receives the handler [`Monitors`] and the
//!   manager's global monitor, and returns the props to inject.
//! - [`bind_handlers`] pairs the two into a [`DragDropBinding`], and
//!   [`DragDropBinding::decorate`] turns a [`DecoratedComponent`] into a
//!   [`WrapperType`].
//! - [`WrapperType::mount`] creates a [`DragDropHandler`], which owns one
//!   handler map for its whole lifetime.
//!
//! ## Change Propagation
//!
//! | Event | Work |
//! |-------|------|
//! | Handler map notifies | recollect; render if the state changed |
//! | Props differ under [`BindOptions::are_props_equal`] | re-register, `receive_handlers`, recollect once, render |
//! | Props equal | no registration pass; render only if the state changed |
//! | Unmount | dispose the handler map once; later notifications are ignored |
//!
//! State is compared with [`shallow_equal`]; props default to
//! [`shallow_equal_scalar`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_dnd::{
//!     BindOptions, ComponentRef, DecoratedComponent, DragDropContext, DragSourceSpec, Props,
//!     bind_handlers,
//! };
//! # use understory_dnd::{
//! #     ChangeListener, Disposable, DragDropManager, HandlerCollection, HandlerMap, MonitorMap,
//! # };
//! #
//! # /// A manager that never starts a drag.
//! # struct Manager;
//! #
//! # impl DragDropManager for Manager {
//! #     type Monitor = ();
//! #     type HandlerMonitor = bool;
//! #
//! #     fn monitor(&self) -> &() {
//! #         &()
//! #     }
//! #
//! #     fn create_handler_map<I: Clone + 'static>(
//! #         self: Rc<Self>,
//! #         handlers: HandlerCollection<Self, I>,
//! #         _: ChangeListener,
//! #     ) -> Box<dyn HandlerMap<Self, I>> {
//! #         Box::new(KeyMap(handlers.into_keys().collect()))
//! #     }
//! # }
//! #
//! # struct KeyMap(Vec<std::borrow::Cow<'static, str>>);
//! #
//! # impl<I> HandlerMap<Manager, I> for KeyMap {
//! #     fn receive_handlers(&mut self, handlers: HandlerCollection<Manager, I>) {
//! #         self.0 = handlers.into_keys().collect();
//! #     }
//! #
//! #     fn handler_monitors(&self) -> MonitorMap<bool> {
//! #         self.0.iter().map(|key| (key.clone(), false)).collect()
//! #     }
//! #
//! #     fn disposable(&mut self) -> Disposable {
//! #         Disposable::empty()
//! #     }
//! # }
//!
//! struct Card;
//!
//! impl DragSourceSpec<Manager, ()> for Card {
//!     fn begin_drag(&self, props: &Props, _: &(), _: Option<()>) -> Props {
//!         Props::new().with("id", props.get("id").cloned().unwrap_or_default())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct CardView {
//!     is_dragging: bool,
//! }
//!
//! impl DecoratedComponent for CardView {
//!     type Instance = ();
//!
//!     fn render(&mut self, props: &Props, component_ref: &ComponentRef<()>) {
//!         self.is_dragging = props.get("is_dragging").and_then(|v| v.as_bool()) == Some(true);
//!         component_ref.set(Some(()));
//!     }
//! }
//!
//! let binding = bind_handlers::<Manager, ()>(
//!     |register, _props| register.drag_source("CARD", Card).into(),
//!     |monitors, _| {
//!         let dragging = monitors.single().copied().unwrap_or(false);
//!         Props::new().with("is_dragging", dragging)
//!     },
//!     BindOptions::new(),
//! );
//!
//! let card = binding.decorate::<CardView>();
//! assert_eq!(card.display_name(), "CardViewDragDropHandler");
//!
//! let context = DragDropContext::new(Manager);
//! let handler = card
//!     .mount(CardView::default(), Props::new().with("id", 1), &context)
//!     .unwrap();
//! assert_eq!(handler.renders(), 1);
//! assert!(!handler.with_component(|view| view.is_dragging));
//!
//! handler.receive_props(Props::new().with("id", 2)).unwrap();
//! assert_eq!(handler.renders(), 2);
//!
//! handler.unmount();
//! assert!(handler.is_disposed());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `thiserror` and `tracing`.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Everything it builds is
//! single-threaded: bindings and wrappers are `!Send`.

#![no_std]

extern crate alloc;

mod binding;
mod context;
mod error;
mod handler;
mod manager;
mod props;
mod register;
mod shallow;
mod value;
mod wrapper;

#[cfg(test)]
mod test_support;

pub use binding::{
    BindOptions, BindingBuilder, CollectFn, ConfigureFn, DecoratedComponent, DragDropBinding,
    WrapperType, bind_handlers,
};
pub use context::DragDropContext;
pub use error::{BindError, HandlerViolation};
pub use handler::{
    DEFAULT_KEY, DragSourceHandler, DragSourceSpec, DropTargetHandler, DropTargetSpec,
    HandlerCollection, HandlerKey, HandlerKind, HandlerSpec, Handlers, ItemType, Monitors,
};
pub use manager::{ChangeListener, Disposable, DragDropManager, HandlerMap, MonitorMap};
pub use props::{PropKey, Props};
pub use register::{ComponentRef, Register};
pub use shallow::{PropsEq, default_props_eq, shallow_equal, shallow_equal_scalar};
pub use value::{PropValue, SharedValue};
pub use wrapper::{DragDropHandler, Lifecycle};
