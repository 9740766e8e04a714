// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate fakes for unit tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::handler::{DragSourceSpec, DropTargetSpec, HandlerCollection, HandlerKey};
use crate::manager::{ChangeListener, Disposable, DragDropManager, HandlerMap, MonitorMap};
use crate::props::Props;

/// A manager whose monitors carry no state.
#[derive(Debug, Default)]
pub(crate) struct NullManager;

impl DragDropManager for NullManager {
    type Monitor = ();
    type HandlerMonitor = ();

    fn monitor(&self) -> &Self::Monitor {
        &()
    }

    fn create_handler_map<I: Clone + 'static>(
        self: Rc<Self>,
        handlers: HandlerCollection<Self, I>,
        _on_change: ChangeListener,
    ) -> Box<dyn HandlerMap<Self, I>> {
        Box::new(KeyMap {
            keys: handlers.into_keys().collect(),
        })
    }
}

/// Remembers only which keys are registered.
struct KeyMap {
    keys: Vec<HandlerKey>,
}

impl<I> HandlerMap<NullManager, I> for KeyMap {
    fn receive_handlers(&mut self, handlers: HandlerCollection<NullManager, I>) {
        self.keys = handlers.into_keys().collect();
    }

    fn handler_monitors(&self) -> MonitorMap<()> {
        self.keys.iter().map(|key| (key.clone(), ())).collect()
    }

    fn disposable(&mut self) -> Disposable {
        self.keys.clear();
        Disposable::empty()
    }
}

/// Drags its props, tagged with the mounted component.
#[derive(Debug)]
pub(crate) struct StaticItem;

impl DragSourceSpec<NullManager, u32> for StaticItem {
    fn begin_drag(&self, props: &Props, _: &(), component: Option<u32>) -> Props {
        let mut item = props.clone();
        if let Some(component) = component {
            item.set("component", component);
        }
        item
    }
}

impl DropTargetSpec<NullManager, u32> for StaticItem {}
