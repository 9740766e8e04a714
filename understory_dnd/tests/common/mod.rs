// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fakes for wrapper integration tests.
//!
//! [`FakeManager`] hands out handler maps that record every call into a
//! shared [`Probe`], so tests can assert on registrations, notifications, and
//! disposal after the wrapper is gone.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test uses every fake."
)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_dnd::{
    BindOptions, ChangeListener, ComponentRef, DecoratedComponent, Disposable, DragDropBinding,
    DragDropContext, DragDropManager, DragSourceSpec, DropTargetSpec, HandlerCollection,
    HandlerKind, HandlerMap, ItemType, MonitorMap, Props, bind_handlers,
};

/// Everything the fakes observed.
#[derive(Default)]
pub(crate) struct Probe {
    pub(crate) receive_calls: Cell<usize>,
    pub(crate) dispose_calls: Cell<usize>,
    pub(crate) collect_calls: Cell<usize>,
    pub(crate) dragging: Cell<bool>,
    pub(crate) notify_on_receive: Cell<bool>,
    pub(crate) listeners: RefCell<Vec<ChangeListener>>,
    pub(crate) registered: RefCell<Vec<Vec<(String, HandlerKind, ItemType)>>>,
}

impl Probe {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Flips the drag flag and notifies every listener, like a manager would.
    pub(crate) fn set_dragging(&self, dragging: bool) {
        self.dragging.set(dragging);
        self.notify_all();
    }

    pub(crate) fn notify_all(&self) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    /// Keys of the most recent registration, sorted.
    pub(crate) fn last_keys(&self) -> Vec<String> {
        let registered = self.registered.borrow();
        let mut keys: Vec<String> = registered
            .last()
            .map(|entries| entries.iter().map(|(key, _, _)| key.clone()).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn record<I>(&self, handlers: &HandlerCollection<FakeManager, I>) {
        self.registered.borrow_mut().push(
            handlers
                .iter()
                .map(|(key, spec)| (key.to_string(), spec.kind(), spec.item_type().clone()))
                .collect(),
        );
    }
}

/// Global monitor of [`FakeManager`].
pub(crate) struct GlobalMonitor {
    probe: Rc<Probe>,
}

impl GlobalMonitor {
    pub(crate) fn is_dragging(&self) -> bool {
        self.probe.dragging.get()
    }
}

/// Monitor of one handler registered with [`FakeManager`].
#[derive(Clone, Debug)]
pub(crate) struct FakeHandlerMonitor {
    kind: HandlerKind,
    item_type: ItemType,
    dragging: bool,
}

impl FakeHandlerMonitor {
    pub(crate) fn is_dragging(&self) -> bool {
        self.kind == HandlerKind::DragSource && self.dragging
    }

    pub(crate) fn item_type(&self) -> &ItemType {
        &self.item_type
    }
}

pub(crate) struct FakeManager {
    monitor: GlobalMonitor,
}

impl FakeManager {
    pub(crate) fn new(probe: &Rc<Probe>) -> Self {
        Self {
            monitor: GlobalMonitor {
                probe: probe.clone(),
            },
        }
    }
}

impl DragDropManager for FakeManager {
    type Monitor = GlobalMonitor;
    type HandlerMonitor = FakeHandlerMonitor;

    fn monitor(&self) -> &Self::Monitor {
        &self.monitor
    }

    fn create_handler_map<I: Clone + 'static>(
        self: Rc<Self>,
        handlers: HandlerCollection<Self, I>,
        on_change: ChangeListener,
    ) -> Box<dyn HandlerMap<Self, I>> {
        let probe = self.monitor.probe.clone();
        probe.record(&handlers);
        probe.listeners.borrow_mut().push(on_change.clone());
        Box::new(FakeHandlerMap {
            probe,
            handlers,
            on_change,
        })
    }
}

struct FakeHandlerMap<I> {
    probe: Rc<Probe>,
    handlers: HandlerCollection<FakeManager, I>,
    on_change: ChangeListener,
}

impl<I> HandlerMap<FakeManager, I> for FakeHandlerMap<I> {
    fn receive_handlers(&mut self, handlers: HandlerCollection<FakeManager, I>) {
        self.probe.receive_calls.set(self.probe.receive_calls.get() + 1);
        self.probe.record(&handlers);
        self.handlers = handlers;
        if self.probe.notify_on_receive.get() {
            (self.on_change)();
        }
    }

    fn handler_monitors(&self) -> MonitorMap<FakeHandlerMonitor> {
        self.handlers
            .iter()
            .map(|(key, spec)| {
                let monitor = FakeHandlerMonitor {
                    kind: spec.kind(),
                    item_type: spec.item_type().clone(),
                    dragging: self.probe.dragging.get(),
                };
                (key.clone(), monitor)
            })
            .collect()
    }

    fn disposable(&mut self) -> Disposable {
        let probe = self.probe.clone();
        let on_change = self.on_change.clone();
        Disposable::new(move || {
            probe.dispose_calls.set(probe.dispose_calls.get() + 1);
            // Managers may notify one last time while unregistering.
            on_change();
        })
    }
}

/// A drag source whose item is its props snapshot plus the mounted instance.
pub(crate) struct BoxSource;

impl DragSourceSpec<FakeManager, u32> for BoxSource {
    fn begin_drag(&self, props: &Props, _: &GlobalMonitor, component: Option<u32>) -> Props {
        let mut item = props.clone();
        if let Some(component) = component {
            item.set("component", component);
        }
        item
    }
}

/// A drop target accepting everything.
pub(crate) struct Bin;

impl DropTargetSpec<FakeManager, u32> for Bin {}

/// Records the merged props of every render.
pub(crate) struct Recorder {
    pub(crate) instance: u32,
    pub(crate) rendered: Rc<RefCell<Vec<Props>>>,
}

impl Recorder {
    pub(crate) fn new(instance: u32) -> (Self, Rc<RefCell<Vec<Props>>>) {
        let rendered = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                instance,
                rendered: rendered.clone(),
            },
            rendered,
        )
    }
}

impl DecoratedComponent for Recorder {
    type Instance = u32;

    fn render(&mut self, props: &Props, component_ref: &ComponentRef<u32>) {
        self.rendered.borrow_mut().push(props.clone());
        component_ref.set(Some(self.instance));
    }
}

pub(crate) fn context(probe: &Rc<Probe>) -> DragDropContext {
    DragDropContext::new(FakeManager::new(probe))
}

/// A single `"BOX"` drag source collecting `is_dragging`.
pub(crate) fn box_binding(probe: &Rc<Probe>, options: BindOptions) -> DragDropBinding<FakeManager, u32> {
    let probe = probe.clone();
    bind_handlers::<FakeManager, u32>(
        |register, _| register.drag_source("BOX", BoxSource).into(),
        move |monitors, _| {
            probe.collect_calls.set(probe.collect_calls.get() + 1);
            let dragging = monitors.single().is_some_and(FakeHandlerMonitor::is_dragging);
            Props::new().with("is_dragging", dragging)
        },
        options,
    )
}

pub(crate) fn dragging(props: &Props) -> Option<bool> {
    props.get("is_dragging").and_then(|value| value.as_bool())
}
