// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler specs: the drag sources and drop targets a component registers.
//!
//! A registration function builds [`HandlerSpec`]s through a
//! [`Register`](crate::Register) and returns them as [`Handlers`]. Each spec
//! carries an [`ItemType`], the caller's behavior ([`DragSourceSpec`] or
//! [`DropTargetSpec`]), a snapshot of the component's props, and a
//! [`ComponentRef`] resolving the mounted instance lazily.
//!
//! The `can_drag`/`begin_drag`/`hover`/`drop` methods on the variants are what
//! a [`HandlerMap`](crate::HandlerMap) calls; they forward to the behavior with
//! the snapshotted props and the current component instance.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use core::fmt;

use crate::manager::{DragDropManager, MonitorMap};
use crate::props::Props;
use crate::register::ComponentRef;

/// Key of a handler inside a [`HandlerCollection`].
pub type HandlerKey = Cow<'static, str>;

/// Key under which a single anonymous handler is registered.
pub const DEFAULT_KEY: &str = "__default__";

/// Handlers of one registration pass, keyed by name.
pub type HandlerCollection<M, I> = hashbrown::HashMap<HandlerKey, HandlerSpec<M, I>>;

/// Tag matching drag sources to the drop targets that accept them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemType(Cow<'static, str>);

impl ItemType {
    /// Creates an item type from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Returns the name of this item type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemType").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for ItemType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<alloc::string::String> for ItemType {
    fn from(name: alloc::string::String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Behavior of a drag source.
///
/// Only [`begin_drag`](Self::begin_drag) is required; the defaults allow
/// dragging at any time and leave drag tracking to the manager.
pub trait DragSourceSpec<M: DragDropManager, I> {
    /// Returns whether a drag may start right now.
    fn can_drag(&self, _props: &Props, _monitor: &M::Monitor) -> bool {
        true
    }

    /// Returns whether this source is the one being dragged.
    ///
    /// `None` defers to the manager, which tracks the source that began the drag.
    fn is_dragging(&self, _props: &Props, _monitor: &M::Monitor) -> Option<bool> {
        None
    }

    /// Starts a drag, returning the item describing what is dragged.
    fn begin_drag(&self, props: &Props, monitor: &M::Monitor, component: Option<I>) -> Props;

    /// Finishes a drag started by this source, dropped or not.
    fn end_drag(&self, _props: &Props, _monitor: &M::Monitor, _component: Option<I>) {}
}

/// Behavior of a drop target.
///
/// Every method has a default: targets accept any item of their type and
/// produce no drop result.
pub trait DropTargetSpec<M: DragDropManager, I> {
    /// Returns whether the dragged item may be dropped here.
    fn can_drop(&self, _props: &Props, _monitor: &M::Monitor) -> bool {
        true
    }

    /// Called while an item is dragged over this target.
    fn hover(&self, _props: &Props, _monitor: &M::Monitor, _component: Option<I>) {}

    /// Called when an item is dropped here, returning an optional drop result.
    fn drop(&self, _props: &Props, _monitor: &M::Monitor, _component: Option<I>) -> Option<Props> {
        None
    }
}

impl<M: DragDropManager, I, T: DragSourceSpec<M, I> + ?Sized> DragSourceSpec<M, I> for Rc<T> {
    fn can_drag(&self, props: &Props, monitor: &M::Monitor) -> bool {
        (**self).can_drag(props, monitor)
    }

    fn is_dragging(&self, props: &Props, monitor: &M::Monitor) -> Option<bool> {
        (**self).is_dragging(props, monitor)
    }

    fn begin_drag(&self, props: &Props, monitor: &M::Monitor, component: Option<I>) -> Props {
        (**self).begin_drag(props, monitor, component)
    }

    fn end_drag(&self, props: &Props, monitor: &M::Monitor, component: Option<I>) {
        (**self).end_drag(props, monitor, component);
    }
}

impl<M: DragDropManager, I, T: DropTargetSpec<M, I> + ?Sized> DropTargetSpec<M, I> for Rc<T> {
    fn can_drop(&self, props: &Props, monitor: &M::Monitor) -> bool {
        (**self).can_drop(props, monitor)
    }

    fn hover(&self, props: &Props, monitor: &M::Monitor, component: Option<I>) {
        (**self).hover(props, monitor, component);
    }

    fn drop(&self, props: &Props, monitor: &M::Monitor, component: Option<I>) -> Option<Props> {
        (**self).drop(props, monitor, component)
    }
}

/// A registered drag source bound to a component.
pub struct DragSourceHandler<M: DragDropManager, I> {
    item_type: ItemType,
    spec: Rc<dyn DragSourceSpec<M, I>>,
    props: Rc<Props>,
    component: ComponentRef<I>,
}

impl<M: DragDropManager, I: Clone> DragSourceHandler<M, I> {
    pub(crate) fn new(
        item_type: ItemType,
        spec: Rc<dyn DragSourceSpec<M, I>>,
        props: Rc<Props>,
        component: ComponentRef<I>,
    ) -> Self {
        Self {
            item_type,
            spec,
            props,
            component,
        }
    }

    /// Returns the item type this source produces.
    #[must_use]
    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// Returns the props snapshot taken when this source was registered.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Returns the mounted component instance, if any.
    #[must_use]
    pub fn component(&self) -> Option<I> {
        self.component.get()
    }

    /// Returns `true` if both handlers share one behavior allocation.
    #[must_use]
    pub fn same_spec(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.spec, &other.spec)
    }

    /// See [`DragSourceSpec::can_drag`].
    #[must_use]
    pub fn can_drag(&self, monitor: &M::Monitor) -> bool {
        self.spec.can_drag(&self.props, monitor)
    }

    /// See [`DragSourceSpec::is_dragging`].
    #[must_use]
    pub fn is_dragging(&self, monitor: &M::Monitor) -> Option<bool> {
        self.spec.is_dragging(&self.props, monitor)
    }

    /// See [`DragSourceSpec::begin_drag`].
    #[must_use]
    pub fn begin_drag(&self, monitor: &M::Monitor) -> Props {
        self.spec.begin_drag(&self.props, monitor, self.component())
    }

    /// See [`DragSourceSpec::end_drag`].
    pub fn end_drag(&self, monitor: &M::Monitor) {
        self.spec.end_drag(&self.props, monitor, self.component());
    }
}

impl<M: DragDropManager, I> Clone for DragSourceHandler<M, I> {
    fn clone(&self) -> Self {
        Self {
            item_type: self.item_type.clone(),
            spec: self.spec.clone(),
            props: self.props.clone(),
            component: self.component.clone(),
        }
    }
}

impl<M: DragDropManager, I> fmt::Debug for DragSourceHandler<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSourceHandler")
            .field("item_type", &self.item_type)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

/// A registered drop target bound to a component.
pub struct DropTargetHandler<M: DragDropManager, I> {
    item_type: ItemType,
    spec: Rc<dyn DropTargetSpec<M, I>>,
    props: Rc<Props>,
    component: ComponentRef<I>,
}

impl<M: DragDropManager, I: Clone> DropTargetHandler<M, I> {
    pub(crate) fn new(
        item_type: ItemType,
        spec: Rc<dyn DropTargetSpec<M, I>>,
        props: Rc<Props>,
        component: ComponentRef<I>,
    ) -> Self {
        Self {
            item_type,
            spec,
            props,
            component,
        }
    }

    /// Returns the item type this target accepts.
    #[must_use]
    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// Returns the props snapshot taken when this target was registered.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Returns the mounted component instance, if any.
    #[must_use]
    pub fn component(&self) -> Option<I> {
        self.component.get()
    }

    /// Returns `true` if both handlers share one behavior allocation.
    #[must_use]
    pub fn same_spec(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.spec, &other.spec)
    }

    /// See [`DropTargetSpec::can_drop`].
    #[must_use]
    pub fn can_drop(&self, monitor: &M::Monitor) -> bool {
        self.spec.can_drop(&self.props, monitor)
    }

    /// See [`DropTargetSpec::hover`].
    pub fn hover(&self, monitor: &M::Monitor) {
        self.spec.hover(&self.props, monitor, self.component());
    }

    /// See [`DropTargetSpec::drop`].
    #[must_use]
    pub fn drop(&self, monitor: &M::Monitor) -> Option<Props> {
        self.spec.drop(&self.props, monitor, self.component())
    }
}

impl<M: DragDropManager, I> Clone for DropTargetHandler<M, I> {
    fn clone(&self) -> Self {
        Self {
            item_type: self.item_type.clone(),
            spec: self.spec.clone(),
            props: self.props.clone(),
            component: self.component.clone(),
        }
    }
}

impl<M: DragDropManager, I> fmt::Debug for DropTargetHandler<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetHandler")
            .field("item_type", &self.item_type)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

/// Which side of a drag a handler is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Something that can be picked up.
    DragSource,
    /// Something that can receive a drop.
    DropTarget,
}

impl HandlerKind {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragSource => "drag_source",
            Self::DropTarget => "drop_target",
        }
    }
}

/// A drag source or drop target registration.
pub enum HandlerSpec<M: DragDropManager, I> {
    /// A drag source.
    DragSource(DragSourceHandler<M, I>),
    /// A drop target.
    DropTarget(DropTargetHandler<M, I>),
}

impl<M: DragDropManager, I> HandlerSpec<M, I> {
    /// Returns which kind of handler this is.
    #[must_use]
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::DragSource(_) => HandlerKind::DragSource,
            Self::DropTarget(_) => HandlerKind::DropTarget,
        }
    }

    /// Returns the item type of the handler.
    #[must_use]
    pub fn item_type(&self) -> &ItemType {
        match self {
            Self::DragSource(source) => &source.item_type,
            Self::DropTarget(target) => &target.item_type,
        }
    }

    /// Returns the props snapshot the handler was registered with.
    #[must_use]
    pub fn props(&self) -> &Props {
        self.props_snapshot()
    }

    /// Returns the drag source, if this is one.
    #[must_use]
    pub fn as_drag_source(&self) -> Option<&DragSourceHandler<M, I>> {
        match self {
            Self::DragSource(source) => Some(source),
            Self::DropTarget(_) => None,
        }
    }

    /// Returns the drop target, if this is one.
    #[must_use]
    pub fn as_drop_target(&self) -> Option<&DropTargetHandler<M, I>> {
        match self {
            Self::DragSource(_) => None,
            Self::DropTarget(target) => Some(target),
        }
    }

    pub(crate) fn props_snapshot(&self) -> &Rc<Props> {
        match self {
            Self::DragSource(source) => &source.props,
            Self::DropTarget(target) => &target.props,
        }
    }

    pub(crate) fn component_ref(&self) -> &ComponentRef<I> {
        match self {
            Self::DragSource(source) => &source.component,
            Self::DropTarget(target) => &target.component,
        }
    }
}

impl<M: DragDropManager, I> Clone for HandlerSpec<M, I> {
    fn clone(&self) -> Self {
        match self {
            Self::DragSource(source) => Self::DragSource(source.clone()),
            Self::DropTarget(target) => Self::DropTarget(target.clone()),
        }
    }
}

impl<M: DragDropManager, I> fmt::Debug for HandlerSpec<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragSource(source) => f.debug_tuple("DragSource").field(source).finish(),
            Self::DropTarget(target) => f.debug_tuple("DropTarget").field(target).finish(),
        }
    }
}

impl<M: DragDropManager, I> From<DragSourceHandler<M, I>> for HandlerSpec<M, I> {
    fn from(source: DragSourceHandler<M, I>) -> Self {
        Self::DragSource(source)
    }
}

impl<M: DragDropManager, I> From<DropTargetHandler<M, I>> for HandlerSpec<M, I> {
    fn from(target: DropTargetHandler<M, I>) -> Self {
        Self::DropTarget(target)
    }
}

/// What a registration function returns.
pub enum Handlers<M: DragDropManager, I> {
    /// A single anonymous handler.
    ///
    /// It is registered under [`DEFAULT_KEY`], and the collection function
    /// receives its monitor directly as [`Monitors::Single`].
    Single(HandlerSpec<M, I>),
    /// Named handlers.
    Keyed(HandlerCollection<M, I>),
}

impl<M: DragDropManager, I> Handlers<M, I> {
    /// Returns an empty set of handlers.
    #[must_use]
    pub fn none() -> Self {
        Self::Keyed(HandlerCollection::new())
    }

    /// Normalizes into a keyed collection, placing a single handler under [`DEFAULT_KEY`].
    #[must_use]
    pub fn into_collection(self) -> HandlerCollection<M, I> {
        match self {
            Self::Single(spec) => {
                let mut collection = HandlerCollection::with_capacity(1);
                collection.insert(Cow::Borrowed(DEFAULT_KEY), spec);
                collection
            }
            Self::Keyed(collection) => collection,
        }
    }
}

impl<M: DragDropManager, I> fmt::Debug for Handlers<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(spec) => f.debug_tuple("Single").field(spec).finish(),
            Self::Keyed(collection) => f.debug_tuple("Keyed").field(collection).finish(),
        }
    }
}

impl<M: DragDropManager, I> From<HandlerSpec<M, I>> for Handlers<M, I> {
    fn from(spec: HandlerSpec<M, I>) -> Self {
        Self::Single(spec)
    }
}

impl<M: DragDropManager, I> From<HandlerCollection<M, I>> for Handlers<M, I> {
    fn from(collection: HandlerCollection<M, I>) -> Self {
        Self::Keyed(collection)
    }
}

impl<M: DragDropManager, I, K: Into<HandlerKey>> FromIterator<(K, HandlerSpec<M, I>)>
    for Handlers<M, I>
{
    fn from_iter<T: IntoIterator<Item = (K, HandlerSpec<M, I>)>>(iter: T) -> Self {
        Self::Keyed(
            iter.into_iter()
                .map(|(key, spec)| (key.into(), spec))
                .collect(),
        )
    }
}

/// Handler monitors as handed to a collection function.
#[derive(Clone, Debug)]
pub enum Monitors<HM> {
    /// The monitor of a single anonymous handler.
    Single(HM),
    /// Monitors of named handlers.
    Keyed(MonitorMap<HM>),
}

impl<HM> Monitors<HM> {
    /// Unwraps a map holding exactly the [`DEFAULT_KEY`] entry into [`Monitors::Single`].
    #[must_use]
    pub fn from_map(mut map: MonitorMap<HM>) -> Self {
        if map.len() == 1 {
            if let Some(monitor) = map.remove(DEFAULT_KEY) {
                return Self::Single(monitor);
            }
        }
        Self::Keyed(map)
    }

    /// Returns the single monitor, if the component registered one anonymous handler.
    #[must_use]
    pub fn single(&self) -> Option<&HM> {
        match self {
            Self::Single(monitor) => Some(monitor),
            Self::Keyed(_) => None,
        }
    }

    /// Returns the monitor registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HM> {
        match self {
            Self::Single(_) => None,
            Self::Keyed(map) => map.get(key),
        }
    }

    /// Returns the keyed monitors, if the component registered named handlers.
    #[must_use]
    pub fn keyed(&self) -> Option<&MonitorMap<HM>> {
        match self {
            Self::Single(_) => None,
            Self::Keyed(map) => Some(map),
        }
    }

    /// Returns the number of monitors.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Keyed(map) => map.len(),
        }
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::Register;
    use crate::test_support::{NullManager, StaticItem};
    use alloc::string::ToString;

    fn register(props: &Props) -> (Register<NullManager, u32>, ComponentRef<u32>) {
        let component = ComponentRef::new();
        (Register::new(props, &component), component)
    }

    #[test]
    fn item_type_formats_its_name() {
        let box_type = ItemType::new("BOX");
        assert_eq!(box_type.as_str(), "BOX");
        assert_eq!(box_type.to_string(), "BOX");
        assert_eq!(ItemType::from("BOX".to_string()), box_type);
    }

    #[test]
    fn single_handler_normalizes_under_default_key() {
        let (register, _) = register(&Props::new());
        let handlers: Handlers<_, _> = register.drag_source("BOX", StaticItem).into();
        let collection = handlers.into_collection();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[DEFAULT_KEY].kind(), HandlerKind::DragSource);
    }

    #[test]
    fn keyed_handlers_keep_their_keys() {
        let (register, _) = register(&Props::new());
        let handlers: Handlers<_, _> = [
            ("source", register.drag_source("BOX", StaticItem)),
            ("target", register.drop_target("BOX", StaticItem)),
        ]
        .into_iter()
        .collect();
        let collection = handlers.into_collection();
        assert_eq!(collection.len(), 2);
        assert!(collection["source"].as_drag_source().is_some());
        assert!(collection["target"].as_drop_target().is_some());
        assert_eq!(collection["target"].kind().as_str(), "drop_target");
    }

    #[test]
    fn source_forwards_props_and_component() {
        let props = Props::new().with("id", 7);
        let (register, component) = register(&props);
        let spec = register.drag_source("BOX", StaticItem);
        let source = spec.as_drag_source().expect("registered a drag source");

        assert_eq!(source.component(), None);
        component.set(Some(42));
        assert_eq!(source.component(), Some(42));

        let item = source.begin_drag(&());
        assert_eq!(item.get("id").and_then(|v| v.as_int()), Some(7));
        assert_eq!(item.get("component").and_then(|v| v.as_int()), Some(42));
        assert!(source.can_drag(&()));
        assert_eq!(source.is_dragging(&()), None);
    }

    #[test]
    fn target_defaults_accept_without_result() {
        let (register, _) = register(&Props::new());
        let spec = register.drop_target("BOX", StaticItem);
        let target = spec.as_drop_target().expect("registered a drop target");
        assert!(target.can_drop(&()));
        target.hover(&());
        assert_eq!(target.drop(&()), None);
        assert_eq!(spec.item_type().as_str(), "BOX");
    }

    #[test]
    fn monitors_unwrap_only_a_lone_default_key() {
        let mut map = MonitorMap::new();
        map.insert(Cow::Borrowed(DEFAULT_KEY), 1_u8);
        let monitors = Monitors::from_map(map);
        assert_eq!(monitors.single(), Some(&1));
        assert_eq!(monitors.len(), 1);

        let mut map = MonitorMap::new();
        map.insert(Cow::Borrowed("a"), 1_u8);
        map.insert(Cow::Borrowed("b"), 2_u8);
        let monitors = Monitors::from_map(map);
        assert_eq!(monitors.single(), None);
        assert_eq!(monitors.get("b"), Some(&2));
        assert_eq!(monitors.keyed().map(|m| m.len()), Some(2));

        let monitors = Monitors::<u8>::from_map(MonitorMap::new());
        assert!(monitors.is_empty());
    }
}
