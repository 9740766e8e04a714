// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The binding factory.
//!
//! A [`DragDropBinding`] pairs a registration function with a collection
//! function. Decorating a component with it produces a [`WrapperType`], whose
//! instances own the handler registrations of one mounted component.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use core::any::type_name;
use core::fmt;

use crate::context::DragDropContext;
use crate::error::BindError;
use crate::handler::{Handlers, Monitors};
use crate::manager::DragDropManager;
use crate::props::Props;
use crate::register::{ComponentRef, Register};
use crate::shallow::{PropsEq, default_props_eq};
use crate::wrapper::DragDropHandler;

/// Registration function: builds the handlers a component needs for some props.
pub type ConfigureFn<M, I> = dyn Fn(&Register<M, I>, &Props) -> Handlers<M, I>;

/// Collection function: derives props from handler monitors and the global monitor.
pub type CollectFn<M> = dyn Fn(
    Monitors<<M as DragDropManager>::HandlerMonitor>,
    &<M as DragDropManager>::Monitor,
) -> Props;

/// Options of a binding.
///
/// # Example
///
/// ```rust
/// use understory_dnd::{BindOptions, Props};
///
/// // Compare props by the `id` key only.
/// let options = BindOptions::new()
///     .are_props_equal(|next, prev| next.get("id") == prev.get("id"))
///     .validate_handlers(true);
///
/// let a = Props::new().with("id", 1).with("label", "a");
/// let b = Props::new().with("id", 1).with("label", "b");
/// assert!(options.props_equal(&b, &a));
/// assert!(options.validates_handlers());
/// ```
#[derive(Clone)]
pub struct BindOptions {
    are_props_equal: PropsEq,
    validate_handlers: bool,
}

impl BindOptions {
    /// Creates the default options.
    ///
    /// Props are compared with [`shallow_equal_scalar`](crate::shallow_equal_scalar)
    /// and handlers are validated in debug builds only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            are_props_equal: default_props_eq(),
            validate_handlers: cfg!(debug_assertions),
        }
    }

    /// Sets the predicate deciding whether incoming props equal the current ones.
    ///
    /// It is called as `predicate(next, prev)`. Equal props skip the
    /// registration pass and, together with unchanged state, the render.
    #[must_use]
    pub fn are_props_equal(mut self, predicate: impl Fn(&Props, &Props) -> bool + 'static) -> Self {
        self.are_props_equal = Rc::new(predicate);
        self
    }

    /// Sets whether registration results are checked for misused handler specs.
    #[must_use]
    pub fn validate_handlers(mut self, validate: bool) -> Self {
        self.validate_handlers = validate;
        self
    }

    /// Applies the props predicate.
    #[must_use]
    pub fn props_equal(&self, next: &Props, prev: &Props) -> bool {
        (self.are_props_equal)(next, prev)
    }

    /// Returns whether registration results are validated.
    #[must_use]
    pub fn validates_handlers(&self) -> bool {
        self.validate_handlers
    }
}

impl Default for BindOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindOptions")
            .field("validate_handlers", &self.validate_handlers)
            .finish_non_exhaustive()
    }
}

pub(crate) struct BindingInner<M: DragDropManager, I> {
    pub(crate) configure: Box<ConfigureFn<M, I>>,
    pub(crate) collect: Box<CollectFn<M>>,
    pub(crate) options: BindOptions,
}

/// Creates a binding from a registration function and a collection function.
///
/// `configure` is called with a [`Register`] and the component's props every
/// time the props change, and returns the handlers to register. `collect` is
/// called with the handler monitors and the manager's global monitor whenever
/// handler state may have changed, and returns the props to inject into the
/// decorated component.
///
/// Use [`DragDropBinding::builder`] when the functions are only known at
/// runtime and may be missing.
pub fn bind_handlers<M, I>(
    configure: impl Fn(&Register<M, I>, &Props) -> Handlers<M, I> + 'static,
    collect: impl Fn(Monitors<M::HandlerMonitor>, &M::Monitor) -> Props + 'static,
    options: BindOptions,
) -> DragDropBinding<M, I>
where
    M: DragDropManager,
    I: Clone + 'static,
{
    DragDropBinding {
        inner: Rc::new(BindingInner {
            configure: Box::new(configure),
            collect: Box::new(collect),
            options,
        }),
    }
}

/// A registration function and a collection function, ready to decorate components.
///
/// Cloning is cheap; clones share the functions.
pub struct DragDropBinding<M: DragDropManager, I> {
    inner: Rc<BindingInner<M, I>>,
}

impl<M: DragDropManager, I: Clone + 'static> DragDropBinding<M, I> {
    /// Starts building a binding whose functions are supplied one by one.
    #[must_use]
    pub fn builder() -> BindingBuilder<M, I> {
        BindingBuilder {
            configure: None,
            collect: None,
            options: BindOptions::new(),
        }
    }

    /// Returns the options of this binding.
    #[must_use]
    pub fn options(&self) -> &BindOptions {
        &self.inner.options
    }

    /// Produces the wrapper type for the decorated component `C`.
    #[must_use]
    pub fn decorate<C>(&self) -> WrapperType<M, C>
    where
        C: DecoratedComponent<Instance = I>,
    {
        let component_name = component_name::<C>();
        WrapperType {
            binding: self.inner.clone(),
            component_name,
            display_name: format!("{component_name}DragDropHandler").into(),
        }
    }
}

impl<M: DragDropManager, I> Clone for DragDropBinding<M, I> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: DragDropManager, I> fmt::Debug for DragDropBinding<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropBinding")
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DragDropBinding`].
///
/// # Example
///
/// ```rust
/// use understory_dnd::{BindError, DragDropBinding, Props};
/// # use std::rc::Rc;
/// # use understory_dnd::{ChangeListener, DragDropManager, HandlerCollection, HandlerMap};
/// # struct Manager;
/// # impl DragDropManager for Manager {
/// #     type Monitor = ();
/// #     type HandlerMonitor = ();
/// #     fn monitor(&self) -> &() { &() }
/// #     fn create_handler_map<I: Clone + 'static>(
/// #         self: Rc<Self>,
/// #         _: HandlerCollection<Self, I>,
/// #         _: ChangeListener,
/// #     ) -> Box<dyn HandlerMap<Self, I>> {
/// #         unimplemented!()
/// #     }
/// # }
///
/// let missing = DragDropBinding::<Manager, ()>::builder()
///     .collect(|_, _| Props::new())
///     .build();
/// assert_eq!(missing.unwrap_err(), BindError::MissingConfigure);
/// ```
pub struct BindingBuilder<M: DragDropManager, I> {
    configure: Option<Box<ConfigureFn<M, I>>>,
    collect: Option<Box<CollectFn<M>>>,
    options: BindOptions,
}

impl<M: DragDropManager, I: Clone + 'static> BindingBuilder<M, I> {
    /// Sets the registration function.
    #[must_use]
    pub fn configure(
        mut self,
        configure: impl Fn(&Register<M, I>, &Props) -> Handlers<M, I> + 'static,
    ) -> Self {
        self.configure = Some(Box::new(configure));
        self
    }

    /// Sets the collection function.
    #[must_use]
    pub fn collect(
        mut self,
        collect: impl Fn(Monitors<M::HandlerMonitor>, &M::Monitor) -> Props + 'static,
    ) -> Self {
        self.collect = Some(Box::new(collect));
        self
    }

    /// Sets the binding options.
    #[must_use]
    pub fn options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the binding.
    ///
    /// # Errors
    ///
    /// [`BindError::MissingConfigure`] if no registration function was set,
    /// otherwise [`BindError::MissingCollect`] if no collection function was set.
    pub fn build(self) -> Result<DragDropBinding<M, I>, BindError> {
        let configure = self.configure.ok_or(BindError::MissingConfigure)?;
        let collect = self.collect.ok_or(BindError::MissingCollect)?;
        Ok(DragDropBinding {
            inner: Rc::new(BindingInner {
                configure,
                collect,
                options: self.options,
            }),
        })
    }
}

impl<M: DragDropManager, I> fmt::Debug for BindingBuilder<M, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingBuilder")
            .field("has_configure", &self.configure.is_some())
            .field("has_collect", &self.collect.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// A component that can be decorated with a [`DragDropBinding`].
///
/// The wrapper renders it with its own props merged with the collected
/// props, and hands it the [`ComponentRef`] through which handler specs
/// reach the mounted instance.
pub trait DecoratedComponent: 'static {
    /// Handle handed to handler specs for the mounted instance.
    type Instance: Clone + 'static;

    /// Name used in wrapper names and error messages.
    ///
    /// Defaults to the unqualified type name.
    const DISPLAY_NAME: Option<&'static str> = None;

    /// Renders with the merged props.
    fn render(&mut self, props: &Props, component_ref: &ComponentRef<Self::Instance>);
}

/// The wrapper component produced by [`DragDropBinding::decorate`].
pub struct WrapperType<M: DragDropManager, C: DecoratedComponent> {
    binding: Rc<BindingInner<M, C::Instance>>,
    component_name: &'static str,
    display_name: Rc<str>,
}

impl<M: DragDropManager, C: DecoratedComponent> WrapperType<M, C> {
    /// Returns `<name>DragDropHandler`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the name of the decorated component.
    #[must_use]
    pub fn component_name(&self) -> &'static str {
        self.component_name
    }

    /// Mounts an instance wrapping `component` with the manager provided by `context`.
    ///
    /// # Errors
    ///
    /// [`BindError::MissingManager`] or [`BindError::WrongManagerKind`] when
    /// `context` does not provide an `M`, and [`BindError::InvalidHandlers`]
    /// when the first registration pass is rejected.
    pub fn mount(
        &self,
        component: C,
        props: Props,
        context: &DragDropContext,
    ) -> Result<DragDropHandler<M, C>, BindError> {
        DragDropHandler::mount(
            self.binding.clone(),
            self.component_name,
            self.display_name.clone(),
            component,
            props,
            context,
        )
    }
}

impl<M: DragDropManager, C: DecoratedComponent> Clone for WrapperType<M, C> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            component_name: self.component_name,
            display_name: self.display_name.clone(),
        }
    }
}

impl<M: DragDropManager, C: DecoratedComponent> fmt::Debug for WrapperType<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperType")
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

fn component_name<C: DecoratedComponent>() -> &'static str {
    match C::DISPLAY_NAME {
        Some(name) if !name.is_empty() => name,
        _ => short_type_name(type_name::<C>()),
    }
}

/// Strips the module path and generic arguments from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base);
    if name.is_empty() { "Component" } else { name }
}
