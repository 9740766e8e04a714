// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding errors.

use alloc::string::String;

/// Errors raised while building a binding or mounting a wrapped component.
///
/// All of these are programmer errors: they abort the operation that detected
/// them and nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BindError {
    /// The binding was built without a registration function.
    #[error(
        "drag and drop binding is missing its first required parameter, \
         a function that registers drag sources and/or drop targets"
    )]
    MissingConfigure,
    /// The binding was built without a collection function.
    #[error(
        "drag and drop binding is missing its second required parameter, \
         a function that collects props to inject into the component"
    )]
    MissingCollect,
    /// No manager was provided to the component's context.
    #[error(
        "could not find the drag and drop manager in the context of {component}; \
         make sure to wrap the top-level component of your app with a DragDropContext"
    )]
    MissingManager {
        /// Name of the component being mounted.
        component: String,
    },
    /// The context holds a manager of a different type than the binding expects.
    #[error(
        "the drag and drop manager in the context of {component} is a {found}, \
         expected a {expected}; make sure the DragDropContext wrapping your app \
         was created with the manager this component is bound to"
    )]
    WrongManagerKind {
        /// Name of the component being mounted.
        component: String,
        /// Type name of the expected manager.
        expected: &'static str,
        /// Type name of the manager found in the context.
        found: &'static str,
    },
    /// The registration function returned handlers the wrapper cannot use.
    #[error(
        "expected the registration function for {component} to return the result of \
         calling register.drag_source() or register.drop_target(), or a map containing \
         only such values; handler {key:?} {violation}"
    )]
    InvalidHandlers {
        /// Name of the component whose registration function misbehaved.
        component: String,
        /// Key of the offending handler.
        key: String,
        /// What was wrong with it.
        violation: HandlerViolation,
    },
}

/// Ways a registration function can misuse handler specs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HandlerViolation {
    /// An explicit handler map used the key reserved for a single handler.
    #[error("uses the reserved key of a single anonymous handler")]
    ReservedKey,
    /// The handler spec was created by the register of a different component.
    #[error("was registered by a different component")]
    ForeignComponent,
    /// The handler spec was created during an earlier registration pass.
    #[error("was registered with stale props from an earlier pass")]
    StaleProps,
}
