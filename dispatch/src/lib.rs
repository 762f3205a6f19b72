// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # r3bl_dispatch
//!
//! Share one piece of application state, and one way to mutate it, with a whole tree of
//! consumers. There are two contracts:
//!
//! 1. **Dispatch bridge**. [`create_reducer_adapter()`] wraps a plain transition function
//!    (a [`Reducer`]) and an initial state, and hands out a [`Dispatcher`] that you invoke
//!    by the typed name of an action. [`bind_action()`] curries a dispatcher with one
//!    action name so that you get a zero or one argument callable.
//! 2. **Distribution cell**. [`ScopeTree::publish_scope()`] creates a
//!    [`DistributionCell`] at a node of a [`ScopeTree`]. Every descendant of that node can
//!    read the current `{state, dispatch}` [`Snapshot`] via [`ScopeTree::read_scope()`] or
//!    [`ScopeTree::read_scope_with_callback()`], without threading it through every
//!    level. A new snapshot is only published (and observers only notified) when the new
//!    state is *not* deep-equal to the previous one.
//!
//! ```text
//!  ┌─────────── ScopeTree ────────────┐
//!  │ root                             │
//!  │  └─ node#1  publish_scope()      │──▶ DistributionCell ──▶ ReducerAdapter
//!  │      ├─ node#2  read_scope()     │        ▲     │               │
//!  │      └─ node#3  consume_scope()  │        │     ▼               ▼
//!  └──────────────────────────────────┘   Snapshot  observers    Reducer::reduce()
//! ```
//!
//! # Declaring actions
//!
//! Use [`define_actions!`] to declare the closed set of action tags for a domain, along
//! with the payload type of each tag. The macro generates the action enum and one
//! zero-sized tag marker per variant, so [`Dispatcher::invoke()`] only accepts tags
//! without a payload, and [`Dispatcher::invoke_with()`] only accepts a payload of the
//! declared type.
//!
//! ```
//! use r3bl_dispatch::{define_actions, ScopeTree};
//!
//! define_actions! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum CounterAction in counter_action {
//!         Increment,
//!         Decrement,
//!         AddValue(i32),
//!     }
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! pub struct CounterState { pub counter: i32 }
//!
//! fn reducer(state: &CounterState, action: CounterAction) -> CounterState {
//!     match action {
//!         CounterAction::Increment => CounterState { counter: state.counter + 1 },
//!         CounterAction::Decrement => CounterState { counter: state.counter - 1 },
//!         CounterAction::AddValue(it) => CounterState { counter: state.counter + it },
//!     }
//! }
//!
//! # fn main() -> miette::Result<()> {
//! let mut tree = ScopeTree::new();
//! let app = tree.mount_child(tree.root())?;
//! let counter_view = tree.mount_child(app)?;
//!
//! tree.publish_scope(app, reducer, CounterState::default())?;
//!
//! let snapshot = tree.read_scope::<CounterState, CounterAction>(counter_view)?;
//! snapshot.dispatcher().invoke(counter_action::Increment);
//! snapshot.dispatcher().invoke_with(counter_action::AddValue, 2);
//!
//! let counter = tree.read_state_with_callback::<CounterState, CounterAction, _>(
//!     counter_view,
//!     |state| state.counter,
//! )?;
//! assert_eq!(counter, 3);
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod action;
pub mod action_binder;
pub mod common;
pub mod distribution_cell;
pub mod log;
pub mod reducer_adapter;
pub mod scope_tree;

#[cfg(test)]
pub mod test_fixtures;

// Re-export stable public API using glob imports for ergonomic, flat API surface.
pub use action::*;
pub use action_binder::*;
pub use common::*;
pub use distribution_cell::*;
pub use log::*;
pub use reducer_adapter::*;
pub use scope_tree::*;
