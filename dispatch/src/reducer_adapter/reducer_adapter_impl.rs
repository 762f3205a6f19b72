// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{AdapterCore, Dispatcher, Reducer};
use crate::{Action, AdapterId};
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// Owns the current state of type `S` and exposes a [`Dispatcher`] that feeds actions of
/// type `A` to the reducer.
///
/// Create one with [`create_reducer_adapter()`]. The adapter itself is just the owner of
/// the first [`Dispatcher`]. All the state lives behind it, so dropping the adapter while
/// clones of the dispatcher are still around is fine.
pub struct ReducerAdapter<S, A> {
    dispatcher: Dispatcher<S, A>,
}

/// Wrap `reducer` so that it can be driven by typed action names instead of hand built
/// actions. `initial_state` becomes the current state. The reducer is not called.
///
/// ```
/// use r3bl_dispatch::{create_reducer_adapter, define_actions};
///
/// define_actions! {
///     #[derive(Debug)]
///     pub enum Op in op { Add(u8), Clear }
/// }
///
/// let adapter = create_reducer_adapter(
///     |total: &u32, action: Op| match action {
///         Op::Add(it) => total + u32::from(it),
///         Op::Clear => 0,
///     },
///     10,
/// );
/// let dispatch = adapter.dispatcher();
/// dispatch.invoke_with(op::Add, 5);
/// assert_eq!(*adapter.state(), 15);
/// dispatch.invoke(op::Clear);
/// assert_eq!(*adapter.state(), 0);
/// ```
pub fn create_reducer_adapter<S, A>(
    reducer: impl Reducer<S, A>,
    initial_state: S,
) -> ReducerAdapter<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    let core = AdapterCore::new(Arc::new(reducer), initial_state);
    tracing::debug!(
        message = "🧩 created reducer adapter",
        adapter_id = %core.id,
        state_type = std::any::type_name::<S>()
    );
    ReducerAdapter {
        dispatcher: Dispatcher::new(core),
    }
}

impl<S, A> ReducerAdapter<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    #[must_use]
    pub fn state(&self) -> Arc<S> { self.dispatcher.state() }

    /// Returns the same (`==`) dispatcher every time it is called.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<S, A> { self.dispatcher.clone() }

    #[must_use]
    pub fn adapter_id(&self) -> AdapterId { self.dispatcher.adapter_id() }

    /// The `(state, dispatch)` pair.
    #[must_use]
    pub fn into_parts(self) -> (Arc<S>, Dispatcher<S, A>) {
        (self.dispatcher.state(), self.dispatcher)
    }
}

impl<S, A> Debug for ReducerAdapter<S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerAdapter")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
