// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

/// A pure state transition function: `(state, action) -> state`.
///
/// - It must not mutate its input (it only gets a shared reference to it anyway).
/// - It is trusted to be total over its action enum. A tag it does not care about should
///   fall through to a default branch that returns a clone of the input.
/// - If it panics, the panic propagates to the caller of
///   [`crate::Dispatcher::dispatch()`] and the stored state is left as it was.
///
/// Any `Fn(&S, A) -> S` closure or fn item is a reducer, thanks to the blanket impl
/// below. Implement the trait directly when the reducer needs configuration of its own.
pub trait Reducer<S, A>: Send + Sync + 'static {
    fn reduce(&self, state: &S, action: A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, A) -> S + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, action: A) -> S { self(state, action) }
}

/// Type erased reducer that can be shared across threads.
pub type SafeReducer<S, A> = Arc<dyn Reducer<S, A>>;
