// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Dispatcher;
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// The `{state, dispatch}` pair that a [`crate::DistributionCell`] publishes.
///
/// A snapshot is an immutable value, not a live view. Once a cell has published a newer
/// one, this one is stale, see [`crate::DistributionCell::is_stale()`]. The
/// [`Snapshot::dispatcher()`] of every snapshot of a cell is the same (`==`).
pub struct Snapshot<S, A> {
    state: Arc<S>,
    dispatcher: Dispatcher<S, A>,
    generation: u64,
}

pub type SharedSnapshot<S, A> = Arc<Snapshot<S, A>>;

impl<S, A> Snapshot<S, A> {
    pub(crate) fn new(state: Arc<S>, dispatcher: Dispatcher<S, A>, generation: u64) -> Self {
        Self {
            state,
            dispatcher,
            generation,
        }
    }

    pub fn state(&self) -> &S { &self.state }

    pub fn state_arc(&self) -> Arc<S> { self.state.clone() }

    pub fn dispatcher(&self) -> &Dispatcher<S, A> { &self.dispatcher }

    /// `0` for the snapshot published with the initial state, then incremented by one for
    /// every snapshot published after it.
    pub fn generation(&self) -> u64 { self.generation }

    pub fn into_parts(self) -> (Arc<S>, Dispatcher<S, A>) { (self.state, self.dispatcher) }
}

impl<S, A> Clone for Snapshot<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            dispatcher: self.dispatcher.clone(),
            generation: self.generation,
        }
    }
}

impl<S: Debug, A> Debug for Snapshot<S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("state", &self.state)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
