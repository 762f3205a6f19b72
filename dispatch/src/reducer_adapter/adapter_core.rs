// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The shared core behind a [`crate::ReducerAdapter`] and every clone of its
//! [`crate::Dispatcher`].
//!
//! # Dispatch cycle
//!
//! A dispatch cycle applies one action and then drains any actions that were dispatched
//! re-entrantly while it ran:
//!
//! ```text
//! dispatch(action)
//!   │
//!   ├─ this thread is already inside a cycle for this adapter?
//!   │    └─ yes: push to `pending`, return Queued
//!   │
//!   ├─ this thread is inside a cycle for another adapter, and `gate` is held?
//!   │    └─ yes: push to `pending`, return Queued (the holder drains it)
//!   │
//!   ├─ lock `gate` (cycles on one adapter never overlap, across threads)
//!   ├─ apply(action): reduce ─▶ store ─▶ notify listeners
//!   ├─ while let Some(next) = pending.pop_front(): apply(next)
//!   ├─ unlock `gate`, then drain anything pushed after the last pop
//!   └─ return Applied
//! ```
//!
//! A thread that is inside a cycle never blocks on the gate of another adapter. So two
//! threads whose observers dispatch into each other's adapters can't deadlock.
//!
//! Re-entrant dispatches come from a reducer that dispatches, or from an observer that
//! dispatches while it is being notified. The reducer always runs to completion before
//! the next action is accepted, and every observer sees the snapshots in the order they
//! were published.

use super::SafeReducer;
use crate::{Action, AdapterId, lock_ignoring_poison, try_lock_ignoring_poison};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::{any::{Any, TypeId},
          cell::RefCell,
          collections::VecDeque,
          sync::{Arc, Mutex, MutexGuard, Weak}};

/// Something that wants to know every time the adapter stores a new state. The
/// [`crate::DistributionCell`] is the only implementor.
pub(crate) trait StateListener<S>: Send + Sync {
    fn on_state_replaced(&self, next: &Arc<S>);
}

/// Key for the bound action cache: the tag marker type and its name.
pub(crate) type BoundActionKey = (TypeId, &'static str);

/// Weak refs to the bound actions created by [`crate::bind_action()`], so binding the
/// same tag twice returns the same identity, while any holder keeps it alive.
pub(crate) type BoundActionCache = FxHashMap<BoundActionKey, Weak<dyn Any + Send + Sync>>;

thread_local! {
    /// Adapters that this thread is currently running a dispatch cycle for.
    static ACTIVE_CYCLES: RefCell<SmallVec<[AdapterId; 4]>> =
        const { RefCell::new(SmallVec::new_const()) };
}

pub(crate) struct AdapterCore<S, A> {
    pub(crate) id: AdapterId,
    reducer: SafeReducer<S, A>,
    state: Mutex<Arc<S>>,
    gate: Mutex<()>,
    pending: Mutex<VecDeque<A>>,
    listeners: Mutex<Vec<Weak<dyn StateListener<S>>>>,
    pub(crate) bound_actions: Mutex<BoundActionCache>,
}

/// What happened to an action handed to [`crate::Dispatcher::dispatch()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reducer ran, the result was stored, and listeners were notified, all before
    /// `dispatch()` returned.
    Applied,
    /// The dispatch was re-entrant (made from inside a reducer or an observer of the same
    /// adapter). It is applied in call order before the outermost `dispatch()` returns.
    ///
    /// A dispatch made from inside a cycle of another adapter is also queued when a
    /// different thread is running a cycle on the target adapter right now. That thread
    /// applies it before its own `dispatch()` returns.
    Queued,
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool { matches!(self, Self::Applied) }
}

impl<S, A> AdapterCore<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub(crate) fn new(reducer: SafeReducer<S, A>, initial_state: S) -> Self {
        Self {
            id: AdapterId::generate(),
            reducer,
            state: Mutex::new(Arc::new(initial_state)),
            gate: Mutex::new(()),
            pending: Mutex::new(VecDeque::new()),
            listeners: Mutex::new(vec![]),
            bound_actions: Mutex::new(FxHashMap::default()),
        }
    }

    pub(crate) fn current_state(&self) -> Arc<S> { lock_ignoring_poison(&self.state).clone() }

    pub(crate) fn add_listener(&self, listener: Weak<dyn StateListener<S>>) {
        lock_ignoring_poison(&self.listeners).push(listener);
    }

    pub(crate) fn run_dispatch_cycle(&self, action: A) -> DispatchOutcome {
        if is_cycle_active(self.id) {
            // % is Display, ? is Debug.
            tracing::trace!(
                message = "⏳ queue re-entrant dispatch",
                adapter_id = %self.id,
                action = action.name()
            );
            lock_ignoring_poison(&self.pending).push_back(action);
            return DispatchOutcome::Queued;
        }

        let gate = if is_any_cycle_active() {
            let Some(gate) = try_lock_ignoring_poison(&self.gate) else {
                tracing::trace!(
                    message = "⏳ queue dispatch for busy adapter",
                    adapter_id = %self.id,
                    action = action.name()
                );
                lock_ignoring_poison(&self.pending).push_back(action);
                // The holder may have released the gate after its last pop.
                self.drain_pending_if_idle();
                return DispatchOutcome::Queued;
            };
            gate
        } else {
            lock_ignoring_poison(&self.gate)
        };

        self.run_cycle(gate, Some(action));
        self.drain_pending_if_idle();

        DispatchOutcome::Applied
    }

    /// Apply `first` (if any), then everything in `pending`, while holding `gate`.
    fn run_cycle(&self, gate: MutexGuard<'_, ()>, first: Option<A>) {
        let _gate = gate;
        let _cycle = ActiveCycleGuard::enter(self);

        if let Some(action) = first {
            self.apply(action);
        }
        while let Some(next) = self.pop_pending() {
            self.apply(next);
        }
    }

    /// Actions pushed by other threads between the holder's last pop and its unlock are
    /// applied here, by whoever gets the gate next.
    fn drain_pending_if_idle(&self) {
        while self.has_pending() {
            let Some(gate) = try_lock_ignoring_poison(&self.gate) else {
                return;
            };
            self.run_cycle(gate, None);
        }
    }

    fn pop_pending(&self) -> Option<A> { lock_ignoring_poison(&self.pending).pop_front() }

    fn has_pending(&self) -> bool { !lock_ignoring_poison(&self.pending).is_empty() }

    fn apply(&self, action: A) {
        let action_name = action.name();
        let has_payload = action.has_payload();

        // The state lock is not held while the reducer runs, so the reducer may read the
        // current state through a dispatcher.
        let current = self.current_state();
        let next = Arc::new(self.reducer.reduce(&current, action));
        *lock_ignoring_poison(&self.state) = next.clone();

        tracing::debug!(
            message = "🚀 applied action",
            adapter_id = %self.id,
            action = action_name,
            has_payload
        );

        self.notify_listeners(&next);
    }

    fn notify_listeners(&self, next: &Arc<S>) {
        let live_listeners = {
            let mut listeners = lock_ignoring_poison(&self.listeners);
            listeners.retain(|it| it.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect::<Vec<_>>()
        };
        for listener in live_listeners {
            listener.on_state_replaced(next);
        }
    }
}

fn is_cycle_active(id: AdapterId) -> bool {
    ACTIVE_CYCLES.with_borrow(|active| active.contains(&id))
}

fn is_any_cycle_active() -> bool { ACTIVE_CYCLES.with_borrow(|active| !active.is_empty()) }

/// Marks a dispatch cycle as active on this thread for as long as it is alive.
///
/// If the cycle unwinds (the reducer or an observer panicked), the actions that were
/// queued during the cycle are dropped along with it.
struct ActiveCycleGuard<'a, S, A> {
    core: &'a AdapterCore<S, A>,
}

impl<'a, S, A> ActiveCycleGuard<'a, S, A> {
    fn enter(core: &'a AdapterCore<S, A>) -> Self {
        ACTIVE_CYCLES.with_borrow_mut(|active| active.push(core.id));
        Self { core }
    }
}

impl<S, A> Drop for ActiveCycleGuard<'_, S, A> {
    fn drop(&mut self) {
        let id = self.core.id;
        ACTIVE_CYCLES.with_borrow_mut(|active| active.retain(|it| *it != id));
        if std::thread::panicking() {
            lock_ignoring_poison(&self.core.pending).clear();
        }
    }
}
