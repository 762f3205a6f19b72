// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Lifecycle of a distribution cell
//!
//! ```text
//! Unbound ──publish()──▶ Bound(s0, gen 0)
//!                          │
//!                          ├─ dispatch, next == published (deep-equal)
//!                          │    └─▶ Bound(si)      no snapshot, no observer called
//!                          │
//!                          ├─ dispatch, next != published
//!                          │    └─▶ Bound(si+1)    new snapshot, every observer once
//!                          │
//!                          └─ tear_down() (node unmounted) ──▶ Unbound
//! ```
//!
//! `Unbound` is terminal. A torn down cell keeps its last snapshot readable, and the
//! adapter keeps reducing, but nothing is ever published or notified again.

use super::{DeepEqMemo, MemoUpdate, ObserverGuard, ObserverRegistry, RepublishPolicy,
            ScopeConfig, SharedSnapshot, Snapshot};
use crate::{Action, Dispatcher, ObserverId, Reducer, StateListener,
            create_reducer_adapter, lock_ignoring_poison};
use std::{any::Any,
          fmt::{Debug, Formatter},
          panic::{AssertUnwindSafe, catch_unwind, resume_unwind},
          sync::{Arc, Mutex, Weak,
                 atomic::{AtomicBool, Ordering}}};

type ObserverFn<S, A> = Arc<Mutex<dyn FnMut(&SharedSnapshot<S, A>) + Send>>;

/// Holds the current `{state, dispatch}` [`Snapshot`] of one published scope, and
/// notifies observers when a *different* state is published.
///
/// The cell owns the [`crate::ReducerAdapter`] it was published with, and registers
/// itself (weakly) as a listener of that adapter. Every time the adapter stores a new
/// state, the cell compares it with the published one using [`PartialEq`] (via
/// [`DeepEqMemo`]):
/// - Deep-equal: the published snapshot is kept (even its [`Arc`] identity), and no
///   observer is called.
/// - Otherwise: exactly one new snapshot is published, with the next
///   [`Snapshot::generation()`], and every observer is called once with it, before the
///   call to [`Dispatcher::dispatch()`] returns.
///
/// Observers are called without holding any of the cell's locks, so they may read the
/// cell, subscribe, drop their guard, or dispatch (which is queued, see
/// [`crate::DispatchOutcome::Queued`]).
///
/// If an observer panics, the remaining observers are still called with the same
/// snapshot, and then the first panic resumes in the caller of
/// [`Dispatcher::dispatch()`]. The new state and snapshot stay published.
pub struct DistributionCell<S, A> {
    config: ScopeConfig,
    dispatcher: Dispatcher<S, A>,
    torn_down: AtomicBool,
    memo: Mutex<DeepEqMemo<Arc<S>, SharedSnapshot<S, A>>>,
    observers: Mutex<Vec<(ObserverId, ObserverFn<S, A>)>>,
}

impl<S, A> DistributionCell<S, A>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    /// Create a [`crate::ReducerAdapter`] from `reducer` and `initial_state`, and publish
    /// its state as generation `0`.
    pub fn publish(
        reducer: impl Reducer<S, A>,
        initial_state: S,
        config: ScopeConfig,
    ) -> Arc<Self> {
        let dispatcher = create_reducer_adapter(reducer, initial_state).dispatcher();
        let memo = DeepEqMemo::new(dispatcher.state(), |state| {
            Arc::new(Snapshot::new(state.clone(), dispatcher.clone(), 0))
        });

        let cell = Arc::new(Self {
            config,
            dispatcher,
            torn_down: AtomicBool::new(false),
            memo: Mutex::new(memo),
            observers: Mutex::new(vec![]),
        });

        let listener: Arc<dyn StateListener<S>> = cell.clone();
        cell.dispatcher.add_listener(Arc::downgrade(&listener));

        tracing::debug!(
            message = "📣 published scope",
            scope = cell.config.label_or_default(),
            adapter_id = %cell.dispatcher.adapter_id(),
            republish_policy = ?cell.config.republish_policy
        );

        cell
    }

    /// The snapshot that is published right now.
    pub fn snapshot(&self) -> SharedSnapshot<S, A> { lock_ignoring_poison(&self.memo).get().clone() }

    pub fn generation(&self) -> u64 { lock_ignoring_poison(&self.memo).get().generation() }

    /// `true` if a newer snapshot than `snapshot` has been published since it was read.
    pub fn is_stale(&self, snapshot: &SharedSnapshot<S, A>) -> bool {
        !Arc::ptr_eq(lock_ignoring_poison(&self.memo).get(), snapshot)
    }

    /// Call `observer` with every snapshot published from now on, until the returned
    /// guard is dropped. It is not called with the current snapshot. Subscribing to a
    /// torn down cell returns a guard that is already detached.
    pub fn subscribe(
        self: &Arc<Self>,
        observer: impl FnMut(&SharedSnapshot<S, A>) + Send + 'static,
    ) -> ObserverGuard {
        let id = ObserverId::generate();
        if self.is_torn_down() {
            return ObserverGuard::new(id, Weak::<Self>::new());
        }

        let observer: ObserverFn<S, A> = Arc::new(Mutex::new(observer));
        lock_ignoring_poison(&self.observers).push((id, observer));

        tracing::trace!(
            message = "👀 subscribed observer",
            scope = self.config.label_or_default(),
            observer_id = %id
        );

        let registry: Arc<dyn ObserverRegistry> = self.clone();
        ObserverGuard::new(id, Arc::downgrade(&registry))
    }

    pub fn observer_count(&self) -> usize { lock_ignoring_poison(&self.observers).len() }

    pub fn dispatcher(&self) -> &Dispatcher<S, A> { &self.dispatcher }

    pub fn config(&self) -> &ScopeConfig { &self.config }

    /// Returns the new snapshot if one was published.
    fn republish(&self, next: &Arc<S>) -> Option<SharedSnapshot<S, A>> {
        let mut memo = lock_ignoring_poison(&self.memo);
        let generation = memo.get().generation() + 1;
        let derive = |state: &Arc<S>| {
            Arc::new(Snapshot::new(state.clone(), self.dispatcher.clone(), generation))
        };

        match self.config.republish_policy {
            RepublishPolicy::DeepEqual => match memo.update(next.clone(), derive) {
                MemoUpdate::Recomputed => Some(memo.get().clone()),
                MemoUpdate::Retained => None,
            },
            RepublishPolicy::Always => {
                memo.replace(next.clone(), derive);
                Some(memo.get().clone())
            }
        }
    }

    fn notify_observers(&self, snapshot: &SharedSnapshot<S, A>) {
        let observers = lock_ignoring_poison(&self.observers)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect::<Vec<_>>();

        let mut first_panic: Option<Box<dyn Any + Send>> = None;
        for observer in observers {
            if self.is_torn_down() {
                break;
            }
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut observer = lock_ignoring_poison(&observer);
                (*observer)(snapshot);
            }));
            if let Err(payload) = result {
                tracing::warn!(
                    message = "💥 observer panicked",
                    scope = self.config.label_or_default(),
                    generation = snapshot.generation()
                );
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
        }

        if let Some(payload) = first_panic {
            resume_unwind(payload);
        }
    }
}

impl<S, A> StateListener<S> for DistributionCell<S, A>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    fn on_state_replaced(&self, next: &Arc<S>) {
        if self.is_torn_down() {
            return;
        }

        let Some(snapshot) = self.republish(next) else {
            tracing::trace!(
                message = "🤫 suppressed republish of deep-equal state",
                scope = self.config.label_or_default(),
                generation = self.generation()
            );
            return;
        };

        tracing::debug!(
            message = "📣 republished scope",
            scope = self.config.label_or_default(),
            generation = snapshot.generation(),
            observer_count = self.observer_count()
        );

        self.notify_observers(&snapshot);
    }
}

impl<S, A> ObserverRegistry for DistributionCell<S, A>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    fn remove_observer(&self, id: ObserverId) {
        lock_ignoring_poison(&self.observers).retain(|(it, _)| *it != id);
    }

    fn has_observer(&self, id: ObserverId) -> bool {
        lock_ignoring_poison(&self.observers)
            .iter()
            .any(|(it, _)| *it == id)
    }
}

impl<S, A> DistributionCell<S, A> {
    /// Move this cell to `Unbound`, for good: drop every observer, and stop publishing.
    /// Calling it again does nothing.
    pub fn tear_down(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        // Observers are dropped outside the lock, they may own guards for this cell.
        let observers = std::mem::take(&mut *lock_ignoring_poison(&self.observers));
        let observer_count = observers.len();
        drop(observers);

        tracing::debug!(
            message = "🧹 tore down scope",
            scope = self.config.label_or_default(),
            adapter_id = %self.dispatcher.adapter_id(),
            observer_count
        );
    }

    pub fn is_torn_down(&self) -> bool { self.torn_down.load(Ordering::SeqCst) }
}

/// Lets the [`crate::ScopeTree`] tear down cells whose types it has erased.
pub(crate) trait TearDown: Send + Sync {
    fn tear_down(&self);
}

impl<S, A> TearDown for DistributionCell<S, A>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    fn tear_down(&self) { DistributionCell::tear_down(self); }
}

impl<S, A> Drop for DistributionCell<S, A> {
    fn drop(&mut self) { self.tear_down(); }
}

impl<S, A> Debug for DistributionCell<S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionCell")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// A weak handle to a cell, for anything (eg: a [`crate::Consumer`]) that must not keep
/// a torn down scope alive.
pub type WeakCell<S, A> = Weak<DistributionCell<S, A>>;
