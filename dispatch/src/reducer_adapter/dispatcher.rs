// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{AdapterCore, DispatchOutcome, StateListener};
use crate::{Action, ActionName, AdapterId};
use std::{fmt::{Debug, Formatter},
          sync::{Arc, Weak}};

/// The "invoke by name" call surface of a [`crate::ReducerAdapter`].
///
/// A dispatcher is a cheap handle. Every clone refers to the same adapter, and its
/// identity ([`Dispatcher::adapter_id()`], and `==`) never changes for the lifetime of
/// that adapter. So it is fine to hold on to a clone across any number of state changes,
/// eg: in a closure, or in a [`crate::BoundAction`].
///
/// There are three ways to dispatch:
///
/// | Method                      | Use it for                                          |
/// | :-------------------------- | :-------------------------------------------------- |
/// | [`Dispatcher::invoke()`]    | a tag without a payload, eg: `invoke(Increment)`    |
/// | [`Dispatcher::invoke_with()`] | a tag with a payload, eg: `invoke_with(AddValue, 2)` |
/// | [`Dispatcher::dispatch()`]  | an action that is already built, eg: from the enum  |
///
/// Passing a payload to a tag that doesn't declare one (or vice versa) does not compile.
pub struct Dispatcher<S, A> {
    core: Arc<AdapterCore<S, A>>,
}

impl<S, A> Dispatcher<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub(crate) fn new(core: AdapterCore<S, A>) -> Self { Self { core: Arc::new(core) } }

    pub(crate) fn core(&self) -> &AdapterCore<S, A> { &self.core }

    pub(crate) fn add_listener(&self, listener: Weak<dyn StateListener<S>>) {
        self.core.add_listener(listener);
    }

    /// Feed `action` and the current state to the reducer, and store the result as the
    /// new current state. Everything happens synchronously, see [`DispatchOutcome`] for
    /// the one exception (re-entrant dispatches).
    ///
    /// # Panics
    ///
    /// If the reducer panics, the panic propagates to the caller. The stored state is left
    /// unchanged and the dispatcher remains usable.
    ///
    /// If an observer of a [`crate::DistributionCell`] panics, the new state is already
    /// stored and published. The other observers are still notified, then the panic
    /// propagates to the caller. In both cases, actions that were queued during this
    /// cycle are dropped.
    pub fn dispatch(&self, action: A) -> DispatchOutcome { self.core.run_dispatch_cycle(action) }

    /// Dispatch the action named by `name`, which does not carry a payload.
    pub fn invoke<N>(&self, name: N) -> DispatchOutcome
    where
        N: ActionName<A, Payload = ()>,
    {
        self.dispatch(name.into_action(()))
    }

    /// Dispatch the action named by `name` with its `payload`.
    pub fn invoke_with<N>(&self, name: N, payload: N::Payload) -> DispatchOutcome
    where
        N: ActionName<A>,
    {
        self.dispatch(name.into_action(payload))
    }

    /// The adapter's current state.
    #[must_use]
    pub fn state(&self) -> Arc<S> { self.core.current_state() }
}

impl<S, A> Dispatcher<S, A> {
    #[must_use]
    pub fn adapter_id(&self) -> AdapterId { self.core.id }

    /// `true` if both handles dispatch to the same adapter.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.core, &other.core) }
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<S, A> PartialEq for Dispatcher<S, A> {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl<S, A> Eq for Dispatcher<S, A> {}

impl<S, A> Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("adapter_id", &self.core.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DispatchOutcome, create_reducer_adapter,
                test_fixtures::{CounterAction, CounterState, counter_action,
                                counter_reducer}};
    use pretty_assertions::assert_eq;
    use std::{panic::{AssertUnwindSafe, catch_unwind},
              sync::{Arc, Mutex, OnceLock}};
    use test_case::test_case;

    #[test_case(CounterState::new(0), CounterAction::Increment; "increment from zero")]
    #[test_case(CounterState::new(5), CounterAction::Decrement; "decrement")]
    #[test_case(CounterState::new(-3), CounterAction::AddValue(10); "add value")]
    #[test_case(CounterState::new(7), CounterAction::AddValue(0); "add zero")]
    #[test_case(CounterState::new(7), CounterAction::Noop; "unhandled tag")]
    fn test_dispatch_stores_reducer_result(initial: CounterState, action: CounterAction) {
        let expected = counter_reducer(&initial, action.clone());
        let dispatcher = create_reducer_adapter(counter_reducer, initial).dispatcher();

        assert_eq!(dispatcher.dispatch(action), DispatchOutcome::Applied);
        assert_eq!(*dispatcher.state(), expected);
    }

    #[test]
    fn test_invoke_builds_action_from_typed_name() {
        let seen = Arc::new(Mutex::new(vec![]));
        let seen_clone = seen.clone();
        let reducer = move |state: &CounterState, action: CounterAction| {
            seen_clone.lock().unwrap().push(action.clone());
            counter_reducer(state, action)
        };

        let dispatcher = create_reducer_adapter(reducer, CounterState::default()).dispatcher();
        dispatcher.invoke(counter_action::Increment);
        dispatcher.invoke(counter_action::Decrement);
        dispatcher.invoke_with(counter_action::AddValue, 0);
        dispatcher.invoke_with(counter_action::AddValue, 2);

        assert_eq!(*seen.lock().unwrap(), vec![
            CounterAction::Increment,
            CounterAction::Decrement,
            CounterAction::AddValue(0),
            CounterAction::AddValue(2),
        ]);
        assert_eq!(*dispatcher.state(), CounterState::new(2));
    }

    #[test]
    fn test_clones_share_identity_and_state() {
        let adapter = create_reducer_adapter(counter_reducer, CounterState::default());
        let first = adapter.dispatcher();
        let second = first.clone();

        first.invoke(counter_action::Increment);
        second.invoke(counter_action::Increment);

        assert_eq!(first, second);
        assert_eq!(first.adapter_id(), adapter.dispatcher().adapter_id());
        assert_eq!(*adapter.state(), CounterState::new(2));

        let other = create_reducer_adapter(counter_reducer, CounterState::default());
        assert_ne!(first, other.dispatcher());
    }

    #[test]
    fn test_reducer_panic_leaves_state_unchanged() {
        let reducer = |state: &CounterState, action: CounterAction| {
            if action == CounterAction::AddValue(i32::MAX) {
                panic!("counter overflow");
            }
            counter_reducer(state, action)
        };
        let dispatcher = create_reducer_adapter(reducer, CounterState::new(1)).dispatcher();

        let result = catch_unwind(AssertUnwindSafe(|| {
            dispatcher.invoke_with(counter_action::AddValue, i32::MAX)
        }));
        assert!(result.is_err());
        assert_eq!(*dispatcher.state(), CounterState::new(1));

        // Still usable afterwards.
        assert_eq!(
            dispatcher.invoke(counter_action::Increment),
            DispatchOutcome::Applied
        );
        assert_eq!(*dispatcher.state(), CounterState::new(2));
    }

    #[test]
    fn test_dispatch_from_inside_reducer_is_queued() {
        type Slot = OnceLock<crate::Dispatcher<CounterState, CounterAction>>;
        let slot: Arc<Slot> = Arc::new(OnceLock::new());
        let outcomes = Arc::new(Mutex::new(vec![]));

        let reducer = {
            let slot = slot.clone();
            let outcomes = outcomes.clone();
            move |state: &CounterState, action: CounterAction| {
                if let CounterAction::AddValue(value) = action
                    && value > 1
                    && let Some(dispatcher) = slot.get()
                {
                    let outcome = dispatcher.invoke_with(counter_action::AddValue, value - 1);
                    outcomes.lock().unwrap().push(outcome);
                }
                counter_reducer(state, action)
            }
        };

        let dispatcher = create_reducer_adapter(reducer, CounterState::default()).dispatcher();
        slot.set(dispatcher.clone()).unwrap();

        // 3 + 2 + 1, each nested dispatch applied after the one that queued it.
        assert_eq!(
            dispatcher.invoke_with(counter_action::AddValue, 3),
            DispatchOutcome::Applied
        );
        assert_eq!(*dispatcher.state(), CounterState::new(6));
        assert_eq!(*outcomes.lock().unwrap(), vec![
            DispatchOutcome::Queued,
            DispatchOutcome::Queued
        ]);
    }

    #[test]
    fn test_dispatch_from_many_threads_is_serialized() {
        let dispatcher = create_reducer_adapter(counter_reducer, CounterState::default()).dispatcher();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let dispatcher = dispatcher.clone();
                scope.spawn(move || {
                    for _ in 0..250 {
                        dispatcher.invoke(counter_action::Increment);
                    }
                });
            }
        });

        assert_eq!(*dispatcher.state(), CounterState::new(1000));
    }
}
