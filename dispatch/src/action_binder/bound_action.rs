// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Action, ActionName, DispatchOutcome, Dispatcher, lock_ignoring_poison};
use std::{any::{Any, TypeId},
          fmt::{Debug, Formatter},
          sync::{Arc, Weak}};

/// A [`Dispatcher`] curried with one action name `N`. Calling it dispatches `N`, with the
/// payload passed to [`BoundAction::call_with()`] (or none, for [`BoundAction::call()`]).
///
/// Get one from [`bind_action()`]. Equality is identity: two bound actions are `==` when
/// they came from the same `(dispatcher, name)` binding, which is what makes it safe to
/// hand one to a "skip if unchanged" comparison.
pub struct BoundAction<S, A, N> {
    inner: Arc<BoundActionInner<S, A, N>>,
}

struct BoundActionInner<S, A, N> {
    dispatcher: Dispatcher<S, A>,
    name: N,
}

/// Bind `name` to `dispatcher`.
///
/// Binding the same tag to the same dispatcher again returns the same identity, for as
/// long as at least one clone of the first [`BoundAction`] is alive. The adapter only
/// keeps a weak reference to it.
///
/// ```
/// use r3bl_dispatch::{bind_action, create_reducer_adapter, define_actions};
///
/// define_actions! {
///     pub enum Volume in volume { Up, Set(u8) }
/// }
///
/// let adapter = create_reducer_adapter(
///     |level: &u8, action: Volume| match action {
///         Volume::Up => level.saturating_add(1),
///         Volume::Set(it) => it,
///     },
///     0,
/// );
///
/// let set_volume = bind_action(&adapter.dispatcher(), volume::Set);
/// set_volume.call_with(7);
/// bind_action(&adapter.dispatcher(), volume::Up).call();
/// assert_eq!(*adapter.state(), 8);
///
/// assert_eq!(set_volume, bind_action(&adapter.dispatcher(), volume::Set));
/// ```
pub fn bind_action<S, A, N>(dispatcher: &Dispatcher<S, A>, name: N) -> BoundAction<S, A, N>
where
    S: Send + Sync + 'static,
    A: Action,
    N: ActionName<A>,
{
    let key = (TypeId::of::<N>(), N::NAME);
    let mut cache = lock_ignoring_poison(&dispatcher.core().bound_actions);

    let cached = cache
        .get(&key)
        .and_then(Weak::upgrade)
        .and_then(|it| it.downcast::<BoundActionInner<S, A, N>>().ok());
    if let Some(inner) = cached {
        return BoundAction { inner };
    }

    cache.retain(|_, it| it.strong_count() > 0);

    let inner = Arc::new(BoundActionInner {
        dispatcher: dispatcher.clone(),
        name,
    });
    let erased: Arc<dyn Any + Send + Sync> = inner.clone();
    cache.insert(key, Arc::downgrade(&erased));

    tracing::trace!(
        message = "🔗 bound action",
        adapter_id = %dispatcher.adapter_id(),
        action = N::NAME
    );

    BoundAction { inner }
}

impl<S, A, N> BoundAction<S, A, N>
where
    S: Send + Sync + 'static,
    A: Action,
    N: ActionName<A>,
{
    /// Dispatch the bound tag, which does not carry a payload.
    pub fn call(&self) -> DispatchOutcome
    where
        N: ActionName<A, Payload = ()>,
    {
        self.inner.dispatcher.invoke(self.inner.name)
    }

    /// Dispatch the bound tag with `payload`.
    pub fn call_with(&self, payload: N::Payload) -> DispatchOutcome {
        self.inner.dispatcher.invoke_with(self.inner.name, payload)
    }

    #[must_use]
    pub fn name(&self) -> &'static str { N::NAME }

    #[must_use]
    pub fn tag(&self) -> N { self.inner.name }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<S, A> { &self.inner.dispatcher }
}

impl<S, A, N> BoundAction<S, A, N> {
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
}

impl<S, A, N> Clone for BoundAction<S, A, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, N> PartialEq for BoundAction<S, A, N> {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl<S, A, N> Eq for BoundAction<S, A, N> {}

impl<S, A, N: Debug> Debug for BoundAction<S, A, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundAction")
            .field("name", &self.inner.name)
            .field("dispatcher", &self.inner.dispatcher)
            .finish()
    }
}
