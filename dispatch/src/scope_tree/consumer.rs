// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Action, DistributionCell, NodeId, ObserverGuard, ScopeError, ScopeResult,
            Snapshot, WeakCell, lock_ignoring_poison, try_lock_ignoring_poison};
use std::{fmt::{Debug, Formatter},
          sync::{Arc, Mutex,
                 atomic::{AtomicBool, Ordering}}};

type RenderFn<S, A, R> = Box<dyn FnMut(&Snapshot<S, A>) -> R + Send>;

/// A long lived reader of a scope, the equivalent of a descendant component that
/// re-renders whenever the nearest published scope changes.
///
/// Created by [`crate::ScopeTree::consume_scope()`], which renders once right away. After
/// that, the render function runs once per published snapshot (and never for a
/// deep-equal state), and on every [`Consumer::refresh()`]. The output of the last
/// render is available via [`Consumer::latest()`].
///
/// The consumer holds its scope weakly. Once the scope is torn down (its node was
/// unmounted, even while a [`crate::Scope`] handle is still held), it never renders
/// again and [`Consumer::refresh()`] reports [`ScopeError::Unbound`].
pub struct Consumer<S, A, R> {
    node_id: NodeId,
    shared: Arc<ConsumerShared<S, A, R>>,
    _guard: ObserverGuard,
}

struct ConsumerShared<S, A, R> {
    cell: WeakCell<S, A>,
    /// Set by anyone who wants a render, cleared by whoever holds `state` and renders.
    render_requested: AtomicBool,
    state: Mutex<ConsumerState<S, A, R>>,
}

struct ConsumerState<S, A, R> {
    render: RenderFn<S, A, R>,
    latest: R,
    render_count: usize,
}

impl<S, A, R> ConsumerShared<S, A, R>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    /// Render with the current snapshot of `cell`. If another caller is rendering right
    /// now (on this thread, from inside the render function, or on another thread), leave
    /// the request for it to pick up instead of blocking.
    fn request_render(&self, cell: &DistributionCell<S, A>) {
        self.render_requested.store(true, Ordering::SeqCst);

        while self.render_requested.load(Ordering::SeqCst) {
            let Some(mut state) = try_lock_ignoring_poison(&self.state) else {
                return;
            };
            while self.render_requested.swap(false, Ordering::SeqCst) {
                let snapshot = cell.snapshot();
                let latest = (state.render)(&*snapshot);
                state.latest = latest;
                state.render_count += 1;
            }
        }
    }
}

impl<S, A, R> Consumer<S, A, R>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
    R: Send + 'static,
{
    pub(crate) fn new(
        node_id: NodeId,
        cell: &Arc<DistributionCell<S, A>>,
        render: impl FnMut(&Snapshot<S, A>) -> R + Send + 'static,
    ) -> Self {
        let mut render: RenderFn<S, A, R> = Box::new(render);
        let initial = cell.snapshot();
        let latest = render(&*initial);

        let shared = Arc::new(ConsumerShared {
            cell: Arc::downgrade(cell),
            render_requested: AtomicBool::new(false),
            state: Mutex::new(ConsumerState {
                render,
                latest,
                render_count: 1,
            }),
        });

        let weak_shared = Arc::downgrade(&shared);
        let guard = cell.subscribe(move |_snapshot| {
            if let Some(shared) = weak_shared.upgrade()
                && let Some(cell) = shared.cell.upgrade()
            {
                shared.request_render(&cell);
            }
        });

        // The first render may have dispatched before the observer was in place.
        if cell.is_stale(&initial) {
            shared.request_render(cell);
        }

        Self {
            node_id,
            shared,
            _guard: guard,
        }
    }

    /// Render again with the current snapshot, without dispatching anything. Stands in
    /// for a re-render caused by something unrelated to the scope (eg: the consumer's
    /// own local state).
    pub fn refresh(&self) -> ScopeResult<()> {
        let cell = self
            .shared
            .cell
            .upgrade()
            .filter(|cell| !cell.is_torn_down())
            .ok_or_else(|| ScopeError::unbound::<S>(self.node_id))?;
        self.shared.request_render(&cell);
        Ok(())
    }

    /// `false` once the scope this consumer reads from has been torn down.
    pub fn is_bound(&self) -> bool {
        self.shared
            .cell
            .upgrade()
            .is_some_and(|cell| !cell.is_torn_down())
    }

    pub fn render_count(&self) -> usize {
        lock_ignoring_poison(&self.shared.state).render_count
    }

    /// The node this consumer was mounted at (not the node that published the scope).
    pub fn node_id(&self) -> NodeId { self.node_id }

    /// Output of the last render.
    pub fn latest(&self) -> R
    where
        R: Clone,
    {
        lock_ignoring_poison(&self.shared.state).latest.clone()
    }
}

impl<S, A, R: Debug> Debug for Consumer<S, A, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = lock_ignoring_poison(&self.shared.state);
        f.debug_struct("Consumer")
            .field("node_id", &self.node_id)
            .field("latest", &state.latest)
            .field("render_count", &state.render_count)
            .finish_non_exhaustive()
    }
}
