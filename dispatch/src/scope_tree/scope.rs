// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Action, DistributionCell, Dispatcher, NodeId, ObserverGuard,
            SharedSnapshot, Snapshot};
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// A handle to a scope published at one node of a [`crate::ScopeTree`], returned by
/// [`crate::ScopeTree::publish_scope()`].
///
/// Holding a `Scope` keeps its [`DistributionCell`] alive, even after the node is
/// unmounted. Descendants can't find it in the tree anymore at that point.
pub struct Scope<S, A> {
    node_id: NodeId,
    cell: Arc<DistributionCell<S, A>>,
}

impl<S, A> Scope<S, A>
where
    S: PartialEq + Send + Sync + 'static,
    A: Action,
{
    pub(crate) fn new(node_id: NodeId, cell: Arc<DistributionCell<S, A>>) -> Self {
        Self { node_id, cell }
    }

    /// The node this scope was published at.
    pub fn node_id(&self) -> NodeId { self.node_id }

    pub fn read(&self) -> SharedSnapshot<S, A> { self.cell.snapshot() }

    pub fn read_with_callback<R>(&self, render: impl FnOnce(&Snapshot<S, A>) -> R) -> R {
        render(&*self.cell.snapshot())
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, A> { self.cell.dispatcher() }

    pub fn subscribe(
        &self,
        observer: impl FnMut(&SharedSnapshot<S, A>) + Send + 'static,
    ) -> ObserverGuard {
        self.cell.subscribe(observer)
    }

    pub fn cell(&self) -> &Arc<DistributionCell<S, A>> { &self.cell }
}

impl<S, A> Clone for Scope<S, A> {
    fn clone(&self) -> Self {
        Self {
            node_id: self.node_id,
            cell: self.cell.clone(),
        }
    }
}

impl<S, A> Debug for Scope<S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("node_id", &self.node_id)
            .field("cell", &self.cell)
            .finish()
    }
}
