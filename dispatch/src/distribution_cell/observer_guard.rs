// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [RAII] subscription guard for a [`crate::DistributionCell`]. See [`ObserverGuard`].
//!
//! [RAII]: https://en.wikipedia.org/wiki/Resource_acquisition_is_initialization

use crate::ObserverId;
use std::{fmt::{Debug, Formatter},
          sync::Weak};

/// Anything that an [`ObserverGuard`] can unsubscribe from.
pub(crate) trait ObserverRegistry: Send + Sync {
    fn remove_observer(&self, id: ObserverId);
    fn has_observer(&self, id: ObserverId) -> bool;
}

/// An [RAII] guard that keeps an observer subscribed to a [`crate::DistributionCell`].
///
/// # Drop Behavior
///
/// When this guard is dropped the observer is removed from the cell, so it is never
/// called again. If the cell is already torn down (its node was unmounted from the
/// [`crate::ScopeTree`]) there is nothing to do.
///
/// The guard only holds the cell weakly. Holding on to a guard does not keep a torn
/// down scope alive.
///
/// [RAII]: https://en.wikipedia.org/wiki/Resource_acquisition_is_initialization
#[must_use = "the observer is unsubscribed as soon as the guard is dropped"]
pub struct ObserverGuard {
    id: ObserverId,
    registry: Weak<dyn ObserverRegistry>,
}

impl ObserverGuard {
    pub(crate) fn new(id: ObserverId, registry: Weak<dyn ObserverRegistry>) -> Self {
        Self { id, registry }
    }

    pub fn id(&self) -> ObserverId { self.id }

    /// `false` once the cell this guard subscribed to has been torn down.
    pub fn is_attached(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.has_observer(self.id))
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_observer(self.id);
        }
    }
}

impl Debug for ObserverGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard")
            .field("id", &self.id)
            .field("is_attached", &self.is_attached())
            .finish()
    }
}
