// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process wide, monotonically increasing identifiers. They are used as the "identity"
//! of adapters and observers, which is what the stability guarantees of
//! [`crate::Dispatcher`] and [`crate::BoundAction`] are expressed in terms of.

use std::{fmt::{Display, Formatter, Result},
          sync::atomic::{AtomicU64, Ordering}};

/// Identity of one [`crate::ReducerAdapter`], shared by every clone of its
/// [`crate::Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(u64);

/// Identity of one observer registered with a [`crate::DistributionCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

static ADAPTER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);
static OBSERVER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

impl AdapterId {
    pub(crate) fn generate() -> Self {
        Self(ADAPTER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn as_u64(&self) -> u64 { self.0 }
}

impl ObserverId {
    pub(crate) fn generate() -> Self {
        Self(OBSERVER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn as_u64(&self) -> u64 { self.0 }
}

impl Display for AdapterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "adapter#{}", self.0) }
}

impl Display for ObserverId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "observer#{}", self.0) }
}
