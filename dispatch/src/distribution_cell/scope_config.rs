// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// When a [`crate::DistributionCell`] publishes a new snapshot after a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RepublishPolicy {
    /// Only when the new state is not deep-equal ([`PartialEq`]) to the published one.
    #[default]
    DeepEqual,
    /// After every dispatch, even when nothing changed. Observers are notified every
    /// time. Useful to compare against [`RepublishPolicy::DeepEqual`] when diagnosing
    /// how many notifications deep equality saves.
    Always,
}

/// Configuration for one published scope.
///
/// ```
/// use r3bl_dispatch::{RepublishPolicy, ScopeConfig};
///
/// let config = ScopeConfig::default()
///     .with_label("settings")
///     .with_republish_policy(RepublishPolicy::Always);
/// assert_eq!(config.label.as_deref(), Some("settings"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeConfig {
    /// Shows up in the `scope` field of this scope's tracing events.
    pub label: Option<String>,
    pub republish_policy: RepublishPolicy,
}

impl ScopeConfig {
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_republish_policy(mut self, republish_policy: RepublishPolicy) -> Self {
        self.republish_policy = republish_policy;
        self
    }

    pub(crate) fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("unlabeled")
    }
}
