// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors surfaced by the [`crate::ScopeTree`]. They derive [`miette::Diagnostic`] so they
//! can be propagated with `?` from any function that returns [`miette::Result`], and they
//! carry a stable diagnostic code and a hint on how to fix the call site.
//!
//! Note that a panic in a user supplied [`crate::Reducer`] is *not* represented here. It
//! propagates synchronously to the caller of [`crate::Dispatcher::dispatch()`], and is
//! never caught or retried.

use crate::NodeId;

/// Convenience type alias for results from [`crate::ScopeTree`] and friends.
pub type ScopeResult<T> = Result<T, ScopeError>;

#[derive(thiserror::Error, Debug, miette::Diagnostic, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// A read was attempted from a node that has no publisher for this state type in its
    /// ancestry (including itself).
    #[error("🔗 No scope for '{state_type}' is published at {node_id} or any of its ancestors")]
    #[diagnostic(
        code(r3bl_dispatch::unbound_scope),
        help("Call `publish_scope()` on this node, or on one of its ancestors, first")
    )]
    Unbound {
        node_id: NodeId,
        state_type: &'static str,
    },

    #[error("🔍 {node_id} is not mounted in this scope tree")]
    #[diagnostic(code(r3bl_dispatch::node_not_found))]
    NodeNotFound { node_id: NodeId },

    #[error("📦 A scope for '{state_type}' is already published at {node_id}")]
    #[diagnostic(
        code(r3bl_dispatch::already_published),
        help("Mount a child node and publish there to shadow the existing scope")
    )]
    AlreadyPublished {
        node_id: NodeId,
        state_type: &'static str,
    },

    #[error("🌳 The root {node_id} can't be unmounted")]
    #[diagnostic(code(r3bl_dispatch::cannot_unmount_root))]
    CannotUnmountRoot { node_id: NodeId },
}

impl ScopeError {
    pub(crate) fn unbound<S>(node_id: NodeId) -> Self {
        Self::Unbound {
            node_id,
            state_type: std::any::type_name::<S>(),
        }
    }

    pub(crate) fn already_published<S>(node_id: NodeId) -> Self {
        Self::AlreadyPublished {
            node_id,
            state_type: std::any::type_name::<S>(),
        }
    }
}
