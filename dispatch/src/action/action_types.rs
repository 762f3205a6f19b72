// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The two traits that describe a domain's actions.
//!
//! 1. [`Action`] is implemented by the domain's action *enum* (a discriminated union).
//!    This is the canonical action object that a [`crate::Reducer`] receives. It is
//!    either a bare name (unit variant) or a name plus a payload (tuple variant).
//! 2. [`ActionName`] is implemented by one zero-sized *tag marker* per variant. The tag
//!    marker declares the payload type of its variant (`()` when there is none), which
//!    is what lets [`crate::Dispatcher::invoke()`] and
//!    [`crate::Dispatcher::invoke_with()`] check payloads at compile time.
//!
//! You rarely implement these by hand, see [`crate::define_actions!`].
//!
//! Whether a payload is present is decided by the tag's declared shape, never by the
//! value of the payload. So `invoke_with(AddValue, 0)` delivers `AddValue(0)`.

/// The canonical action object for a domain. It is constructed fresh for every dispatch,
/// and moved into the reducer (it is never shared).
pub trait Action: Send + 'static {
    /// Name of the action's tag, eg: `"AddValue"`.
    fn name(&self) -> &'static str;

    /// `true` if this tag declares a payload.
    fn has_payload(&self) -> bool;
}

/// A typed name for one of the tags of the action type `A`.
///
/// The associated [`ActionName::Payload`] type is the mapping from tag to payload type
/// that is declared once per domain.
pub trait ActionName<A>: Copy + Send + Sync + 'static
where
    A: Action,
{
    /// The payload carried by this tag. `()` for tags without a payload.
    type Payload: Send + 'static;

    /// Name of the tag, matches [`Action::name()`] of the action it builds.
    const NAME: &'static str;

    /// Build the canonical action for this tag.
    fn into_action(self, payload: Self::Payload) -> A;
}
