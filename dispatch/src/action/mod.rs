// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod action_types;
pub mod define_actions_macro;

// Re-export.
pub use action_types::*;
