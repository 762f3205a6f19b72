// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod bound_action;

// Re-export.
pub use bound_action::*;
