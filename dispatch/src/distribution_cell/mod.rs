// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod cell;
pub mod deep_eq_memo;
pub mod observer_guard;
pub mod scope_config;
pub mod snapshot;

// Re-export.
pub use cell::*;
pub use deep_eq_memo::*;
pub use observer_guard::*;
pub use scope_config::*;
pub use snapshot::*;
