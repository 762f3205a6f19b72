// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod adapter_core;
pub mod dispatcher;
pub mod reducer;
pub mod reducer_adapter_impl;

// Re-export.
pub use adapter_core::*;
pub use dispatcher::*;
pub use reducer::*;
pub use reducer_adapter_impl::*;
