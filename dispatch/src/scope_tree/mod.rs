// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod consumer;
pub mod node_id;
pub mod scope;
pub mod scope_tree_impl;

// Re-export.
pub use consumer::*;
pub use node_id::*;
pub use scope::*;
pub use scope_tree_impl::*;
