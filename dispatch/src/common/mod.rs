// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod lock_ext;
pub mod scope_error;
pub mod unique_ids;

// Re-export.
pub use lock_ext::*;
pub use scope_error::*;
pub use unique_ids::*;
