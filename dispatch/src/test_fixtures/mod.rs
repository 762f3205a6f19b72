// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod counter_fixture;

// Re-export.
pub use counter_fixture::*;
