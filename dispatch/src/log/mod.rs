// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for apps (and tests) that want to see what the dispatch bridge does.
//! Every module in this crate emits [`tracing`] events with structured fields, eg:
//! `adapter_id`, `action`, `scope`, `generation`. Nothing is printed unless a subscriber
//! is installed, eg: via [`try_initialize_logging_global()`].

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
