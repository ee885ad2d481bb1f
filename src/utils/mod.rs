//! Utility functions and helpers for headshot-forge.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret scrubbing for logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
