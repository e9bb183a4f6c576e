//! Shared utilities for the Casino Admin workspace.

pub mod logging;
