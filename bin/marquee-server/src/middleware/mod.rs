//! HTTP middleware stack.

pub mod cors;
pub mod loader;
pub mod trace;
