//! Common test utilities for video-dl end-to-end tests

#[allow(dead_code)]
pub mod assertions;
#[allow(dead_code)]
pub mod worker;

#[allow(unused_imports)]
pub use assertions::*;
pub use worker::*;
