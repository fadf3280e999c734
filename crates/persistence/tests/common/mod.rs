//! Test infrastructure for the persistence layer.
//!
//! Provides a backend-independent [`TestContext`], snapshot fixtures, and the
//! `backend_test!` macro that runs one test body against every enabled backend.

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
