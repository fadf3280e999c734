//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over a seeded registry
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod harness;
