//! Shared test support
//!
//! Builders and in-memory store bundles reused across the test suite.

#![allow(dead_code)]

pub mod fixtures;
