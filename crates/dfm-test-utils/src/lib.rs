//! Testing utilities for the DFM intake workspace
//!
//! Shared fixtures for form, store and wizard tests.

#![allow(missing_docs)]

pub mod fixtures;
