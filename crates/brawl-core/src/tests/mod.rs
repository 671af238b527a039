//! Test module for determinism and integration tests.
//!
//! Unit tests live next to the code they cover; this module holds the tests
//! that exercise the engine as a whole:
//! - **Determinism tests**: Verify identical inputs produce identical runs
//! - **Integration tests**: Full match lifecycles, end to end
//! - **Helper functions**: Utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the match engine
//! - `helpers.rs`: Test setup utilities and factory functions

mod determinism;
mod helpers;
