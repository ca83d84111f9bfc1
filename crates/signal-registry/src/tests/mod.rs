//! Test module for signal-registry
//!
//! Scenario tests for registry teardown, re-entrant disconnects from inside
//! dispatch, and property-based tests using proptest.

#[cfg(test)]
pub mod support;


#[cfg(test)]
pub mod reentrancy_tests;
