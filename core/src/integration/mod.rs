//! Integration tests for the prototype core
//!
//! Drive the full key → drawlist → backend path with a recording backend and
//! check the exact state transitions issued.

#[cfg(test)]
mod scenario_tests;
