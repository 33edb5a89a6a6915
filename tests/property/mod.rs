//! Property-based tests for scan determinism and exclusion

mod determinism;
mod exclusion;
