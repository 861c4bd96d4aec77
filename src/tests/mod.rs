//! Crate-internal test suites
//!
//! - `common`: seeded RNGs, fixed clocks, sample characters, fake generators
//! - `unit`: behavior of the forge, fallback policy, exporter and runner
//! - `property`: invariants that must hold for every seed

mod common;
