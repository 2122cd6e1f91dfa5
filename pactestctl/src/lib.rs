//! Regression runner for the PAC test server.
//!
//! Test cases live in `*.test.csv` files. Each row names a wildcard over a
//! directory of PAC files, a destination host and source IP, and the proxy
//! the evaluating engines are expected to pick. [`runner::run`] replays every
//! case against a running server and tallies the per-engine verdicts.

/// Test-case CSV parsing.
pub mod cases;
/// Shell-style wildcard matching for the `file` column.
pub mod pattern;
/// Discovery, HTTP replay and verdicts.
pub mod runner;

pub use cases::{CaseError, TestCase};
pub use pattern::WildcardPattern;
pub use runner::{RunOptions, RunSummary, Verdict};
