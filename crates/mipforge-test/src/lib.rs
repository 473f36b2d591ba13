//! Shared test fixtures for mipforge crates.
//!
//! - [`problems`] - small models with known optima
//! - [`knapsack`] - 0/1 knapsack builder for larger searches
//! - [`assert`] - feasibility checks for solution vectors
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! mipforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use mipforge_test::problems::textbook_mip;
//! use mipforge_test::assert::assert_feasible;
//! ```

pub mod assert;
pub mod knapsack;
pub mod problems;

pub use assert::{assert_feasible, assert_objective, FEASIBILITY_TOLERANCE};
pub use knapsack::{knapsack, medium_knapsack, small_knapsack};
pub use problems::{
    infeasible_lp, infeasible_mip, mixed_mip, textbook_mip, unbounded_lp,
};
