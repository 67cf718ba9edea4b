//! Shared contract types for radixplan.
//!
//! This crate holds the handful of types that every other crate in the
//! workspace agrees on. It is `no_std` compatible.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`LaunchParams`] | Work-group size and transforms per group for one length |
//! | [`LaunchParamProvider`] | Pluggable per-length parameter lookup |
//! | [`PlanError`] | Precondition failures raised by the decision engine |
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to ensure
//! all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
mod provider;

pub use error::PlanError;
pub use provider::{LaunchParamProvider, LaunchParams};
