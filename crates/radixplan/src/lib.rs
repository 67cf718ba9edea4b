//! Radix and launch-parameter planning for small-size GPU FFT kernels.
//!
//! `radixplan` decides how a one-dimensional transform of a given length is
//! launched: how many threads per work group and how many transforms each
//! group processes. It also lists the 2-D sizes small enough to run as one
//! fused kernel. Nothing here touches a device; every answer is a pure
//! function of the length, the precision and the device limits.
//!
//! # Quick Start
//!
//! ```
//! use radixplan::{LaunchPolicy, Precision, determine_launch_params, enumerate_fusion_pairs};
//!
//! // Factorization heuristic: 1024 is a power of two at the top tier.
//! let params = determine_launch_params(1024, 1024);
//! assert_eq!(params.work_group_size, 256);
//! assert_eq!(params.transforms_per_group, 1);
//!
//! // Tuned table first, heuristic for the rest.
//! let policy = LaunchPolicy::default();
//! let pairs = enumerate_fusion_pairs(65536, Precision::Single, &policy);
//! assert!(!pairs.is_empty());
//! ```
//!
//! # Checked and fail-fast forms
//!
//! Each lookup that can reject its input comes in two forms: `try_*` returns
//! [`PlanError`], the plain form panics with the same message. Use the
//! checked form whenever the length comes from outside the program.
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `traits` | [`LaunchParams`], [`LaunchParamProvider`], [`PlanError`] |
//! | `platform` | [`Precision`], [`DeviceLimits`], environment configuration |
//! | `tune` | the tuned small table, the block-compute table, heuristic rule tables |
//! | `backend` | factorization heuristic, [`LaunchPolicy`], fusion search |
//!
//! This crate adds the kernel-generation front end: [`request`],
//! [`catalog`], [`report`] and the `radixplan-gen` binary.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]

pub mod catalog;
pub mod report;
pub mod request;

pub use backend::{
  FusionCandidate, FusionSearch, Heuristic, LaunchPolicy, LengthFamily, ParamSource, PrimeFactorization,
  determine_launch_params, enumerate_fusion_pairs, try_determine_launch_params, try_enumerate_fusion_pairs,
};
pub use catalog::Catalog;
pub use platform::{DeviceLimits, LimitsKind, MAX_LDS_BYTES, MAX_WORK_GROUP_SIZE, Precision, config};
pub use report::{OutputFormat, Report};
pub use request::{GenerationRequest, KernelKinds, PrecisionSet, RequestError};
pub use traits::{LaunchParamProvider, LaunchParams, PlanError};
pub use tune::{BlockComputeEntry, RadixPlan};

// ─────────────────────────────────────────────────────────────────────────────
// Lookup surface
// ─────────────────────────────────────────────────────────────────────────────

/// Element width factor of `precision`: 1 for single, 2 for double.
#[inline]
#[must_use]
pub const fn resolve_width(precision: Precision) -> usize {
  precision.width()
}

/// Length at which a 1-D transform leaves the small-kernel regime:
/// `4096 / resolve_width(precision)`.
#[inline]
#[must_use]
pub const fn large_threshold(precision: Precision) -> usize {
  precision.large_1d_threshold()
}

/// The tuned small-size table, largest length first. Lookup by length is up
/// to the caller.
#[inline]
#[must_use]
pub fn lookup_small_table() -> &'static [RadixPlan] {
  tune::small_table()
}

/// `(block_width, work_group_size)` for a block-compute length.
///
/// # Errors
///
/// [`PlanError::NotInBlockTable`] for any length outside the closed table.
pub fn try_lookup_block_table(length: usize) -> Result<(usize, usize), PlanError> {
  tune::try_block_compute(length).map(|entry| (entry.block_width, entry.work_group_size))
}

/// `(block_width, work_group_size)` for a block-compute length.
///
/// # Panics
///
/// For any length outside the closed table.
#[must_use]
pub fn lookup_block_table(length: usize) -> (usize, usize) {
  match try_lookup_block_table(length) {
    Ok(found) => found,
    Err(err) => panic!("radixplan::lookup_block_table failed: {err}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn widths_and_thresholds() {
    assert_eq!(resolve_width(Precision::Single), 1);
    assert_eq!(resolve_width(Precision::Double), 2);
    assert_eq!(large_threshold(Precision::Single), 4096);
    assert_eq!(large_threshold(Precision::Double), 2048);
  }

  #[test]
  fn small_table_is_exposed_in_order() {
    let lengths: Vec<_> = lookup_small_table().iter().map(|plan| plan.length).collect();
    assert_eq!(lengths, [4096, 2048, 1024, 512, 256, 128, 64, 32, 16, 8, 4, 2]);
  }

  #[test]
  fn block_table() {
    assert_eq!(lookup_block_table(64), (16, 128));
    assert_eq!(lookup_block_table(200), (10, 100));
    assert_eq!(try_lookup_block_table(12), Err(PlanError::NotInBlockTable { length: 12 }));
  }

  #[test]
  #[should_panic(expected = "radixplan::lookup_block_table failed: length 12 has no block-compute entry")]
  fn block_table_rejects_unknown_lengths() {
    let _ = lookup_block_table(12);
  }
}
