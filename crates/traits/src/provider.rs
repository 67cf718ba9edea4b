//! Per-length launch parameters and the provider seam.
//!
//! The two-dimensional fusion search needs launch parameters for each
//! candidate length but must not care where they come from: the tuned table,
//! the factorization heuristic, or a test double. [`LaunchParamProvider`] is
//! that seam. Any `Fn(usize) -> Result<LaunchParams, PlanError>` is a provider.

use crate::PlanError;

/// Work-group shape chosen for one transform length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaunchParams {
  /// Threads per work group.
  pub work_group_size: usize,
  /// Independent transforms processed concurrently by one work group.
  pub transforms_per_group: usize,
}

impl LaunchParams {
  #[inline]
  #[must_use]
  pub const fn new(work_group_size: usize, transforms_per_group: usize) -> Self {
    Self {
      work_group_size,
      transforms_per_group,
    }
  }

  /// Complex elements each thread handles for a transform of `length`.
  ///
  /// Integer division, matching how kernels split a batch across a work
  /// group. `Some(0)` when the work group is larger than the batch; `None`
  /// when the work group is empty or the batch size overflows.
  #[inline]
  #[must_use]
  pub const fn elements_per_thread(&self, length: usize) -> Option<usize> {
    if self.work_group_size == 0 {
      return None;
    }
    match self.transforms_per_group.checked_mul(length) {
      Some(batch) => Some(batch / self.work_group_size),
      None => None,
    }
  }
}

impl core::fmt::Display for LaunchParams {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "wgs={} tpg={}", self.work_group_size, self.transforms_per_group)
  }
}

/// Source of launch parameters for a single transform length.
///
/// Implementations must be pure: identical lengths yield identical results.
pub trait LaunchParamProvider {
  /// Launch parameters for `length`, or the reason there are none.
  fn launch_params(&self, length: usize) -> Result<LaunchParams, PlanError>;
}

impl<F> LaunchParamProvider for F
where
  F: Fn(usize) -> Result<LaunchParams, PlanError>,
{
  #[inline]
  fn launch_params(&self, length: usize) -> Result<LaunchParams, PlanError> {
    self(length)
  }
}
