//! Two-dimensional single-kernel fusion search.
//!
//! A 2-D transform of `dim0 x dim1` can run as one kernel when both the data
//! and its twiddle scratch fit in shared memory and neither dimension's pass
//! needs a full work group of threads. The search walks nine family pairings
//! of powers of 2, 3 and 5, each from the largest size down:
//!
//! ```text
//! (2,2) (3,3) (5,5) (2,3) (3,2) (3,5) (5,3) (2,5) (5,2)
//! ```
//!
//! The output order is part of the contract: downstream generators emit
//! kernels in exactly this order.

use alloc::vec::Vec;
use core::{fmt, iter};

use platform::{DeviceLimits, MAX_WORK_GROUP_SIZE, Precision};
use traits::{LaunchParamProvider, PlanError};

// ─────────────────────────────────────────────────────────────────────────────
// Candidates
// ─────────────────────────────────────────────────────────────────────────────

/// A feasible fused 2-D size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FusionCandidate {
  pub dim0: usize,
  pub dim1: usize,
}

impl FusionCandidate {
  #[inline]
  #[must_use]
  pub const fn new(dim0: usize, dim1: usize) -> Self {
    Self { dim0, dim1 }
  }

  #[inline]
  #[must_use]
  pub const fn elements(&self) -> usize {
    self.dim0 * self.dim1
  }
}

impl fmt::Display for FusionCandidate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.dim0, self.dim1)
  }
}

/// Geometric range of sizes `base^k` within `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadixFamily {
  pub base: usize,
  pub min: usize,
  pub max: usize,
}

impl RadixFamily {
  pub const POW2: Self = Self::new(2, 4, 512);
  pub const POW3: Self = Self::new(3, 9, 729);
  pub const POW5: Self = Self::new(5, 25, 625);

  #[must_use]
  pub const fn new(base: usize, min: usize, max: usize) -> Self {
    Self { base, min, max }
  }

  /// Members from `max` down to `min`.
  pub fn descending(self) -> impl Iterator<Item = usize> {
    let Self { base, min, max } = self;
    iter::successors((base > 1 && max >= min).then_some(max), move |&n| {
      let next = n / base;
      (next >= min).then_some(next)
    })
  }
}

/// Family pairings in search order.
pub const FUSION_PASSES: [(RadixFamily, RadixFamily); 9] = {
  use RadixFamily as F;
  [
    (F::POW2, F::POW2),
    (F::POW3, F::POW3),
    (F::POW5, F::POW5),
    (F::POW2, F::POW3),
    (F::POW3, F::POW2),
    (F::POW3, F::POW5),
    (F::POW5, F::POW3),
    (F::POW2, F::POW5),
    (F::POW5, F::POW2),
  ]
};

// ─────────────────────────────────────────────────────────────────────────────
// Feasibility
// ─────────────────────────────────────────────────────────────────────────────

/// Shared memory a fused `dim0 x dim1` kernel needs: one complex element plus
/// one real twiddle scratch value per point. `None` when the byte count
/// overflows `usize`.
#[inline]
#[must_use]
pub const fn lds_bytes_required(dim0: usize, dim1: usize, precision: Precision) -> Option<usize> {
  let per_point = precision.complex_size_bytes() + precision.real_size_bytes();
  match dim0.checked_mul(dim1) {
    Some(points) => points.checked_mul(per_point),
    None => None,
  }
}

/// Threads the fused kernel needs: the larger of the two passes, where each
/// pass spreads `dim0 * dim1` points over its per-thread element count.
///
/// # Errors
///
/// Provider errors pass through. A point count that overflows `usize` yields
/// [`PlanError::DimensionOverflow`]. A provider whose parameters give no
/// usable per-thread element count yields [`PlanError::DegenerateLaunchParams`].
pub fn try_thread_count<P>(dim0: usize, dim1: usize, provider: &P) -> Result<usize, PlanError>
where
  P: LaunchParamProvider + ?Sized,
{
  let points = dim0.checked_mul(dim1).ok_or(PlanError::DimensionOverflow { dim0, dim1 })?;
  let mut threads = 0;
  for length in [dim0, dim1] {
    let params = provider.launch_params(length)?;
    let per_thread = match params.elements_per_thread(length) {
      Some(n) if n > 0 => n,
      _ => {
        return Err(PlanError::DegenerateLaunchParams {
          length,
          work_group_size: params.work_group_size,
          transforms_per_group: params.transforms_per_group,
        });
      }
    };
    threads = threads.max(points / per_thread);
  }
  Ok(threads)
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Configured fusion search.
///
/// ```
/// use backend::{FusionSearch, LaunchPolicy};
/// use platform::Precision;
///
/// let pairs = FusionSearch::new(0, Precision::Double).try_run(&LaunchPolicy::default())?;
/// assert!(pairs.iter().all(|p| p.elements() * 24 <= 65536));
/// # Ok::<(), backend::PlanError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FusionSearch {
  lds_bytes: usize,
  precision: Precision,
  max_threads: usize,
}

impl FusionSearch {
  /// Search against `lds_bytes` of shared memory (0 or anything above the
  /// hardware maximum means the maximum).
  #[must_use]
  pub const fn new(lds_bytes: usize, precision: Precision) -> Self {
    Self {
      lds_bytes: DeviceLimits::effective_lds_bytes(lds_bytes),
      precision,
      max_threads: MAX_WORK_GROUP_SIZE,
    }
  }

  /// Search within a device's limits.
  #[must_use]
  pub const fn for_limits(limits: &DeviceLimits, precision: Precision) -> Self {
    Self::new(limits.lds_bytes, precision).with_max_threads(limits.max_work_group_size)
  }

  /// Exclusive upper bound on the thread count of an accepted pair.
  #[must_use]
  pub const fn with_max_threads(mut self, max_threads: usize) -> Self {
    self.max_threads = max_threads;
    self
  }

  #[inline]
  #[must_use]
  pub const fn lds_bytes(&self) -> usize {
    self.lds_bytes
  }

  #[inline]
  #[must_use]
  pub const fn precision(&self) -> Precision {
    self.precision
  }

  #[inline]
  #[must_use]
  pub const fn max_threads(&self) -> usize {
    self.max_threads
  }

  /// Whether `dim0 x dim1` fits. Memory is checked first; the provider is
  /// only consulted for pairs that fit. A byte count that overflows never fits.
  pub fn try_accepts<P>(&self, dim0: usize, dim1: usize, provider: &P) -> Result<bool, PlanError>
  where
    P: LaunchParamProvider + ?Sized,
  {
    match lds_bytes_required(dim0, dim1, self.precision) {
      Some(bytes) if bytes <= self.lds_bytes => {}
      _ => return Ok(false),
    }
    Ok(try_thread_count(dim0, dim1, provider)? < self.max_threads)
  }

  /// All feasible pairs, in pass order.
  pub fn try_run<P>(&self, provider: &P) -> Result<Vec<FusionCandidate>, PlanError>
  where
    P: LaunchParamProvider + ?Sized,
  {
    let mut pairs = Vec::new();
    for (first, second) in FUSION_PASSES {
      for dim0 in first.descending() {
        for dim1 in second.descending() {
          if self.try_accepts(dim0, dim1, provider)? {
            pairs.push(FusionCandidate::new(dim0, dim1));
          }
        }
      }
    }

    tracing::debug!(
      precision = %self.precision,
      lds_bytes = self.lds_bytes,
      max_threads = self.max_threads,
      count = pairs.len(),
      "fusion search complete"
    );
    Ok(pairs)
  }

  /// # Panics
  ///
  /// On any error [`Self::try_run`] returns.
  #[must_use]
  pub fn run<P>(&self, provider: &P) -> Vec<FusionCandidate>
  where
    P: LaunchParamProvider + ?Sized,
  {
    match self.try_run(provider) {
      Ok(pairs) => pairs,
      Err(err) => panic!("backend::enumerate_fusion_pairs failed: {err}"),
    }
  }
}

/// Feasible 2-D fused sizes for a shared-memory budget, with the standard
/// 1024-thread bound.
pub fn try_enumerate_fusion_pairs<P>(
  lds_bytes: usize,
  precision: Precision,
  provider: &P,
) -> Result<Vec<FusionCandidate>, PlanError>
where
  P: LaunchParamProvider + ?Sized,
{
  FusionSearch::new(lds_bytes, precision).try_run(provider)
}

/// # Panics
///
/// When the provider fails for any candidate dimension.
#[must_use]
pub fn enumerate_fusion_pairs<P>(lds_bytes: usize, precision: Precision, provider: &P) -> Vec<FusionCandidate>
where
  P: LaunchParamProvider + ?Sized,
{
  FusionSearch::new(lds_bytes, precision).run(provider)
}
