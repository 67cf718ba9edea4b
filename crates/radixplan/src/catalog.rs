//! Resolve a [`GenerationRequest`] into concrete kernel configurations.

use std::collections::BTreeSet;

use backend::{FusionCandidate, FusionSearch, LaunchPolicy, LengthFamily, ParamSource};
use platform::{DeviceLimits, Precision};
use traits::{LaunchParams, PlanError};
use tune::{BLOCK_TABLE, BlockComputeEntry, small_table, try_block_compute};

use crate::request::{GenerationRequest, KernelKinds};

/// Largest predefined small length.
pub const SMALL_POOL_LIMIT: usize = 4096;

/// Small lengths selected by `kinds`, ascending.
#[must_use]
pub fn small_pool(kinds: KernelKinds) -> BTreeSet<usize> {
  let mut pool = BTreeSet::new();
  if kinds.intersects(KernelKinds::POW2) {
    pool.extend(small_table().iter().map(|plan| plan.length));
  }
  let families: [(KernelKinds, &[usize]); 3] = [
    (KernelKinds::POW3, &[3]),
    (KernelKinds::POW5, &[5]),
    (KernelKinds::POW7, &[7, 11, 13]),
  ];
  for (kind, primes) in families {
    if kinds.intersects(kind) {
      for &prime in primes {
        pool.extend(powers_up_to(prime, SMALL_POOL_LIMIT));
      }
    }
  }
  pool
}

/// Block-compute lengths, ascending.
#[must_use]
pub fn large_pool() -> BTreeSet<usize> {
  BLOCK_TABLE.iter().map(|entry| entry.length).collect()
}

fn powers_up_to(base: usize, limit: usize) -> impl Iterator<Item = usize> {
  core::iter::successors(Some(base), move |&n| n.checked_mul(base)).take_while(move |&n| n <= limit)
}

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// One small (single-kernel) length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmallKernel {
  pub length: usize,
  pub family: LengthFamily,
  pub params: LaunchParams,
  pub source: ParamSource,
  /// Pass decomposition, when the tuned table lists one.
  pub radices: Option<&'static [usize]>,
}

/// One block-compute length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LargeKernel {
  pub entry: &'static BlockComputeEntry,
}

impl LargeKernel {
  #[inline]
  #[must_use]
  pub const fn length(&self) -> usize {
    self.entry.length
  }

  /// Shared memory one block occupies in `precision`.
  #[inline]
  #[must_use]
  pub const fn lds_bytes(&self, precision: Precision) -> usize {
    self.entry.lds_elements() * precision.complex_size_bytes()
  }
}

/// Fused 2-D sizes for one precision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FusionSet {
  pub precision: Precision,
  pub lds_bytes: usize,
  pub pairs: Vec<FusionCandidate>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// Every kernel configuration a request resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
  pub limits: DeviceLimits,
  pub group_num: usize,
  pub precisions: Vec<Precision>,
  pub small: Vec<SmallKernel>,
  pub large: Vec<LargeKernel>,
  pub fusion: Vec<FusionSet>,
}

impl Catalog {
  /// Resolve `request` against `limits`.
  ///
  /// Valid manual sizes replace the kind-derived selection of their pool.
  /// Call [`GenerationRequest::validate_against`] first so they are known.
  ///
  /// # Errors
  ///
  /// The first [`PlanError`] any selected length produces; for instance a
  /// work-group limit below 169 cannot host the fixed length-13 work group.
  pub fn build(request: &GenerationRequest, limits: &DeviceLimits) -> Result<Self, PlanError> {
    let policy = LaunchPolicy::new(limits);

    let small_lengths = if request.has_manual_small() {
      request.valid_manual_small().clone()
    } else {
      small_pool(request.kinds)
    };
    let small = small_lengths
      .into_iter()
      .map(|length| small_kernel(&policy, length))
      .collect::<Result<Vec<_>, _>>()?;

    let large_lengths = if request.has_manual_large() {
      request.valid_manual_large().clone()
    } else if request.has_kind(KernelKinds::LARGE) {
      large_pool()
    } else {
      BTreeSet::new()
    };
    let large = large_lengths
      .into_iter()
      .map(|length| try_block_compute(length).map(|entry| LargeKernel { entry }))
      .collect::<Result<Vec<_>, _>>()?;

    let precisions: Vec<Precision> = request.precisions.iter().collect();
    let fusion = if request.has_kind(KernelKinds::DIM2) {
      precisions
        .iter()
        .map(|&precision| {
          let search = FusionSearch::for_limits(limits, precision);
          search.try_run(&policy).map(|pairs| FusionSet {
            precision,
            lds_bytes: search.lds_bytes(),
            pairs,
          })
        })
        .collect::<Result<Vec<_>, _>>()?
    } else {
      Vec::new()
    };

    tracing::debug!(
      limits = %limits,
      small = small.len(),
      large = large.len(),
      fusion_sets = fusion.len(),
      "catalog built"
    );

    Ok(Self {
      limits: *limits,
      group_num: request.group_num,
      precisions,
      small,
      large,
      fusion,
    })
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.small.is_empty() && self.large.is_empty() && self.fusion.iter().all(|set| set.pairs.is_empty())
  }

  /// Total kernels across all sections, counting each fused pair per precision.
  #[must_use]
  pub fn kernel_count(&self) -> usize {
    self.small.len() + self.large.len() + self.fusion.iter().map(|set| set.pairs.len()).sum::<usize>()
  }
}

fn small_kernel(policy: &LaunchPolicy, length: usize) -> Result<SmallKernel, PlanError> {
  let family = LengthFamily::try_of(length)?;
  let (params, source) = policy.try_resolve(length)?;
  let radices = match source {
    ParamSource::Table => policy.table_plan(length).map(|plan| plan.passes()),
    ParamSource::Heuristic => None,
  };
  Ok(SmallKernel {
    length,
    family,
    params,
    source,
    radices,
  })
}
