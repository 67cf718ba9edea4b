//! Factorization heuristic for launch parameters.
//!
//! Used for every length the tuned table does not cover. The length is
//! factored over the supported primes and classified:
//!
//! | Family            | Rule                                                        |
//! |-------------------|-------------------------------------------------------------|
//! | 1                 | fixed (64, 64)                                              |
//! | `2^k`             | tiered by magnitude                                         |
//! | `p^k`, odd `p`    | [`PrimePowerRule`] for `p`                                  |
//! | mixed             | [`CompositeRule`] by signature, then a per-item search      |
//!
//! The result never exceeds the caller's work-group limit; when a rule
//! cannot honour it the call fails with [`PlanError::WorkGroupOverflow`].

use platform::{DeviceLimits, MIN_WORK_GROUP_LIMIT};
use traits::{LaunchParamProvider, LaunchParams, PlanError};
use tune::{CompositeRule, PrimeMask, PrimePowerRule, SUPPORTED_PRIMES};

use crate::{factor::PrimeFactorization, family::LengthFamily};

/// Launch parameters for length 1.
pub const UNIT_LAUNCH: LaunchParams = LaunchParams::new(64, 64);

/// Work group used by small powers of two.
const POW2_WORK_GROUP: usize = 64;
/// Cap on the work group for powers of two at or above 1024.
const POW2_LARGE_WORK_GROUP_CAP: usize = 256;

/// Launch parameters for `length` on a device allowing `max_work_group_size`
/// threads per group.
///
/// # Errors
///
/// - [`PlanError::WorkGroupLimitTooSmall`] if `max_work_group_size < 64`.
/// - [`PlanError::ZeroLength`] / [`PlanError::UnsupportedLength`] from factorization.
/// - [`PlanError::LeastElementsNotDivisor`] when the selected composite rule
///   does not divide the length (the catch-all rule on unusual signatures).
/// - [`PlanError::WorkGroupOverflow`] when the rule's work group exceeds the limit.
pub fn try_determine_launch_params(length: usize, max_work_group_size: usize) -> Result<LaunchParams, PlanError> {
  if max_work_group_size < MIN_WORK_GROUP_LIMIT {
    return Err(PlanError::WorkGroupLimitTooSmall {
      max: max_work_group_size,
    });
  }

  let factors = PrimeFactorization::try_new(length)?;
  let family = LengthFamily::classify(&factors);
  let params = match family {
    LengthFamily::Unit => UNIT_LAUNCH,
    LengthFamily::PrimePower { prime: 2 } => power_of_two(length, max_work_group_size),
    LengthFamily::PrimePower { prime } => odd_prime_power(length, prime, max_work_group_size)?,
    LengthFamily::Composite { signature } => composite(length, signature, max_work_group_size)?,
  };

  if params.work_group_size > max_work_group_size {
    return Err(PlanError::WorkGroupOverflow {
      length,
      work_group_size: params.work_group_size,
      max: max_work_group_size,
    });
  }

  tracing::trace!(
    length,
    max_work_group_size,
    %family,
    work_group_size = params.work_group_size,
    transforms_per_group = params.transforms_per_group,
    "heuristic launch params"
  );
  Ok(params)
}

/// Launch parameters for `length`, panicking on unsupported input.
///
/// # Panics
///
/// On any error [`try_determine_launch_params`] returns.
#[must_use]
pub fn determine_launch_params(length: usize, max_work_group_size: usize) -> LaunchParams {
  match try_determine_launch_params(length, max_work_group_size) {
    Ok(params) => params,
    Err(err) => panic!("backend::determine_launch_params failed: {err}"),
  }
}

fn power_of_two(length: usize, max_work_group_size: usize) -> LaunchParams {
  if length >= 1024 {
    LaunchParams::new(max_work_group_size.min(POW2_LARGE_WORK_GROUP_CAP), 1)
  } else if length == 512 {
    LaunchParams::new(POW2_WORK_GROUP, 1)
  } else if length >= 16 {
    LaunchParams::new(POW2_WORK_GROUP, 256 / length)
  } else {
    LaunchParams::new(POW2_WORK_GROUP, 128 / length)
  }
}

fn odd_prime_power(length: usize, prime: usize, max_work_group_size: usize) -> Result<LaunchParams, PlanError> {
  let rule = PrimePowerRule::for_prime(prime).ok_or(PlanError::UnsupportedLength { length, residue: prime })?;
  let work_group_size = rule.work_group_size(max_work_group_size);
  Ok(LaunchParams::new(
    work_group_size,
    rule.transforms_per_group(length, work_group_size),
  ))
}

fn composite(length: usize, signature: PrimeMask, max_work_group_size: usize) -> Result<LaunchParams, PlanError> {
  let rule = CompositeRule::select(signature, length);
  let least = rule.least_elements_per_item;
  if least == 0 || length % least != 0 {
    return Err(PlanError::LeastElementsNotDivisor { length, least });
  }
  let group_limit = rule.max_work_group_size.min(max_work_group_size);
  let threads = threads_per_transform(length, least, max_work_group_size)?;
  let transforms_per_group = (group_limit / threads).max(1);

  Ok(LaunchParams::new(transforms_per_group * threads, transforms_per_group))
}

/// Threads per transform for a composite length split into items of at least
/// `least` elements.
///
/// Items hold `least * k` elements for some divisor `k` of `length / least`,
/// so the thread count is the complementary divisor. The smallest item that
/// fits the limit gives the largest such divisor not above it.
fn threads_per_transform(length: usize, least: usize, max_work_group_size: usize) -> Result<usize, PlanError> {
  let quotient = PrimeFactorization::try_new(length / least)?;
  let mut powers = [(1, 1); SUPPORTED_PRIMES.len()];
  for (slot, pair) in powers.iter_mut().zip(quotient.iter()) {
    *slot = pair;
  }
  Ok(largest_divisor_at_most(&powers, 1, max_work_group_size))
}

/// Largest `acc * d` not above `limit`, where `d` divides the product of
/// the `(prime, prime power)` pairs. `acc` must not exceed `limit`.
fn largest_divisor_at_most(powers: &[(usize, usize)], acc: usize, limit: usize) -> usize {
  let Some((&(prime, power), rest)) = powers.split_first() else {
    return acc;
  };
  let mut best = 0;
  let mut divisor = acc;
  let mut used = 1;
  loop {
    best = best.max(largest_divisor_at_most(rest, divisor, limit));
    if used >= power {
      break best;
    }
    match divisor.checked_mul(prime) {
      Some(next) if next <= limit => {
        divisor = next;
        used *= prime;
      }
      _ => break best,
    }
  }
}

/// Heuristic-only [`LaunchParamProvider`], bypassing the tuned table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heuristic {
  pub max_work_group_size: usize,
}

impl Heuristic {
  #[inline]
  #[must_use]
  pub const fn new(limits: &DeviceLimits) -> Self {
    Self {
      max_work_group_size: limits.max_work_group_size,
    }
  }
}

impl LaunchParamProvider for Heuristic {
  #[inline]
  fn launch_params(&self, length: usize) -> Result<LaunchParams, PlanError> {
    try_determine_launch_params(length, self.max_work_group_size)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(length: usize, max: usize) -> (usize, usize) {
    let p = determine_launch_params(length, max);
    (p.work_group_size, p.transforms_per_group)
  }

  #[test]
  fn unit_length_ignores_limit() {
    for max in [64, 100, 256, 1024] {
      assert_eq!(params(1, max), (64, 64));
    }
  }

  #[test]
  fn powers_of_two() {
    assert_eq!(params(1024, 1024), (256, 1));
    assert_eq!(params(8192, 128), (128, 1));
    assert_eq!(params(512, 1024), (64, 1));
    assert_eq!(params(256, 1024), (64, 1));
    assert_eq!(params(32, 1024), (64, 8));
    assert_eq!(params(16, 1024), (64, 16));
    assert_eq!(params(8, 1024), (64, 16));
    assert_eq!(params(2, 1024), (64, 64));
  }

  #[test]
  fn odd_prime_powers() {
    assert_eq!(params(729, 1024), (243, 1));
    assert_eq!(params(27, 1024), (243, 27));
    assert_eq!(params(27, 128), (27, 3));
    assert_eq!(params(125, 1024), (125, 5));
    assert_eq!(params(625, 64), (25, 1));
    assert_eq!(params(49, 1024), (49, 7));
    assert_eq!(params(121, 1024), (121, 11));
    assert_eq!(params(13, 1024), (169, 169));
  }

  #[test]
  fn twelve_uses_the_two_three_rule() {
    // least = 12 divides 12, one thread per transform, 128 transforms.
    assert_eq!(params(12, 1024), (128, 128));
    assert_eq!(params(12, 64), (64, 64));
  }

  #[test]
  fn composite_rows() {
    // 2x3x5: least 30, ceiling 64. Two threads per transform for 60.
    assert_eq!(params(60, 1024), (64, 32));
    // 6000 needs 200 threads per transform, past the ceiling: one per group.
    assert_eq!(params(6000, 1024), (200, 1));
    // 100 is excluded from the 20/64 row: least 10, ceiling 128.
    assert_eq!(params(100, 1024), (120, 12));
    assert_eq!(params(40, 1024), (64, 32));
    // 2x7: least 14, ceiling 64.
    assert_eq!(params(28, 1024), (64, 32));
  }

  /// Reference: walk multiples of `least` upward until the thread count fits.
  fn stepwise_threads(length: usize, least: usize, max: usize) -> usize {
    let per_item = (least..=length)
      .step_by(least)
      .find(|&n| length % n == 0 && length / n <= max)
      .unwrap();
    length / per_item
  }

  #[test]
  fn divisor_search_matches_stepwise_walk() {
    let leasts = [6, 10, 12, 14, 15, 20, 21, 22, 26, 30, 35, 42, 70, 105, 210];
    for length in 1..=6000usize {
      if PrimeFactorization::try_new(length).is_err() {
        continue;
      }
      for least in leasts.iter().copied().filter(|l| length % l == 0) {
        for max in [64, 100, 256, 1024] {
          assert_eq!(
            threads_per_transform(length, least, max),
            Ok(stepwise_threads(length, least, max)),
            "length {length} least {least} max {max}"
          );
        }
      }
    }
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn huge_composite_lengths_resolve() {
    // 2^50 * 3: least 12, quotient 2^48, so 1024 threads of 2^40 * 3 elements.
    assert_eq!(params(3 << 50, 1024), (1024, 1));
    assert_eq!(params(3 << 50, 100), (64, 1));
    let p = determine_launch_params(2usize.pow(30) * 3usize.pow(10) * 5usize.pow(5), 1024);
    assert!(p.work_group_size <= 1024);
  }

  #[test]
  fn catch_all_rule() {
    assert_eq!(params(210, 1024), (12, 12));
    assert_eq!(
      try_determine_launch_params(33, 1024),
      Err(PlanError::LeastElementsNotDivisor { length: 33, least: 210 })
    );
  }

  #[test]
  fn fixed_work_groups_can_overflow() {
    assert_eq!(
      try_determine_launch_params(13, 128),
      Err(PlanError::WorkGroupOverflow {
        length: 13,
        work_group_size: 169,
        max: 128
      })
    );
  }

  #[test]
  fn limit_below_minimum() {
    assert_eq!(
      try_determine_launch_params(1, 32),
      Err(PlanError::WorkGroupLimitTooSmall { max: 32 })
    );
  }

  #[test]
  #[should_panic(expected = "backend::determine_launch_params failed: unsupported length 17")]
  fn unsupported_prime_panics() {
    let _ = determine_launch_params(17, 1024);
  }

  #[test]
  fn heuristic_provider() {
    let h = Heuristic::new(&DeviceLimits::DEFAULT);
    assert_eq!(h.launch_params(8), Ok(LaunchParams::new(64, 16)));
  }
}
