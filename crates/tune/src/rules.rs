//! Rule tables for the factorization heuristic.
//!
//! Lengths missing from the small table are classified by their prime
//! signature. Pure prime powers pick a work-group size from
//! [`PRIME_POWER_RULES`] (powers of two are tiered in code, see
//! `backend::heuristic`). Mixed-radix lengths pick a minimum per-work-item
//! element count and a work-group ceiling from [`COMPOSITE_RULES`]; the first
//! matching row wins and [`FALLBACK_RULE`] covers every other signature.

use crate::primes::PrimeMask;

// ─────────────────────────────────────────────────────────────────────────────
// Pure prime powers
// ─────────────────────────────────────────────────────────────────────────────

/// Work-group choice for lengths `prime^k`, `k >= 1`, `prime != 2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimePowerRule {
  pub prime: usize,
  /// Work group used when the device allows at least `preferred_min_limit` threads.
  pub preferred_work_group_size: usize,
  pub preferred_min_limit: usize,
  /// Work group used on devices with a smaller limit.
  pub fallback_work_group_size: usize,
}

impl PrimePowerRule {
  const fn new(prime: usize, preferred: usize, min_limit: usize, fallback: usize) -> Self {
    Self {
      prime,
      preferred_work_group_size: preferred,
      preferred_min_limit: min_limit,
      fallback_work_group_size: fallback,
    }
  }

  #[inline]
  #[must_use]
  pub const fn work_group_size(&self, max_work_group_size: usize) -> usize {
    if max_work_group_size >= self.preferred_min_limit {
      self.preferred_work_group_size
    } else {
      self.fallback_work_group_size
    }
  }

  /// Transforms per group: enough to keep `prime * work_group_size`
  /// elements in flight, never fewer than one.
  #[inline]
  #[must_use]
  pub const fn transforms_per_group(&self, length: usize, work_group_size: usize) -> usize {
    let span = self.prime * work_group_size;
    if length >= span { 1 } else { span / length }
  }

  #[must_use]
  pub fn for_prime(prime: usize) -> Option<&'static Self> {
    PRIME_POWER_RULES.iter().find(|r| r.prime == prime)
  }
}

/// Odd prime-power rules. The work groups are the largest power of the
/// prime that fits a typical limit, so every thread handles whole butterflies.
pub static PRIME_POWER_RULES: [PrimePowerRule; 5] = [
  PrimePowerRule::new(3, 243, 256, 27),
  PrimePowerRule::new(5, 125, 128, 25),
  PrimePowerRule::new(7, 49, 0, 49),
  PrimePowerRule::new(11, 121, 0, 121),
  PrimePowerRule::new(13, 169, 0, 169),
];

// ─────────────────────────────────────────────────────────────────────────────
// Mixed-radix families
// ─────────────────────────────────────────────────────────────────────────────

/// Extra predicate a composite row may require of the length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCondition {
  Always,
  DivisibleBy(usize),
  /// Divisible by `divisor` and not equal to `except`.
  DivisibleByExcept { divisor: usize, except: usize },
}

impl RuleCondition {
  #[inline]
  #[must_use]
  pub const fn holds(self, length: usize) -> bool {
    match self {
      Self::Always => true,
      Self::DivisibleBy(d) => d != 0 && length % d == 0,
      Self::DivisibleByExcept { divisor, except } => divisor != 0 && length % divisor == 0 && length != except,
    }
  }
}

/// Tuning for one mixed-radix family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeRule {
  /// Exact set of primes the length must contain.
  pub signature: PrimeMask,
  pub condition: RuleCondition,
  /// Smallest element count one work item processes.
  pub least_elements_per_item: usize,
  /// Work-group ceiling before the device limit is applied.
  pub max_work_group_size: usize,
}

impl CompositeRule {
  const fn new(signature: PrimeMask, condition: RuleCondition, least: usize, max_wgs: usize) -> Self {
    Self {
      signature,
      condition,
      least_elements_per_item: least,
      max_work_group_size: max_wgs,
    }
  }

  #[inline]
  #[must_use]
  pub const fn matches(&self, signature: PrimeMask, length: usize) -> bool {
    self.signature.bits() == signature.bits() && self.condition.holds(length)
  }

  /// The first row matching `signature` and `length`, or [`FALLBACK_RULE`].
  #[must_use]
  pub fn select(signature: PrimeMask, length: usize) -> &'static Self {
    COMPOSITE_RULES
      .iter()
      .find(|r| r.matches(signature, length))
      .unwrap_or(&FALLBACK_RULE)
  }
}

const fn sig2(a: PrimeMask, b: PrimeMask) -> PrimeMask {
  a.union(b)
}

const fn sig3(a: PrimeMask, b: PrimeMask, c: PrimeMask) -> PrimeMask {
  a.union(b).union(c)
}

/// Composite families, most specific row first within a signature.
pub static COMPOSITE_RULES: [CompositeRule; 14] = {
  use PrimeMask as P;
  use RuleCondition::{Always, DivisibleBy, DivisibleByExcept};
  [
    CompositeRule::new(sig2(P::TWO, P::THREE), DivisibleBy(12), 12, 128),
    CompositeRule::new(sig2(P::TWO, P::THREE), Always, 6, 256),
    // 20/64 measured faster than 10/128 for single precision in most 2x5
    // sizes (200, 800 out-of-place with large batches), but not for 100.
    CompositeRule::new(sig2(P::TWO, P::FIVE), DivisibleByExcept { divisor: 20, except: 100 }, 20, 64),
    CompositeRule::new(sig2(P::TWO, P::FIVE), Always, 10, 128),
    CompositeRule::new(sig2(P::TWO, P::SEVEN), Always, 14, 64),
    CompositeRule::new(sig2(P::THREE, P::FIVE), Always, 15, 128),
    CompositeRule::new(sig2(P::THREE, P::SEVEN), Always, 21, 128),
    CompositeRule::new(sig2(P::FIVE, P::SEVEN), Always, 35, 64),
    CompositeRule::new(sig3(P::TWO, P::THREE, P::FIVE), Always, 30, 64),
    CompositeRule::new(sig3(P::TWO, P::THREE, P::SEVEN), Always, 42, 60),
    CompositeRule::new(sig3(P::TWO, P::FIVE, P::SEVEN), Always, 70, 36),
    CompositeRule::new(sig3(P::THREE, P::FIVE, P::SEVEN), Always, 105, 24),
    CompositeRule::new(sig2(P::TWO, P::ELEVEN), Always, 22, 128),
    CompositeRule::new(sig2(P::TWO, P::THIRTEEN), Always, 26, 128),
  ]
};

/// Row used for any signature without a dedicated entry.
pub static FALLBACK_RULE: CompositeRule = CompositeRule::new(PrimeMask::NONE, RuleCondition::Always, 210, 12);

#[cfg(test)]
mod tests {
  use super::{PrimeMask as P, *};

  #[test]
  fn prime_power_work_groups() {
    let three = PrimePowerRule::for_prime(3).unwrap();
    assert_eq!(three.work_group_size(1024), 243);
    assert_eq!(three.work_group_size(256), 243);
    assert_eq!(three.work_group_size(255), 27);

    let five = PrimePowerRule::for_prime(5).unwrap();
    assert_eq!(five.work_group_size(128), 125);
    assert_eq!(five.work_group_size(64), 25);

    assert_eq!(PrimePowerRule::for_prime(13).unwrap().work_group_size(64), 169);
    assert!(PrimePowerRule::for_prime(2).is_none());
  }

  #[test]
  fn prime_power_transforms() {
    let three = PrimePowerRule::for_prime(3).unwrap();
    // 3 * 243 = 729: anything at least that long runs one per group.
    assert_eq!(three.transforms_per_group(729, 243), 1);
    assert_eq!(three.transforms_per_group(2187, 243), 1);
    assert_eq!(three.transforms_per_group(81, 243), 9);
    assert_eq!(three.transforms_per_group(9, 243), 81);
  }

  #[test]
  fn prime_power_work_groups_are_powers_of_their_prime() {
    for rule in &PRIME_POWER_RULES {
      for wgs in [rule.preferred_work_group_size, rule.fallback_work_group_size] {
        let mut n = wgs;
        while n % rule.prime == 0 {
          n /= rule.prime;
        }
        assert_eq!(n, 1, "prime {} wgs {}", rule.prime, wgs);
      }
    }
  }

  #[test]
  fn conditions() {
    assert!(RuleCondition::Always.holds(7));
    assert!(RuleCondition::DivisibleBy(12).holds(24));
    assert!(!RuleCondition::DivisibleBy(12).holds(18));
    assert!(!RuleCondition::DivisibleBy(0).holds(18));
    let c = RuleCondition::DivisibleByExcept { divisor: 20, except: 100 };
    assert!(c.holds(200));
    assert!(!c.holds(100));
    assert!(!c.holds(50));
  }

  #[test]
  fn select_two_three_family() {
    let sig = P::TWO | P::THREE;
    assert_eq!(CompositeRule::select(sig, 12).least_elements_per_item, 12);
    assert_eq!(CompositeRule::select(sig, 12).max_work_group_size, 128);
    assert_eq!(CompositeRule::select(sig, 18).least_elements_per_item, 6);
    assert_eq!(CompositeRule::select(sig, 18).max_work_group_size, 256);
  }

  #[test]
  fn select_two_five_override() {
    let sig = P::TWO | P::FIVE;
    assert_eq!(CompositeRule::select(sig, 200).least_elements_per_item, 20);
    assert_eq!(CompositeRule::select(sig, 100).least_elements_per_item, 10);
    assert_eq!(CompositeRule::select(sig, 50).least_elements_per_item, 10);
  }

  #[test]
  fn signature_must_match_exactly() {
    // 2x3x5 must not pick the 2x3 row.
    let rule = CompositeRule::select(P::TWO | P::THREE | P::FIVE, 60);
    assert_eq!(rule.least_elements_per_item, 30);
    // 2x3x5x7 has no row of its own.
    assert_eq!(CompositeRule::select(P::TWO | P::THREE | P::FIVE | P::SEVEN, 210), &FALLBACK_RULE);
    assert_eq!(CompositeRule::select(P::THREE | P::ELEVEN, 33), &FALLBACK_RULE);
  }

  #[test]
  fn least_elements_cover_their_signature() {
    for rule in &COMPOSITE_RULES {
      for p in rule.signature.primes() {
        assert_eq!(rule.least_elements_per_item % p, 0, "{:?}", rule);
      }
      assert!(rule.max_work_group_size > 0);
    }
  }
}
