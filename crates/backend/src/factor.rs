//! Factorization over the supported radix primes.

use traits::PlanError;
use tune::{PrimeMask, SUPPORTED_PRIMES};

/// A length split into the full power of each supported prime dividing it.
///
/// For 24: 2 maps to 8, 3 maps to 3, every other prime maps to 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimeFactorization {
  length: usize,
  /// Aligned with [`SUPPORTED_PRIMES`].
  powers: [usize; SUPPORTED_PRIMES.len()],
}

impl PrimeFactorization {
  /// Factor `length`.
  ///
  /// Fails when `length` is zero or has a prime factor outside
  /// [`SUPPORTED_PRIMES`]; the error carries the unfactored remainder.
  pub fn try_new(length: usize) -> Result<Self, PlanError> {
    if length == 0 {
      return Err(PlanError::ZeroLength);
    }

    let mut rest = length;
    let mut powers = [1; SUPPORTED_PRIMES.len()];
    for (power, &prime) in powers.iter_mut().zip(SUPPORTED_PRIMES.iter()) {
      while rest % prime == 0 {
        rest /= prime;
        *power *= prime;
      }
    }

    if rest != 1 {
      return Err(PlanError::UnsupportedLength { length, residue: rest });
    }
    Ok(Self { length, powers })
  }

  #[inline]
  #[must_use]
  pub const fn length(&self) -> usize {
    self.length
  }

  /// Largest power of `prime` dividing the length (1 if none, or if `prime`
  /// is not supported).
  #[must_use]
  pub fn power_of(&self, prime: usize) -> usize {
    self.iter().find(|&(p, _)| p == prime).map_or(1, |(_, power)| power)
  }

  /// `(prime, power)` for every supported prime, largest prime first.
  pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
    SUPPORTED_PRIMES.iter().copied().zip(self.powers.iter().copied())
  }

  /// Primes that actually divide the length.
  #[must_use]
  pub fn signature(&self) -> PrimeMask {
    self
      .iter()
      .filter(|&(_, power)| power > 1)
      .filter_map(|(prime, _)| PrimeMask::of_prime(prime))
      .fold(PrimeMask::NONE, PrimeMask::union)
  }

  /// The prime when the length is a pure power of it (`prime^k`, `k >= 1`).
  #[must_use]
  pub fn pure_prime(&self) -> Option<usize> {
    if self.length == 1 {
      return None;
    }
    self.iter().find(|&(_, power)| power == self.length).map(|(prime, _)| prime)
  }
}
