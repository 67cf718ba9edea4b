//! The supported radix primes and a compact set type over them.

use core::fmt;

/// Primes a transform length may be built from, largest first.
///
/// Factorization walks this order so large primes are detected before the
/// power of two absorbs the rest.
pub const SUPPORTED_PRIMES: [usize; 6] = [13, 11, 7, 5, 3, 2];

/// Set of supported primes, one bit per prime.
///
/// Used as the signature of a mixed-radix length: `2^a * 5^b` with `a, b > 0`
/// has signature `TWO | FIVE`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PrimeMask(u8);

impl PrimeMask {
  pub const NONE: Self = Self(0);
  pub const TWO: Self = Self(1 << 0);
  pub const THREE: Self = Self(1 << 1);
  pub const FIVE: Self = Self(1 << 2);
  pub const SEVEN: Self = Self(1 << 3);
  pub const ELEVEN: Self = Self(1 << 4);
  pub const THIRTEEN: Self = Self(1 << 5);

  /// Mask bit for a supported prime, `None` for anything else.
  #[must_use]
  pub const fn of_prime(prime: usize) -> Option<Self> {
    Some(match prime {
      2 => Self::TWO,
      3 => Self::THREE,
      5 => Self::FIVE,
      7 => Self::SEVEN,
      11 => Self::ELEVEN,
      13 => Self::THIRTEEN,
      _ => return None,
    })
  }

  #[inline]
  #[must_use]
  pub const fn bits(self) -> u8 {
    self.0
  }

  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  #[inline]
  #[must_use]
  pub const fn contains(self, prime: usize) -> bool {
    match Self::of_prime(prime) {
      Some(bit) => self.0 & bit.0 != 0,
      None => false,
    }
  }

  /// Number of distinct primes in the set.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Iterate the primes in the set, smallest first.
  pub fn primes(self) -> impl Iterator<Item = usize> {
    SUPPORTED_PRIMES.into_iter().rev().filter(move |&p| self.contains(p))
  }
}

impl core::ops::BitOr for PrimeMask {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for PrimeMask {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Debug for PrimeMask {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.primes()).finish()
  }
}

impl fmt::Display for PrimeMask {
  /// Renders as `2x3x5`, or `1` for the empty set.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str("1");
    }
    let mut first = true;
    for p in self.primes() {
      if !first {
        f.write_str("x")?;
      }
      write!(f, "{p}")?;
      first = false;
    }
    Ok(())
  }
}
