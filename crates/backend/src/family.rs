//! Length families.
//!
//! The heuristic applies one rule per family: the trivial length, a pure
//! power of one supported prime, or a mix of several. Families are named the
//! way kernel catalogs group them (`pow3`, `2x5`, ...).

use core::fmt;

use traits::PlanError;
use tune::PrimeMask;

use crate::factor::PrimeFactorization;

/// Classification of a transform length by its prime signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthFamily {
  /// Length 1.
  Unit,
  /// `prime^k` with `k >= 1`.
  PrimePower { prime: usize },
  /// Two or more distinct supported primes.
  Composite { signature: PrimeMask },
}

impl LengthFamily {
  #[must_use]
  pub fn classify(factors: &PrimeFactorization) -> Self {
    if factors.length() == 1 {
      return Self::Unit;
    }
    match factors.pure_prime() {
      Some(prime) => Self::PrimePower { prime },
      None => Self::Composite {
        signature: factors.signature(),
      },
    }
  }

  /// Factor and classify `length`.
  pub fn try_of(length: usize) -> Result<Self, PlanError> {
    PrimeFactorization::try_new(length).map(|f| Self::classify(&f))
  }
}

impl fmt::Display for LengthFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unit => f.write_str("unit"),
      Self::PrimePower { prime } => write!(f, "pow{prime}"),
      Self::Composite { signature } => write!(f, "{signature}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use alloc::string::ToString;

  use super::*;

  #[test]
  fn classification() {
    assert_eq!(LengthFamily::try_of(1), Ok(LengthFamily::Unit));
    assert_eq!(LengthFamily::try_of(256), Ok(LengthFamily::PrimePower { prime: 2 }));
    assert_eq!(LengthFamily::try_of(121), Ok(LengthFamily::PrimePower { prime: 11 }));
    assert_eq!(
      LengthFamily::try_of(100),
      Ok(LengthFamily::Composite { signature: PrimeMask::TWO | PrimeMask::FIVE })
    );
    assert!(LengthFamily::try_of(34).is_err());
  }

  #[test]
  fn names() {
    assert_eq!(LengthFamily::try_of(1).unwrap().to_string(), "unit");
    assert_eq!(LengthFamily::try_of(81).unwrap().to_string(), "pow3");
    assert_eq!(LengthFamily::try_of(210).unwrap().to_string(), "2x3x5x7");
  }
}
