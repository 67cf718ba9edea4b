//! Generation requests.
//!
//! A request says which predefined kernels to produce: which precisions,
//! which length families, and optionally an explicit list of sizes. Tokens
//! come straight from the command line, so unknown ones are skipped with a
//! warning rather than rejected.

use std::{collections::BTreeSet, fmt};

use platform::Precision;
use thiserror::Error;

/// Why a request cannot produce anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
  #[error("no valid precision")]
  NoPrecision,
  #[error("no valid sizes to generate")]
  NoSizes,
  #[error("unknown {field} token `{token}`")]
  UnknownToken { field: &'static str, token: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Precision set
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PrecisionSet(u8);

impl PrecisionSet {
  pub const NONE: Self = Self(0b00);
  pub const SINGLE: Self = Self(0b01);
  pub const DOUBLE: Self = Self(0b10);
  pub const ALL: Self = Self(0b11);

  #[inline]
  #[must_use]
  pub const fn of(precision: Precision) -> Self {
    match precision {
      Precision::Single => Self::SINGLE,
      Precision::Double => Self::DOUBLE,
    }
  }

  /// `single`, `double` or `all`.
  pub fn parse_token(token: &str) -> Result<Self, RequestError> {
    match token {
      "single" => Ok(Self::SINGLE),
      "double" => Ok(Self::DOUBLE),
      "all" => Ok(Self::ALL),
      other => Err(RequestError::UnknownToken {
        field: "precision",
        token: other.into(),
      }),
    }
  }

  #[inline]
  #[must_use]
  pub const fn intersects(self, other: Self) -> bool {
    self.0 & other.0 != 0
  }

  #[inline]
  #[must_use]
  pub const fn contains(self, precision: Precision) -> bool {
    self.intersects(Self::of(precision))
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Members, single before double.
  pub fn iter(self) -> impl Iterator<Item = Precision> {
    Precision::ALL.into_iter().filter(move |&p| self.contains(p))
  }
}

impl core::ops::BitOr for PrecisionSet {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    Self(self.0 | rhs.0)
  }
}

impl core::ops::BitOrAssign for PrecisionSet {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    self.0 |= rhs.0;
  }
}

impl fmt::Debug for PrecisionSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernel kinds
// ─────────────────────────────────────────────────────────────────────────────

/// Families of predefined kernels.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct KernelKinds(u8);

impl KernelKinds {
  pub const NONE: Self = Self(0);
  pub const POW2: Self = Self(1 << 0);
  pub const POW3: Self = Self(1 << 1);
  pub const POW5: Self = Self(1 << 2);
  /// Powers of 7, 11 and 13.
  pub const POW7: Self = Self(1 << 3);
  pub const SMALL: Self = Self(Self::POW2.0 | Self::POW3.0 | Self::POW5.0 | Self::POW7.0);
  pub const LARGE: Self = Self(1 << 4);
  pub const DIM2: Self = Self(1 << 5);
  pub const ALL: Self = Self(Self::SMALL.0 | Self::LARGE.0 | Self::DIM2.0);

  const NAMES: [(Self, &'static str); 6] = [
    (Self::POW2, "pow2"),
    (Self::POW3, "pow3"),
    (Self::POW5, "pow5"),
    (Self::POW7, "pow7,11,13"),
    (Self::LARGE, "large"),
    (Self::DIM2, "2D"),
  ];

  /// `pow2`, `pow3`, `pow5`, `pow7`, `small`, `large`, `2D` or `all`.
  pub fn parse_token(token: &str) -> Result<Self, RequestError> {
    match token {
      "pow2" => Ok(Self::POW2),
      "pow3" => Ok(Self::POW3),
      "pow5" => Ok(Self::POW5),
      "pow7" => Ok(Self::POW7),
      "small" => Ok(Self::SMALL),
      "large" => Ok(Self::LARGE),
      "2D" | "2d" => Ok(Self::DIM2),
      "all" => Ok(Self::ALL),
      other => Err(RequestError::UnknownToken {
        field: "type",
        token: other.into(),
      }),
    }
  }

  #[inline]
  #[must_use]
  pub const fn intersects(self, other: Self) -> bool {
    self.0 & other.0 != 0
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }
}

impl core::ops::BitOr for KernelKinds {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    Self(self.0 | rhs.0)
  }
}

impl core::ops::BitOrAssign for KernelKinds {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    self.0 |= rhs.0;
  }
}

impl fmt::Debug for KernelKinds {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set()
      .entries(Self::NAMES.iter().filter(|(k, _)| self.intersects(*k)).map(|(_, name)| name))
      .finish()
  }
}

impl fmt::Display for KernelKinds {
  /// Space separated family names, or `none`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str("none");
    }
    let mut first = true;
    for (kind, name) in Self::NAMES {
      if self.intersects(kind) {
        if !first {
          f.write_str(" ")?;
        }
        f.write_str(name)?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// What to generate.
///
/// ```
/// use radixplan::request::{GenerationRequest, KernelKinds};
///
/// let mut request = GenerationRequest::default();
/// request.init_kinds(["pow3", "2D"]);
/// assert!(request.has_kind(KernelKinds::POW3));
/// assert!(!request.has_kind(KernelKinds::LARGE));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
  /// Number of kernel groups the output is split into.
  pub group_num: usize,
  pub precisions: PrecisionSet,
  pub kinds: KernelKinds,
  pub manual_small: Vec<usize>,
  pub manual_large: Vec<usize>,
  valid_manual_small: BTreeSet<usize>,
  valid_manual_large: BTreeSet<usize>,
}

impl Default for GenerationRequest {
  fn default() -> Self {
    Self {
      group_num: Self::DEFAULT_GROUP_NUM,
      precisions: PrecisionSet::ALL,
      kinds: KernelKinds::ALL,
      manual_small: Vec::new(),
      manual_large: Vec::new(),
      valid_manual_small: BTreeSet::new(),
      valid_manual_large: BTreeSet::new(),
    }
  }
}

impl GenerationRequest {
  pub const DEFAULT_GROUP_NUM: usize = 8;

  /// Replace the precision set with the union of `tokens`.
  pub fn init_precisions<I, S>(&mut self, tokens: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.precisions = PrecisionSet::NONE;
    for token in tokens {
      match PrecisionSet::parse_token(token.as_ref()) {
        Ok(set) => self.precisions |= set,
        Err(err) => tracing::warn!(%err, "ignoring precision token"),
      }
    }
  }

  /// Replace the kernel kinds with the union of `tokens`.
  pub fn init_kinds<I, S>(&mut self, tokens: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.kinds = KernelKinds::NONE;
    for token in tokens {
      match KernelKinds::parse_token(token.as_ref()) {
        Ok(kinds) => self.kinds |= kinds,
        Err(err) => tracing::warn!(%err, "ignoring type token"),
      }
    }
  }

  /// Keep the manual small sizes present in `pool`. Returns how many are valid.
  pub fn filter_manual_small(&mut self, pool: &BTreeSet<usize>) -> usize {
    filter_into(&self.manual_small, pool, &mut self.valid_manual_small)
  }

  /// Keep the manual large sizes present in `pool`. Returns how many are valid.
  pub fn filter_manual_large(&mut self, pool: &BTreeSet<usize>) -> usize {
    filter_into(&self.manual_large, pool, &mut self.valid_manual_large)
  }

  #[inline]
  #[must_use]
  pub const fn has_precision(&self, precisions: PrecisionSet) -> bool {
    self.precisions.intersects(precisions)
  }

  #[inline]
  #[must_use]
  pub const fn has_kind(&self, kinds: KernelKinds) -> bool {
    self.kinds.intersects(kinds)
  }

  #[inline]
  #[must_use]
  pub fn has_manual_small(&self) -> bool {
    !self.valid_manual_small.is_empty()
  }

  #[inline]
  #[must_use]
  pub fn has_manual_large(&self) -> bool {
    !self.valid_manual_large.is_empty()
  }

  #[inline]
  #[must_use]
  pub const fn valid_manual_small(&self) -> &BTreeSet<usize> {
    &self.valid_manual_small
  }

  #[inline]
  #[must_use]
  pub const fn valid_manual_large(&self) -> &BTreeSet<usize> {
    &self.valid_manual_large
  }

  /// Whether the request can produce at least one kernel.
  pub fn check_valid(&self) -> Result<(), RequestError> {
    if self.precisions.is_empty() {
      return Err(RequestError::NoPrecision);
    }
    if self.kinds.is_empty() && !self.has_manual_small() && !self.has_manual_large() {
      return Err(RequestError::NoSizes);
    }
    Ok(())
  }

  /// Filter manual sizes against the supported pools, then validate.
  pub fn validate_against(
    &mut self,
    small_pool: &BTreeSet<usize>,
    large_pool: &BTreeSet<usize>,
  ) -> Result<(), RequestError> {
    let small = self.filter_manual_small(small_pool);
    let large = self.filter_manual_large(large_pool);
    if small < self.manual_small.len() || large < self.manual_large.len() {
      tracing::warn!(
        small_requested = self.manual_small.len(),
        small_valid = small,
        large_requested = self.manual_large.len(),
        large_valid = large,
        "dropping unsupported manual sizes"
      );
    }
    self.check_valid()
  }

  /// Summary with `separator` after each line.
  #[must_use]
  pub fn describe(&self, separator: &str) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = self.write_lines(&mut out, separator);
    out
  }

  fn write_lines(&self, out: &mut impl fmt::Write, separator: &str) -> fmt::Result {
    write!(out, "type: {}{separator}", self.kinds)?;

    out.write_str("valid manual small size:")?;
    for size in &self.valid_manual_small {
      write!(out, " {size}")?;
    }
    out.write_str(separator)?;

    out.write_str("valid manual large size:")?;
    for size in &self.valid_manual_large {
      write!(out, " {size}")?;
    }
    out.write_str(separator)?;

    out.write_str("precision:")?;
    for precision in self.precisions.iter() {
      write!(out, " {precision}")?;
    }
    out.write_str(separator)?;

    write!(out, "group_num: {}{separator}", self.group_num)
  }
}

impl fmt::Display for GenerationRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.write_lines(f, "\n")
  }
}

fn filter_into(requested: &[usize], pool: &BTreeSet<usize>, valid: &mut BTreeSet<usize>) -> usize {
  valid.extend(requested.iter().copied().filter(|size| pool.contains(size)));
  valid.len()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pool(sizes: &[usize]) -> BTreeSet<usize> {
    sizes.iter().copied().collect()
  }

  #[test]
  fn defaults() {
    let request = GenerationRequest::default();
    assert_eq!(request.group_num, 8);
    assert_eq!(request.precisions, PrecisionSet::ALL);
    assert_eq!(request.kinds, KernelKinds::ALL);
    assert!(request.check_valid().is_ok());
  }

  #[test]
  fn precision_tokens_accumulate() {
    let mut request = GenerationRequest::default();
    request.init_precisions(["double"]);
    assert!(!request.has_precision(PrecisionSet::SINGLE));
    assert!(request.has_precision(PrecisionSet::DOUBLE));

    request.init_precisions(["single", "bogus", "double"]);
    assert_eq!(request.precisions, PrecisionSet::ALL);

    request.init_precisions(["half"]);
    assert_eq!(request.check_valid(), Err(RequestError::NoPrecision));
  }

  #[test]
  fn kind_tokens() {
    let mut request = GenerationRequest::default();
    request.init_kinds(["small"]);
    assert!(request.has_kind(KernelKinds::POW7));
    assert!(!request.has_kind(KernelKinds::DIM2 | KernelKinds::LARGE));

    request.init_kinds(["2D", "large"]);
    assert_eq!(request.kinds, KernelKinds::DIM2 | KernelKinds::LARGE);

    request.init_kinds(Vec::<String>::new());
    assert_eq!(request.check_valid(), Err(RequestError::NoSizes));
  }

  #[test]
  fn unknown_tokens_are_typed() {
    assert_eq!(
      KernelKinds::parse_token("pow17"),
      Err(RequestError::UnknownToken {
        field: "type",
        token: "pow17".into()
      })
    );
    assert_eq!(
      PrecisionSet::parse_token("half").unwrap_err().to_string(),
      "unknown precision token `half`"
    );
  }

  #[test]
  fn manual_sizes_rescue_empty_kinds() {
    let mut request = GenerationRequest::default();
    request.init_kinds(["nothing"]);
    request.manual_small = vec![64, 17, 64, 81];
    assert_eq!(request.filter_manual_small(&pool(&[64, 81, 128])), 2);
    assert!(request.has_manual_small());
    assert!(request.check_valid().is_ok());
    assert_eq!(request.valid_manual_small(), &pool(&[64, 81]));
  }

  #[test]
  fn validate_against_pools() {
    let mut request = GenerationRequest::default();
    request.init_kinds(["none"]);
    request.manual_large = vec![12];
    assert_eq!(
      request.validate_against(&pool(&[8]), &pool(&[64, 81])),
      Err(RequestError::NoSizes)
    );
    request.manual_large.push(81);
    assert!(request.validate_against(&pool(&[8]), &pool(&[64, 81])).is_ok());
  }

  #[test]
  fn description_lines() {
    let mut request = GenerationRequest::default();
    request.init_kinds(["pow2", "pow7"]);
    request.init_precisions(["single"]);
    request.manual_small = vec![16, 8];
    request.filter_manual_small(&pool(&[8, 16]));

    assert_eq!(
      request.describe(" | "),
      "type: pow2 pow7,11,13 | valid manual small size: 8 16 | valid manual large size: | precision: single | group_num: 8 | "
    );
    assert!(request.to_string().starts_with("type: pow2 pow7,11,13\n"));

    request.init_kinds(["none"]);
    assert!(request.describe("\n").starts_with("type: none\n"));
  }
}
