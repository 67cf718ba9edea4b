//! Transform precision.

use core::fmt;

/// Floating-point precision of a transform.
///
/// The enum is closed: a precision is either single or double, so every
/// width lookup is total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precision {
  /// 32-bit reals, 64-bit complex elements.
  Single = 1,
  /// 64-bit reals, 128-bit complex elements.
  Double = 2,
}

impl Precision {
  /// Both precisions, single first.
  pub const ALL: [Self; 2] = [Self::Single, Self::Double];

  /// Element width factor: 1 for single, 2 for double.
  ///
  /// This is a threshold multiplier, not a byte size.
  #[inline]
  #[must_use]
  pub const fn width(self) -> usize {
    match self {
      Self::Single => 1,
      Self::Double => 2,
    }
  }

  /// Length above which a 1-D transform leaves the small tuned table and is
  /// processed by block-compute kernels.
  ///
  /// `4096 / width`: 4096 for single, 2048 for double.
  #[inline]
  #[must_use]
  pub const fn large_1d_threshold(self) -> usize {
    4096 / self.width()
  }

  /// Bytes per real scalar.
  #[inline]
  #[must_use]
  pub const fn real_size_bytes(self) -> usize {
    match self {
      Self::Single => 4,
      Self::Double => 8,
    }
  }

  /// Bytes per complex element (two reals).
  #[inline]
  #[must_use]
  pub const fn complex_size_bytes(self) -> usize {
    2 * self.real_size_bytes()
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Single => "single",
      Self::Double => "double",
    }
  }

  /// Parse `single` / `double` (also `f32` / `f64`), case-insensitive.
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("single") || s.eq_ignore_ascii_case("f32") {
      return Some(Self::Single);
    }
    if s.eq_ignore_ascii_case("double") || s.eq_ignore_ascii_case("f64") {
      return Some(Self::Double);
    }
    None
  }
}

impl fmt::Display for Precision {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
