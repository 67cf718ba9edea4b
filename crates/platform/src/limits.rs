//! Device limits that bound every launch decision.
//!
//! `DeviceLimits` answers: "How large may a work group be, and how much
//! shared memory (LDS) may one work group use?"
//!
//! The engine validates nothing else about the device. Both numbers come
//! from a preset, from [`DeviceLimits::custom`], or from
//! [`config::get()`](crate::config::get) with environment overrides applied.

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Largest work group any kernel is generated for.
pub const MAX_WORK_GROUP_SIZE: usize = 1024;

/// Smallest permissible work-group limit. Every tuned default assumes at
/// least 64 threads.
pub const MIN_WORK_GROUP_LIMIT: usize = 64;

/// Largest LDS budget assumed to exist on any device (64 KiB).
pub const MAX_LDS_BYTES: usize = 64 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// LimitsKind
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies where a [`DeviceLimits`] value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LimitsKind {
  Custom = 0,
  Default,
  /// Default preset with environment overrides applied.
  Environment,
}

impl LimitsKind {
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Custom => "Custom",
      Self::Default => "Default",
      Self::Environment => "Environment",
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// DeviceLimits
// ─────────────────────────────────────────────────────────────────────────────

/// Work-group and shared-memory limits of the target device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceLimits {
  pub(crate) kind: LimitsKind,
  /// Maximum threads in one work group.
  pub max_work_group_size: usize,
  /// Shared memory available to one work group, in bytes.
  ///
  /// Never above [`MAX_LDS_BYTES`] once clamped.
  pub lds_bytes: usize,
}

impl DeviceLimits {
  /// The limits every tuned table was generated against.
  pub const DEFAULT: Self = Self {
    kind: LimitsKind::Default,
    max_work_group_size: MAX_WORK_GROUP_SIZE,
    lds_bytes: MAX_LDS_BYTES,
  };

  /// Create custom limits.
  ///
  /// The LDS budget is clamped with [`effective_lds_bytes`](Self::effective_lds_bytes);
  /// the work-group limit is taken as-is so the engine can reject values below
  /// [`MIN_WORK_GROUP_LIMIT`] explicitly.
  #[must_use]
  pub const fn custom(max_work_group_size: usize, lds_bytes: usize) -> Self {
    Self {
      kind: LimitsKind::Custom,
      max_work_group_size,
      lds_bytes: Self::effective_lds_bytes(lds_bytes),
    }
  }

  /// Clamp a requested LDS budget: 0 means "assume the maximum", anything
  /// larger than [`MAX_LDS_BYTES`] is capped.
  #[inline]
  #[must_use]
  pub const fn effective_lds_bytes(requested: usize) -> usize {
    if requested == 0 || requested > MAX_LDS_BYTES {
      MAX_LDS_BYTES
    } else {
      requested
    }
  }

  #[inline]
  #[must_use]
  pub const fn kind(&self) -> LimitsKind {
    self.kind
  }

  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.kind.name()
  }

  #[must_use]
  pub(crate) const fn with_kind(mut self, kind: LimitsKind) -> Self {
    self.kind = kind;
    self
  }
}

impl Default for DeviceLimits {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

impl core::fmt::Display for DeviceLimits {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(
      f,
      "DeviceLimits({}: max_wgs={}, lds={}B)",
      self.name(),
      self.max_work_group_size,
      self.lds_bytes
    )
  }
}
