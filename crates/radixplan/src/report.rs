//! Output formatters for a [`Catalog`].
//!
//! - [`OutputFormat::Summary`]: human-readable sections (default)
//! - [`OutputFormat::Tsv`]: one row per kernel for scripts and spreadsheets

use std::io::{self, Write};

use crate::catalog::{Catalog, FusionSet, LargeKernel, SmallKernel};

/// Output format for a catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
  /// Human-readable summary (default).
  #[default]
  Summary,

  /// Tab-separated values.
  Tsv,
}

impl OutputFormat {
  /// Parse format from string.
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "summary" | "text" | "human" => Some(Self::Summary),
      "tsv" | "tab" => Some(Self::Tsv),
      _ => None,
    }
  }
}

/// Column header of the TSV format.
pub const TSV_HEADER: &str =
  "kind\tprecision\tdim0\tdim1\tfamily\twork_group_size\ttransforms_per_group\tblock_width\tsource\tradices";

/// Report generator for a catalog.
#[derive(Debug)]
pub struct Report<W: Write> {
  writer: W,
  format: OutputFormat,
}

impl<W: Write> Report<W> {
  pub fn new(writer: W, format: OutputFormat) -> Self {
    Self { writer, format }
  }

  /// Write the whole catalog.
  pub fn write(&mut self, catalog: &Catalog) -> io::Result<()> {
    match self.format {
      OutputFormat::Summary => self.write_summary(catalog),
      OutputFormat::Tsv => self.write_tsv(catalog),
    }
  }

  /// Consume the report and return the writer.
  pub fn into_inner(self) -> W {
    self.writer
  }

  fn write_summary(&mut self, catalog: &Catalog) -> io::Result<()> {
    writeln!(self.writer, "radixplan catalog")?;
    writeln!(self.writer, "=================")?;
    writeln!(self.writer)?;
    writeln!(self.writer, "Limits: {}", catalog.limits)?;
    write!(self.writer, "Precision:")?;
    for precision in &catalog.precisions {
      write!(self.writer, " {precision}")?;
    }
    writeln!(self.writer)?;
    writeln!(self.writer, "Group num: {}", catalog.group_num)?;
    writeln!(self.writer, "Kernels: {}", catalog.kernel_count())?;

    if !catalog.small.is_empty() {
      writeln!(self.writer)?;
      writeln!(self.writer, "=== small ({}) ===", catalog.small.len())?;
      for kernel in &catalog.small {
        self.write_small_summary(kernel)?;
      }
    }

    if !catalog.large.is_empty() {
      writeln!(self.writer)?;
      writeln!(self.writer, "=== large ({}) ===", catalog.large.len())?;
      for kernel in &catalog.large {
        let entry = kernel.entry;
        writeln!(
          self.writer,
          "  {:>5}  block_width={:<4} wgs={:<4} lds_elements={}",
          entry.length,
          entry.block_width,
          entry.work_group_size,
          entry.lds_elements()
        )?;
      }
    }

    for set in &catalog.fusion {
      writeln!(self.writer)?;
      writeln!(
        self.writer,
        "=== 2D {} ({} pairs, lds={}B) ===",
        set.precision,
        set.pairs.len(),
        set.lds_bytes
      )?;
      for chunk in set.pairs.chunks(8) {
        write!(self.writer, " ")?;
        for pair in chunk {
          write!(self.writer, " {:>9}", pair.to_string())?;
        }
        writeln!(self.writer)?;
      }
    }

    Ok(())
  }

  fn write_small_summary(&mut self, kernel: &SmallKernel) -> io::Result<()> {
    write!(
      self.writer,
      "  {:>5}  {:<8} {:<16} [{}]",
      kernel.length,
      kernel.family.to_string(),
      kernel.params.to_string(),
      kernel.source
    )?;
    if let Some(radices) = kernel.radices {
      write!(self.writer, " radices={}", join_radices(radices))?;
    }
    writeln!(self.writer)
  }

  fn write_tsv(&mut self, catalog: &Catalog) -> io::Result<()> {
    writeln!(self.writer, "{TSV_HEADER}")?;
    for kernel in &catalog.small {
      self.write_small_row(kernel)?;
    }
    for kernel in &catalog.large {
      self.write_large_row(kernel)?;
    }
    for set in &catalog.fusion {
      self.write_fusion_rows(set)?;
    }
    Ok(())
  }

  fn write_small_row(&mut self, kernel: &SmallKernel) -> io::Result<()> {
    let radices = kernel.radices.map_or_else(|| "-".to_string(), join_radices);
    writeln!(
      self.writer,
      "small\tany\t{}\t-\t{}\t{}\t{}\t-\t{}\t{radices}",
      kernel.length, kernel.family, kernel.params.work_group_size, kernel.params.transforms_per_group, kernel.source
    )
  }

  fn write_large_row(&mut self, kernel: &LargeKernel) -> io::Result<()> {
    let entry = kernel.entry;
    writeln!(
      self.writer,
      "large\tany\t{}\t-\t-\t{}\t-\t{}\ttable\t-",
      entry.length, entry.work_group_size, entry.block_width
    )
  }

  fn write_fusion_rows(&mut self, set: &FusionSet) -> io::Result<()> {
    for pair in &set.pairs {
      writeln!(
        self.writer,
        "2D\t{}\t{}\t{}\t-\t-\t-\t-\tsearch\t-",
        set.precision, pair.dim0, pair.dim1
      )?;
    }
    Ok(())
  }
}

fn join_radices(radices: &[usize]) -> String {
  radices.iter().map(ToString::to_string).collect::<Vec<_>>().join("x")
}
