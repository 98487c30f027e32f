//! Text output of sparsity patterns

use std::io::Write;

use sparsity_core::SparsityStructure;

use crate::Result;

/// Text renderings available on every compressed structure
pub trait PrintPattern: SparsityStructure {
    /// Write one `"{col} {-row}"` line per entry, ready for gnuplot
    ///
    /// Rows are negated so that plotting the points reproduces the visual
    /// layout of the matrix with row 0 on top.
    fn print_gnuplot<W: Write>(&self, out: &mut W) -> Result<()> {
        for (row, col) in self.iter() {
            writeln!(out, "{} {}", col, -(row as i64))?;
        }
        Ok(())
    }

    /// Write one `"[row,c0,c1,...]"` line per row in stored order
    fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        for row in 0..self.n_rows() {
            write!(out, "[{row}")?;
            for col in self.row(row) {
                write!(out, ",{col}")?;
            }
            writeln!(out, "]")?;
        }
        Ok(())
    }
}

impl<S: SparsityStructure + ?Sized> PrintPattern for S {}
