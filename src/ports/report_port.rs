//! Report output port trait.

use crate::domain::error::BardepotError;
use crate::domain::summary::BarSummary;
use std::path::Path;

/// Port for writing the text artifacts: the symbol list and the
/// summary-statistics file.
pub trait ReportPort {
    /// One `SYMBOL.EXCHANGE` per line.
    fn write_symbol_list(
        &self,
        vt_symbols: &[String],
        output_path: &Path,
    ) -> Result<(), BardepotError>;

    fn write_summary(
        &self,
        summaries: &[BarSummary],
        output_path: &Path,
    ) -> Result<(), BardepotError>;
}
