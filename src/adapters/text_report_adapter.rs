//! Plain-text report adapter.

use crate::domain::error::BardepotError;
use crate::domain::summary::BarSummary;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn write_symbol_list(
        &self,
        vt_symbols: &[String],
        output_path: &Path,
    ) -> Result<(), BardepotError> {
        let mut content = vt_symbols.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(output_path, content)?;
        Ok(())
    }

    fn write_summary(
        &self,
        summaries: &[BarSummary],
        output_path: &Path,
    ) -> Result<(), BardepotError> {
        let mut content = summaries
            .iter()
            .map(|s| s.line())
            .collect::<Vec<_>>()
            .join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}
