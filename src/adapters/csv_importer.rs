//! CSV bar importer.
//!
//! Reads a delimited vendor export, maps columns by header name, localizes
//! timestamps into the target timezone and yields canonical bars lazily in
//! input row order. Errors are fail-fast: the first bad row aborts the
//! import with its 1-based data-row index.

use crate::domain::bar::BarRecord;
use crate::domain::error::BardepotError;
use crate::domain::mapping::{ColumnIndices, ColumnMapping};
use crate::domain::market::{Exchange, Interval};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CsvBarImporter {
    pub path: PathBuf,
    pub mapping: ColumnMapping,
    pub datetime_format: String,
    pub timezone: Tz,
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    pub source_tag: String,
    pub delimiter: u8,
    /// Drop the trailing data row. Some vendor exports end with an
    /// incomplete final bar; this makes the cut explicit instead of a
    /// hardcoded slice.
    pub drop_last: bool,
}

impl CsvBarImporter {
    /// Open the file and resolve the column mapping against its header row.
    /// Fails with `NotFound` for a missing file and `Schema` for a mapped
    /// header the file does not carry, before any row is produced.
    pub fn open(&self) -> Result<BarIter<'_>, BardepotError> {
        if !self.path.is_file() {
            return Err(BardepotError::NotFound {
                path: self.path.display().to_string(),
            });
        }

        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| BardepotError::Parse {
                row: 0,
                reason: format!("unreadable header row: {e}"),
            })?
            .clone();
        let indices = self
            .mapping
            .resolve(&headers, &self.path.display().to_string())?;

        Ok(BarIter {
            importer: self,
            records: reader.into_records(),
            indices,
            pending: None,
            read: 0,
        })
    }

    /// Collect the whole file, fail-fast on the first bad row.
    pub fn import(&self) -> Result<Vec<BarRecord>, BardepotError> {
        self.open()?.collect()
    }
}

/// Lazy, finite, single-pass bar sequence. Restarting requires re-opening
/// the source.
pub struct BarIter<'a> {
    importer: &'a CsvBarImporter,
    records: csv::StringRecordsIntoIter<File>,
    indices: ColumnIndices,
    // one-record lookahead so the trailing row can be withheld
    pending: Option<(usize, csv::StringRecord)>,
    read: usize,
}

impl BarIter<'_> {
    fn field<'r>(
        &self,
        record: &'r csv::StringRecord,
        row: usize,
        index: usize,
        name: &str,
    ) -> Result<&'r str, BardepotError> {
        record.get(index).ok_or_else(|| BardepotError::Parse {
            row,
            reason: format!("missing {name} field"),
        })
    }

    fn number(
        &self,
        record: &csv::StringRecord,
        row: usize,
        index: usize,
        name: &str,
    ) -> Result<f64, BardepotError> {
        let raw = self.field(record, row, index, name)?;
        raw.parse().map_err(|e| BardepotError::Parse {
            row,
            reason: format!("invalid {name} value '{raw}': {e}"),
        })
    }

    fn localize(&self, raw: &str, row: usize) -> Result<chrono::DateTime<Tz>, BardepotError> {
        let format = &self.importer.datetime_format;
        // Date-only formats parse as midnight.
        let naive = NaiveDateTime::parse_from_str(raw, format)
            .or_else(|e| {
                NaiveDate::parse_from_str(raw, format)
                    .map(|d| d.and_time(NaiveTime::MIN))
                    .map_err(|_| e)
            })
            .map_err(|e| BardepotError::Parse {
                row,
                reason: format!("invalid timestamp '{raw}': {e}"),
            })?;

        // The value is wall-clock time in the target zone, never UTC.
        // Ambiguous times (DST fold) take the earliest offset; times inside
        // a DST gap do not exist and fail the row.
        self.importer
            .timezone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| BardepotError::Parse {
                row,
                reason: format!(
                    "timestamp '{raw}' does not exist in {}",
                    self.importer.timezone
                ),
            })
    }

    fn make_bar(
        &self,
        record: &csv::StringRecord,
        row: usize,
    ) -> Result<BarRecord, BardepotError> {
        let idx = self.indices;
        let raw_datetime = self.field(record, row, idx.datetime, "datetime")?;
        let datetime = self.localize(raw_datetime, row)?;

        let bar = BarRecord {
            symbol: self.importer.symbol.clone(),
            exchange: self.importer.exchange,
            datetime,
            interval: self.importer.interval,
            open_price: self.number(record, row, idx.open, "open")?,
            high_price: self.number(record, row, idx.high, "high")?,
            low_price: self.number(record, row, idx.low, "low")?,
            close_price: self.number(record, row, idx.close, "close")?,
            volume: self.number(record, row, idx.volume, "volume")?,
            open_interest: match idx.open_interest {
                Some(i) => self.number(record, row, i, "open_interest")?,
                None => 0.0,
            },
            source_tag: self.importer.source_tag.clone(),
        };

        bar.validate()
            .map_err(|reason| BardepotError::InvalidBar { row, reason })?;
        Ok(bar)
    }
}

impl Iterator for BarIter<'_> {
    type Item = Result<BarRecord, BardepotError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.records.next() {
                Some(Ok(record)) => {
                    self.read += 1;
                    let incoming = (self.read, record);
                    match self.pending.replace(incoming) {
                        Some((row, prev)) => return Some(self.make_bar(&prev, row)),
                        None => continue,
                    }
                }
                Some(Err(e)) => {
                    return Some(Err(BardepotError::Parse {
                        row: self.read + 1,
                        reason: format!("unreadable record: {e}"),
                    }));
                }
                None => {
                    let (row, last) = self.pending.take()?;
                    if self.importer.drop_last {
                        return None;
                    }
                    return Some(self.make_bar(&last, row));
                }
            }
        }
    }
}
