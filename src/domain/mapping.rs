//! Vendor column mapping for bar imports.

use crate::domain::error::BardepotError;

/// Maps the canonical bar fields onto the column headers a vendor export
/// actually uses. `open_interest` is optional; when no header is supplied the
/// imported bars carry an open interest of zero.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub open_interest: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            datetime: "datetime".into(),
            open: "open".into(),
            high: "high".into(),
            low: "low".into(),
            close: "close".into(),
            volume: "volume".into(),
            open_interest: None,
        }
    }
}

/// Column positions resolved against one concrete header row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndices {
    pub datetime: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
    pub open_interest: Option<usize>,
}

impl ColumnMapping {
    /// Resolve the mapping against a header row. Any required header missing
    /// from the file is a schema error naming the column, raised before a
    /// single row is read.
    pub fn resolve(
        &self,
        headers: &csv::StringRecord,
        path: &str,
    ) -> Result<ColumnIndices, BardepotError> {
        let require = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| BardepotError::Schema {
                    column: name.to_string(),
                    path: path.to_string(),
                })
        };

        Ok(ColumnIndices {
            datetime: require(&self.datetime)?,
            open: require(&self.open)?,
            high: require(&self.high)?,
            low: require(&self.low)?,
            close: require(&self.close)?,
            volume: require(&self.volume)?,
            open_interest: match &self.open_interest {
                Some(name) => Some(require(name)?),
                None => None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cols.to_vec())
    }

    #[test]
    fn resolve_finds_all_required_columns() {
        let mapping = ColumnMapping {
            datetime: "Date".into(),
            open: "Open".into(),
            high: "High".into(),
            low: "Low".into(),
            close: "Close".into(),
            volume: "Vol".into(),
            open_interest: None,
        };
        let idx = mapping
            .resolve(
                &headers(&["Date", "Open", "High", "Low", "Close", "Vol"]),
                "fx.csv",
            )
            .unwrap();
        assert_eq!(idx.datetime, 0);
        assert_eq!(idx.volume, 5);
        assert!(idx.open_interest.is_none());
    }

    #[test]
    fn resolve_handles_reordered_and_padded_headers() {
        let mapping = ColumnMapping::default();
        let idx = mapping
            .resolve(
                &headers(&["volume", " close ", "low", "high", "open", "datetime"]),
                "bars.csv",
            )
            .unwrap();
        assert_eq!(idx.datetime, 5);
        assert_eq!(idx.open, 4);
        assert_eq!(idx.close, 1);
    }

    #[test]
    fn missing_required_header_is_schema_error() {
        let mapping = ColumnMapping::default();
        let err = mapping
            .resolve(&headers(&["datetime", "open", "high", "low", "close"]), "x.csv")
            .unwrap_err();
        match err {
            BardepotError::Schema { column, path } => {
                assert_eq!(column, "volume");
                assert_eq!(path, "x.csv");
            }
            other => panic!("expected Schema, got: {other}"),
        }
    }

    #[test]
    fn supplied_open_interest_header_is_required() {
        let mapping = ColumnMapping {
            open_interest: Some("OI".into()),
            ..ColumnMapping::default()
        };
        let err = mapping
            .resolve(
                &headers(&["datetime", "open", "high", "low", "close", "volume"]),
                "x.csv",
            )
            .unwrap_err();
        match err {
            BardepotError::Schema { column, .. } => assert_eq!(column, "OI"),
            other => panic!("expected Schema, got: {other}"),
        }
    }
}
