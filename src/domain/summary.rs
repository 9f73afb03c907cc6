//! Stored-data statistics.

use crate::domain::market::{Exchange, Interval};
use chrono::DateTime;
use chrono_tz::Tz;

/// Extent of the stored bars for one (symbol, exchange, interval).
#[derive(Debug, Clone)]
pub struct BarRange {
    pub first: DateTime<Tz>,
    pub last: DateTime<Tz>,
    pub count: usize,
}

/// One line of the summary export.
#[derive(Debug, Clone)]
pub struct BarSummary {
    pub symbol: String,
    pub exchange: Exchange,
    pub interval: Interval,
    pub range: BarRange,
}

impl BarSummary {
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }

    /// `SYMBOL.EXCHANGE [interval]: N bars, FIRST to LAST`
    pub fn line(&self) -> String {
        format!(
            "{} [{}]: {} bars, {} to {}",
            self.vt_symbol(),
            self.interval,
            self.range.count,
            self.range.first.format("%Y-%m-%d %H:%M:%S"),
            self.range.last.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    #[test]
    fn summary_line_format() {
        let summary = BarSummary {
            symbol: "EURUSD".into(),
            exchange: Exchange::Idealpro,
            interval: Interval::Minute,
            range: BarRange {
                first: Shanghai.with_ymd_and_hms(2018, 9, 13, 22, 0, 0).unwrap(),
                last: Shanghai.with_ymd_and_hms(2018, 9, 14, 5, 59, 0).unwrap(),
                count: 480,
            },
        };
        assert_eq!(
            summary.line(),
            "EURUSD.IDEALPRO [1m]: 480 bars, 2018-09-13 22:00:00 to 2018-09-14 05:59:00"
        );
    }
}
