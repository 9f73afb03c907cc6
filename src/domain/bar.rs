//! Canonical bar record.

use crate::domain::market::{Exchange, Interval};
use chrono::DateTime;
use chrono_tz::Tz;

/// One OHLCV bar, normalized from a vendor export.
///
/// Constructed once per input row and handed straight to the sink; batches
/// are transient and never kept in memory after the save.
#[derive(Debug, Clone)]
pub struct BarRecord {
    pub symbol: String,
    pub exchange: Exchange,
    pub datetime: DateTime<Tz>,
    pub interval: Interval,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub source_tag: String,
}

impl BarRecord {
    /// Compound identifier addressing the instrument across venues.
    pub fn vt_symbol(&self) -> String {
        format!("{}.{}", self.symbol, self.exchange)
    }

    /// Checks low <= open/close <= high, volume >= 0 and a non-empty symbol.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("empty symbol".into());
        }
        if self.low_price > self.high_price {
            return Err(format!(
                "low {} above high {}",
                self.low_price, self.high_price
            ));
        }
        if self.open_price < self.low_price || self.open_price > self.high_price {
            return Err(format!(
                "open {} outside [{}, {}]",
                self.open_price, self.low_price, self.high_price
            ));
        }
        if self.close_price < self.low_price || self.close_price > self.high_price {
            return Err(format!(
                "close {} outside [{}, {}]",
                self.close_price, self.low_price, self.high_price
            ));
        }
        if self.volume < 0.0 {
            return Err(format!("negative volume {}", self.volume));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn sample_bar() -> BarRecord {
        BarRecord {
            symbol: "cu2105".into(),
            exchange: Exchange::Shfe,
            datetime: Shanghai.with_ymd_and_hms(2021, 3, 1, 21, 0, 0).unwrap(),
            interval: Interval::Minute,
            open_price: 100.0,
            high_price: 110.0,
            low_price: 90.0,
            close_price: 105.0,
            volume: 50_000.0,
            open_interest: 1_200.0,
            source_tag: "CSV".into(),
        }
    }

    #[test]
    fn vt_symbol_joins_symbol_and_exchange() {
        assert_eq!(sample_bar().vt_symbol(), "cu2105.SHFE");
    }

    #[test]
    fn validate_accepts_well_formed_bar() {
        assert!(sample_bar().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut bar = sample_bar();
        bar.low_price = 120.0;
        assert!(bar.validate().is_err());
    }

    #[test]
    fn validate_rejects_close_outside_range() {
        let mut bar = sample_bar();
        bar.close_price = 111.0;
        assert!(bar.validate().unwrap_err().contains("close"));
    }

    #[test]
    fn validate_rejects_open_outside_range() {
        let mut bar = sample_bar();
        bar.open_price = 89.9;
        assert!(bar.validate().unwrap_err().contains("open"));
    }

    #[test]
    fn validate_rejects_negative_volume() {
        let mut bar = sample_bar();
        bar.volume = -1.0;
        assert!(bar.validate().unwrap_err().contains("volume"));
    }

    #[test]
    fn validate_rejects_empty_symbol() {
        let mut bar = sample_bar();
        bar.symbol = "  ".into();
        assert!(bar.validate().is_err());
    }

    #[test]
    fn flat_bar_is_valid() {
        // All four prices equal is legal (no trades inside the bar).
        let mut bar = sample_bar();
        bar.open_price = 100.0;
        bar.high_price = 100.0;
        bar.low_price = 100.0;
        bar.close_price = 100.0;
        bar.volume = 0.0;
        assert!(bar.validate().is_ok());
    }
}
