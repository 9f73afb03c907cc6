//! Persistence sink port trait.

use crate::domain::bar::BarRecord;
use crate::domain::error::BardepotError;
use crate::domain::market::{Exchange, Interval};
use crate::domain::summary::{BarRange, BarSummary};
use chrono::DateTime;
use chrono_tz::Tz;

/// Sink for canonical bars. Saving is an idempotent upsert keyed by
/// (symbol, exchange, interval, datetime).
pub trait BarSinkPort {
    /// Save a batch in one transaction; returns the batch size.
    fn save_bars(&self, bars: &[BarRecord]) -> Result<usize, BardepotError>;

    fn load_bars(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<BarRecord>, BardepotError>;

    /// Distinct `SYMBOL.EXCHANGE` identifiers, sorted.
    fn list_vt_symbols(&self) -> Result<Vec<String>, BardepotError>;

    fn bar_range(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
    ) -> Result<Option<BarRange>, BardepotError>;

    /// Per-(symbol, exchange, interval) statistics over the whole store.
    fn summarize(&self) -> Result<Vec<BarSummary>, BardepotError>;
}
