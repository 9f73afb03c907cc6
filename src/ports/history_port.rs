//! Historical-data source port trait.

use crate::domain::bar::BarRecord;
use crate::domain::error::BardepotError;
use crate::domain::market::{Exchange, Interval};
use chrono::DateTime;
use chrono_tz::Tz;

/// External source of historical bars (data vendor, gateway, ...).
///
/// Implementations return bars strictly after `after`, or the full history
/// when `after` is `None`. Failures are the implementation's own and are
/// propagated untouched.
pub trait HistoryPort {
    fn query_bars(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
        after: Option<DateTime<Tz>>,
    ) -> Result<Vec<BarRecord>, BardepotError>;
}
