//! Incremental update from a history source into the sink.

use crate::domain::error::BardepotError;
use crate::domain::market::{Exchange, Interval};
use crate::ports::history_port::HistoryPort;
use crate::ports::sink_port::BarSinkPort;

/// Pull bars newer than the sink's last known datetime from the history
/// source and save them. Returns the number of bars saved.
pub fn sync_bars(
    history: &dyn HistoryPort,
    sink: &dyn BarSinkPort,
    symbol: &str,
    exchange: Exchange,
    interval: Interval,
) -> Result<usize, BardepotError> {
    let after = sink
        .bar_range(symbol, exchange, interval)?
        .map(|range| range.last);

    let bars = history.query_bars(symbol, exchange, interval, after)?;
    if bars.is_empty() {
        return Ok(0);
    }

    sink.save_bars(&bars)
}
