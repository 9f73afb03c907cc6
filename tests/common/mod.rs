#![allow(dead_code)]

use bardepot::domain::bar::BarRecord;
use bardepot::domain::error::BardepotError;
use bardepot::domain::market::{Exchange, Interval};
use bardepot::domain::summary::{BarRange, BarSummary};
use bardepot::ports::sink_port::BarSinkPort;
use chrono::{DateTime, TimeZone};
use chrono_tz::Asia::Shanghai;
use chrono_tz::Tz;
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Foreign-exchange style minute export with vendor headers.
pub const FX_CSV: &str = "\
Time,Open,High,Low,Close,Volume
2018/09/13 22:00,1.234,1.240,1.230,1.238,100
2018/09/13 22:01,1.238,1.242,1.236,1.241,80
2018/09/13 22:02,1.241,1.241,1.237,1.239,95
";

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}

/// A complete config for importing `FX_CSV` into a sqlite store at `db_path`.
/// `[import]` comes last so tests can append extra keys to it.
pub fn fx_config_ini(db_path: &Path) -> String {
    format!(
        "[sqlite]\n\
         path = {}\n\
         timezone = Asia/Shanghai\n\
         \n\
         [columns]\n\
         datetime = Time\n\
         open = Open\n\
         high = High\n\
         low = Low\n\
         close = Close\n\
         volume = Volume\n\
         \n\
         [import]\n\
         symbol = EURUSD\n\
         exchange = IDEALPRO\n\
         interval = 1m\n\
         format = %Y/%m/%d %H:%M\n\
         timezone = Asia/Shanghai\n",
        db_path.display()
    )
}

pub fn shanghai(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
    Shanghai.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn make_bar(symbol: &str, exchange: Exchange, datetime: DateTime<Tz>) -> BarRecord {
    BarRecord {
        symbol: symbol.to_string(),
        exchange,
        datetime,
        interval: Interval::Minute,
        open_price: 1.234,
        high_price: 1.240,
        low_price: 1.230,
        close_price: 1.238,
        volume: 100.0,
        open_interest: 0.0,
        source_tag: "CSV".into(),
    }
}

/// In-memory sink with the same upsert key as the sqlite adapter.
pub struct MockSinkPort {
    pub bars: RefCell<Vec<BarRecord>>,
    pub fail_with: Option<String>,
}

impl MockSinkPort {
    pub fn new() -> Self {
        Self {
            bars: RefCell::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: RefCell::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    fn check(&self) -> Result<(), BardepotError> {
        match &self.fail_with {
            Some(reason) => Err(BardepotError::Database {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl BarSinkPort for MockSinkPort {
    fn save_bars(&self, bars: &[BarRecord]) -> Result<usize, BardepotError> {
        self.check()?;
        let mut stored = self.bars.borrow_mut();
        for bar in bars {
            stored.retain(|b| {
                !(b.symbol == bar.symbol
                    && b.exchange == bar.exchange
                    && b.interval == bar.interval
                    && b.datetime == bar.datetime)
            });
            stored.push(bar.clone());
        }
        Ok(bars.len())
    }

    fn load_bars(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<BarRecord>, BardepotError> {
        self.check()?;
        let mut bars: Vec<BarRecord> = self
            .bars
            .borrow()
            .iter()
            .filter(|b| {
                b.symbol == symbol
                    && b.exchange == exchange
                    && b.interval == interval
                    && b.datetime >= start
                    && b.datetime <= end
            })
            .cloned()
            .collect();
        bars.sort_by_key(|b| b.datetime);
        Ok(bars)
    }

    fn list_vt_symbols(&self) -> Result<Vec<String>, BardepotError> {
        self.check()?;
        let mut vt_symbols: Vec<String> =
            self.bars.borrow().iter().map(|b| b.vt_symbol()).collect();
        vt_symbols.sort();
        vt_symbols.dedup();
        Ok(vt_symbols)
    }

    fn bar_range(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
    ) -> Result<Option<BarRange>, BardepotError> {
        self.check()?;
        let stored = self.bars.borrow();
        let matching: Vec<_> = stored
            .iter()
            .filter(|b| b.symbol == symbol && b.exchange == exchange && b.interval == interval)
            .collect();
        let first = matching.iter().map(|b| b.datetime).min();
        let last = matching.iter().map(|b| b.datetime).max();
        match (first, last) {
            (Some(first), Some(last)) => Ok(Some(BarRange {
                first,
                last,
                count: matching.len(),
            })),
            _ => Ok(None),
        }
    }

    fn summarize(&self) -> Result<Vec<BarSummary>, BardepotError> {
        self.check()?;
        let stored = self.bars.borrow();
        let mut keys: Vec<(String, Exchange, Interval)> = stored
            .iter()
            .map(|b| (b.symbol.clone(), b.exchange, b.interval))
            .collect();
        keys.sort_by(|a, b| (&a.0, a.1.as_str(), a.2.code()).cmp(&(&b.0, b.1.as_str(), b.2.code())));
        keys.dedup();

        let mut summaries = Vec::new();
        for (symbol, exchange, interval) in keys {
            if let Some(range) = self.bar_range(&symbol, exchange, interval)? {
                summaries.push(BarSummary {
                    symbol,
                    exchange,
                    interval,
                    range,
                });
            }
        }
        Ok(summaries)
    }
}
