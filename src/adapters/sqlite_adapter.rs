//! SQLite bar sink adapter.
//!
//! Datetimes are stored as naive UTC text (`%Y-%m-%d %H:%M:%S`) so the
//! upsert key and ordering are offset-independent, and rehydrated into the
//! configured database timezone on load.

use crate::domain::bar::BarRecord;
use crate::domain::error::BardepotError;
use crate::domain::market::{Exchange, Interval};
use crate::domain::summary::{BarRange, BarSummary};
use crate::ports::config_port::ConfigPort;
use crate::ports::sink_port::BarSinkPort;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
    timezone: Tz,
}

fn encode_datetime(datetime: DateTime<Tz>) -> String {
    datetime
        .with_timezone(&Utc)
        .format(DATETIME_FORMAT)
        .to_string()
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BardepotError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| BardepotError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let timezone = match config.get_string("sqlite", "timezone") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| BardepotError::ConfigInvalid {
                    section: "sqlite".into(),
                    key: "timezone".into(),
                    reason: format!("unknown timezone '{name}'"),
                })?,
            None => Tz::UTC,
        };

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| BardepotError::Database {
                    reason: e.to_string(),
                })?;

        let adapter = Self { pool, timezone };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory(timezone: Tz) -> Result<Self, BardepotError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool, timezone };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn initialize_schema(&self) -> Result<(), BardepotError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bar (
                symbol TEXT NOT NULL,
                exchange TEXT NOT NULL,
                interval TEXT NOT NULL,
                datetime TEXT NOT NULL,
                open_price REAL NOT NULL,
                high_price REAL NOT NULL,
                low_price REAL NOT NULL,
                close_price REAL NOT NULL,
                volume REAL NOT NULL,
                open_interest REAL NOT NULL,
                source_tag TEXT NOT NULL,
                PRIMARY KEY (symbol, exchange, interval, datetime)
            );
            CREATE INDEX IF NOT EXISTS idx_bar_instrument ON bar(symbol, exchange, interval);",
        )
        .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn decode_datetime(&self, text: &str) -> Result<DateTime<Tz>, rusqlite::Error> {
        let naive = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                text.len(),
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
        Ok(Utc.from_utc_datetime(&naive).with_timezone(&self.timezone))
    }

    fn decode_exchange(text: &str) -> Result<Exchange, BardepotError> {
        Exchange::parse(text).ok_or_else(|| BardepotError::DatabaseQuery {
            reason: format!("unknown exchange '{text}' in store"),
        })
    }

    fn decode_interval(text: &str) -> Result<Interval, BardepotError> {
        Interval::parse(text).ok_or_else(|| BardepotError::DatabaseQuery {
            reason: format!("unknown interval '{text}' in store"),
        })
    }
}

impl BarSinkPort for SqliteAdapter {
    fn save_bars(&self, bars: &[BarRecord]) -> Result<usize, BardepotError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO bar
                     (symbol, exchange, interval, datetime,
                      open_price, high_price, low_price, close_price,
                      volume, open_interest, source_tag)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    bar.symbol,
                    bar.exchange.as_str(),
                    bar.interval.code(),
                    encode_datetime(bar.datetime),
                    bar.open_price,
                    bar.high_price,
                    bar.low_price,
                    bar.close_price,
                    bar.volume,
                    bar.open_interest,
                    bar.source_tag
                ],
            )
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

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
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT symbol, exchange, interval, datetime,
                            open_price, high_price, low_price, close_price,
                            volume, open_interest, source_tag
                     FROM bar
                     WHERE symbol = ?1 AND exchange = ?2 AND interval = ?3
                       AND datetime >= ?4 AND datetime <= ?5
                     ORDER BY datetime ASC";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map(
                params![
                    symbol,
                    exchange.as_str(),
                    interval.code(),
                    encode_datetime(start),
                    encode_datetime(end)
                ],
                |row| {
                    let datetime_str: String = row.get(3)?;
                    Ok(BarRecord {
                        symbol: row.get(0)?,
                        exchange,
                        datetime: self.decode_datetime(&datetime_str)?,
                        interval,
                        open_price: row.get(4)?,
                        high_price: row.get(5)?,
                        low_price: row.get(6)?,
                        close_price: row.get(7)?,
                        volume: row.get(8)?,
                        open_interest: row.get(9)?,
                        source_tag: row.get(10)?,
                    })
                },
            )
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(
                row.map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(bars)
    }

    fn list_vt_symbols(&self) -> Result<Vec<String>, BardepotError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT DISTINCT symbol, exchange FROM bar ORDER BY symbol, exchange";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], |row| {
                let symbol: String = row.get(0)?;
                let exchange: String = row.get(1)?;
                Ok(format!("{symbol}.{exchange}"))
            })
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut vt_symbols = Vec::new();
        for row in rows {
            vt_symbols.push(row.map_err(|e: rusqlite::Error| {
                BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                }
            })?);
        }

        Ok(vt_symbols)
    }

    fn bar_range(
        &self,
        symbol: &str,
        exchange: Exchange,
        interval: Interval,
    ) -> Result<Option<BarRange>, BardepotError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(datetime), MAX(datetime), COUNT(*)
                     FROM bar
                     WHERE symbol = ?1 AND exchange = ?2 AND interval = ?3";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                query,
                params![symbol, exchange.as_str(), interval.code()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let first = self.decode_datetime(&min_str).map_err(|e| {
                    BardepotError::DatabaseQuery {
                        reason: e.to_string(),
                    }
                })?;
                let last = self.decode_datetime(&max_str).map_err(|e| {
                    BardepotError::DatabaseQuery {
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(BarRange {
                    first,
                    last,
                    count: count as usize,
                }))
            }
            _ => Ok(None),
        }
    }

    fn summarize(&self) -> Result<Vec<BarSummary>, BardepotError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| BardepotError::Database {
                reason: e.to_string(),
            })?;

        let query = "SELECT symbol, exchange, interval,
                            MIN(datetime), MAX(datetime), COUNT(*)
                     FROM bar
                     GROUP BY symbol, exchange, interval
                     ORDER BY symbol, exchange, interval";

        let mut stmt =
            conn.prepare(query)
                .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], |row| {
                let symbol: String = row.get(0)?;
                let exchange: String = row.get(1)?;
                let interval: String = row.get(2)?;
                let min_str: String = row.get(3)?;
                let max_str: String = row.get(4)?;
                let count: i64 = row.get(5)?;
                let first = self.decode_datetime(&min_str)?;
                let last = self.decode_datetime(&max_str)?;
                Ok((symbol, exchange, interval, first, last, count))
            })
            .map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (symbol, exchange, interval, first, last, count) =
                row.map_err(|e: rusqlite::Error| BardepotError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
            summaries.push(BarSummary {
                symbol,
                exchange: Self::decode_exchange(&exchange)?,
                interval: Self::decode_interval(&interval)?,
                range: BarRange {
                    first,
                    last,
                    count: count as usize,
                },
            });
        }

        Ok(summaries)
    }
}
