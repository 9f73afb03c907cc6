//! Market venue and bar period identifiers.

use std::fmt;

/// Trading venue an instrument is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    Cffex,
    Shfe,
    Czce,
    Dce,
    Ine,
    Sse,
    Szse,
    Sge,
    Nyse,
    Nasdaq,
    Smart,
    Globex,
    Idealpro,
    Cme,
    Nymex,
    Binance,
    Huobi,
    Okex,
    Local,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Cffex => "CFFEX",
            Exchange::Shfe => "SHFE",
            Exchange::Czce => "CZCE",
            Exchange::Dce => "DCE",
            Exchange::Ine => "INE",
            Exchange::Sse => "SSE",
            Exchange::Szse => "SZSE",
            Exchange::Sge => "SGE",
            Exchange::Nyse => "NYSE",
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Smart => "SMART",
            Exchange::Globex => "GLOBEX",
            Exchange::Idealpro => "IDEALPRO",
            Exchange::Cme => "CME",
            Exchange::Nymex => "NYMEX",
            Exchange::Binance => "BINANCE",
            Exchange::Huobi => "HUOBI",
            Exchange::Okex => "OKEX",
            Exchange::Local => "LOCAL",
        }
    }

    /// Case-insensitive lookup by venue code.
    pub fn parse(s: &str) -> Option<Exchange> {
        let code = s.trim().to_uppercase();
        match code.as_str() {
            "CFFEX" => Some(Exchange::Cffex),
            "SHFE" => Some(Exchange::Shfe),
            "CZCE" => Some(Exchange::Czce),
            "DCE" => Some(Exchange::Dce),
            "INE" => Some(Exchange::Ine),
            "SSE" => Some(Exchange::Sse),
            "SZSE" => Some(Exchange::Szse),
            "SGE" => Some(Exchange::Sge),
            "NYSE" => Some(Exchange::Nyse),
            "NASDAQ" => Some(Exchange::Nasdaq),
            "SMART" => Some(Exchange::Smart),
            "GLOBEX" => Some(Exchange::Globex),
            "IDEALPRO" => Some(Exchange::Idealpro),
            "CME" => Some(Exchange::Cme),
            "NYMEX" => Some(Exchange::Nymex),
            "BINANCE" => Some(Exchange::Binance),
            "HUOBI" => Some(Exchange::Huobi),
            "OKEX" => Some(Exchange::Okex),
            "LOCAL" => Some(Exchange::Local),
            _ => None,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute,
    Hour,
    Daily,
    Weekly,
}

impl Interval {
    /// Short code used in config files and storage.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Minute => "1m",
            Interval::Hour => "1h",
            Interval::Daily => "d",
            Interval::Weekly => "w",
        }
    }

    pub fn parse(s: &str) -> Option<Interval> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "minute" => Some(Interval::Minute),
            "1h" | "hour" => Some(Interval::Hour),
            "d" | "daily" => Some(Interval::Daily),
            "w" | "weekly" => Some(Interval::Weekly),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
