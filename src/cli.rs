//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_importer::CsvBarImporter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::{validate_import_config, validate_sqlite_config};
use crate::domain::error::BardepotError;
use crate::domain::mapping::ColumnMapping;
use crate::domain::market::{Exchange, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::sink_port::BarSinkPort;

#[derive(Parser, Debug)]
#[command(name = "bardepot", about = "Historical bar data importer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a CSV export into the bar store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored instruments, one SYMBOL.EXCHANGE per line
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the stored data range for an instrument
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(long)]
        interval: Option<String>,
    },
    /// Export summary statistics to a text file
    Summary {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Import {
            config,
            file,
            symbol,
            exchange,
            interval,
            dry_run,
        } => run_import(
            &config,
            &file,
            symbol.as_deref(),
            exchange.as_deref(),
            interval.as_deref(),
            dry_run,
        ),
        Command::ListSymbols { config, output } => run_list_symbols(&config, output.as_deref()),
        Command::Info {
            config,
            symbol,
            exchange,
            interval,
        } => run_info(
            &config,
            symbol.as_deref(),
            exchange.as_deref(),
            interval.as_deref(),
        ),
        Command::Summary { config, output } => run_summary(&config, &output),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BardepotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Column mapping from the `[columns]` section; unset keys fall back to the
/// canonical field names, an unset open_interest key means "no such column".
pub fn build_mapping(config: &dyn ConfigPort) -> ColumnMapping {
    let defaults = ColumnMapping::default();
    let get = |key: &str, default: &str| {
        config
            .get_string("columns", key)
            .unwrap_or_else(|| default.to_string())
    };

    ColumnMapping {
        datetime: get("datetime", &defaults.datetime),
        open: get("open", &defaults.open),
        high: get("high", &defaults.high),
        low: get("low", &defaults.low),
        close: get("close", &defaults.close),
        volume: get("volume", &defaults.volume),
        open_interest: config.get_string("columns", "open_interest"),
    }
}

/// CLI overrides win over `[import]` keys; symbol, exchange and interval
/// must arrive from one of the two.
pub fn resolve_instrument(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
    exchange_override: Option<&str>,
    interval_override: Option<&str>,
) -> Result<(String, Exchange, Interval), BardepotError> {
    let missing = |key: &str| BardepotError::ConfigMissing {
        section: "import".to_string(),
        key: key.to_string(),
    };
    let invalid = |key: &str, value: &str| BardepotError::ConfigInvalid {
        section: "import".to_string(),
        key: key.to_string(),
        reason: format!("unknown value '{value}'"),
    };

    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => config
            .get_string("import", "symbol")
            .ok_or_else(|| missing("symbol"))?,
    };

    let exchange_str = match exchange_override {
        Some(e) => e.to_string(),
        None => config
            .get_string("import", "exchange")
            .ok_or_else(|| missing("exchange"))?,
    };
    let exchange =
        Exchange::parse(&exchange_str).ok_or_else(|| invalid("exchange", &exchange_str))?;

    let interval_str = match interval_override {
        Some(i) => i.to_string(),
        None => config
            .get_string("import", "interval")
            .ok_or_else(|| missing("interval"))?,
    };
    let interval =
        Interval::parse(&interval_str).ok_or_else(|| invalid("interval", &interval_str))?;

    Ok((symbol, exchange, interval))
}

pub fn build_importer(
    config: &dyn ConfigPort,
    file: &Path,
    symbol_override: Option<&str>,
    exchange_override: Option<&str>,
    interval_override: Option<&str>,
) -> Result<CsvBarImporter, BardepotError> {
    let (symbol, exchange, interval) = resolve_instrument(
        config,
        symbol_override,
        exchange_override,
        interval_override,
    )?;

    let datetime_format =
        config
            .get_string("import", "format")
            .ok_or_else(|| BardepotError::ConfigMissing {
                section: "import".to_string(),
                key: "format".to_string(),
            })?;

    let tz_name =
        config
            .get_string("import", "timezone")
            .ok_or_else(|| BardepotError::ConfigMissing {
                section: "import".to_string(),
                key: "timezone".to_string(),
            })?;
    let timezone = tz_name
        .parse()
        .map_err(|_| BardepotError::ConfigInvalid {
            section: "import".to_string(),
            key: "timezone".to_string(),
            reason: format!("unknown timezone '{tz_name}'"),
        })?;

    let delimiter = match config.get_string("import", "delimiter").as_deref() {
        Some("tab") => b'\t',
        _ => b',',
    };

    Ok(CsvBarImporter {
        path: file.to_path_buf(),
        mapping: build_mapping(config),
        datetime_format,
        timezone,
        symbol,
        exchange,
        interval,
        source_tag: config
            .get_string("import", "source_tag")
            .unwrap_or_else(|| "CSV".to_string()),
        delimiter,
        drop_last: config.get_bool("import", "drop_last", false),
    })
}

fn run_import(
    config_path: &Path,
    file: &Path,
    symbol: Option<&str>,
    exchange: Option<&str>,
    interval: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_import_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build the importer
    let importer = match build_importer(&config, file, symbol, exchange, interval) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Importing {} as {}.{} [{}]",
        file.display(),
        importer.symbol,
        importer.exchange,
        importer.interval
    );

    // Stage 3: Dry run stops before the database exists
    if dry_run {
        let iter = match importer.open() {
            Ok(i) => i,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let mut count = 0usize;
        for bar in iter {
            if let Err(e) = bar {
                eprintln!("error: {e}");
                return (&e).into();
            }
            count += 1;
        }
        eprintln!("Dry run complete: {count} bars parsed");
        return ExitCode::SUCCESS;
    }

    // Stage 4: Construct the sink from config
    if let Err(e) = validate_sqlite_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let sink = match SqliteAdapter::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Read the whole batch, fail-fast
    let bars = match importer.import() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        eprintln!("No bars to import");
        return ExitCode::SUCCESS;
    }

    // Stage 6: Hand the batch to the sink
    let saved = match sink.save_bars(&bars) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 7: Emit summary
    match sink.bar_range(&importer.symbol, importer.exchange, importer.interval) {
        Ok(Some(range)) => {
            eprintln!(
                "Imported {saved} bars; {}.{} [{}] now holds {} bars, {} to {}",
                importer.symbol,
                importer.exchange,
                importer.interval,
                range.count,
                range.first.format("%Y-%m-%d %H:%M:%S"),
                range.last.format("%Y-%m-%d %H:%M:%S"),
            );
        }
        _ => eprintln!("Imported {saved} bars"),
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path, output: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_sqlite_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let sink = match SqliteAdapter::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let vt_symbols = match sink.list_vt_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if vt_symbols.is_empty() {
        eprintln!("No bars stored");
    } else {
        for vt_symbol in &vt_symbols {
            println!("{vt_symbol}");
        }
        eprintln!("{} instruments found", vt_symbols.len());
    }

    if let Some(path) = output {
        if let Err(e) = TextReportAdapter.write_symbol_list(&vt_symbols, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Symbol list written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_info(
    config_path: &Path,
    symbol: Option<&str>,
    exchange: Option<&str>,
    interval: Option<&str>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_sqlite_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let sink = match SqliteAdapter::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // With no instrument selection, report everything in the store.
    if symbol.is_none() && exchange.is_none() && interval.is_none() {
        let summaries = match sink.summarize() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        if summaries.is_empty() {
            eprintln!("No bars stored");
        }
        for summary in &summaries {
            println!("{}", summary.line());
        }
        return ExitCode::SUCCESS;
    }

    let (symbol, exchange, interval) =
        match resolve_instrument(&config, symbol, exchange, interval) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

    match sink.bar_range(&symbol, exchange, interval) {
        Ok(Some(range)) => {
            println!(
                "{symbol}.{exchange} [{interval}]: {} bars, {} to {}",
                range.count,
                range.first.format("%Y-%m-%d %H:%M:%S"),
                range.last.format("%Y-%m-%d %H:%M:%S"),
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{symbol}.{exchange} [{interval}]: no data found");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error querying {symbol}.{exchange}: {e}");
            (&e).into()
        }
    }
}

fn run_summary(config_path: &Path, output: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_sqlite_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let sink = match SqliteAdapter::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let summaries = match sink.summarize() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = TextReportAdapter.write_summary(&summaries, output) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!(
        "Summary for {} instruments written to: {}",
        summaries.len(),
        output.display()
    );
    ExitCode::SUCCESS
}
