//! Configuration validation.
//!
//! Validates config values up front, before any collaborator is constructed.

use crate::domain::error::BardepotError;
use crate::domain::market::{Exchange, Interval};
use crate::ports::config_port::ConfigPort;
use chrono_tz::Tz;

/// Validate the `[import]` section. `symbol`, `exchange` and `interval` may
/// also arrive as CLI overrides, so they are only checked when present;
/// `format` and `timezone` must come from the file.
pub fn validate_import_config(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    validate_format(config)?;
    validate_timezone(config)?;
    validate_delimiter(config)?;
    validate_exchange(config)?;
    validate_interval(config)?;
    Ok(())
}

pub fn validate_sqlite_config(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    if config.get_string("sqlite", "path").is_none() {
        return Err(BardepotError::ConfigMissing {
            section: "sqlite".to_string(),
            key: "path".to_string(),
        });
    }
    if let Some(tz) = config.get_string("sqlite", "timezone") {
        if tz.parse::<Tz>().is_err() {
            return Err(BardepotError::ConfigInvalid {
                section: "sqlite".to_string(),
                key: "timezone".to_string(),
                reason: format!("unknown timezone '{tz}'"),
            });
        }
    }
    Ok(())
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    match config.get_string("import", "format") {
        None => Err(BardepotError::ConfigMissing {
            section: "import".to_string(),
            key: "format".to_string(),
        }),
        Some(fmt) if fmt.trim().is_empty() => Err(BardepotError::ConfigInvalid {
            section: "import".to_string(),
            key: "format".to_string(),
            reason: "format must not be empty".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

fn validate_timezone(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    let tz = config
        .get_string("import", "timezone")
        .ok_or_else(|| BardepotError::ConfigMissing {
            section: "import".to_string(),
            key: "timezone".to_string(),
        })?;
    if tz.parse::<Tz>().is_err() {
        return Err(BardepotError::ConfigInvalid {
            section: "import".to_string(),
            key: "timezone".to_string(),
            reason: format!("unknown timezone '{tz}'"),
        });
    }
    Ok(())
}

fn validate_delimiter(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    match config.get_string("import", "delimiter") {
        None => Ok(()),
        Some(d) if d == "comma" || d == "tab" => Ok(()),
        Some(d) => Err(BardepotError::ConfigInvalid {
            section: "import".to_string(),
            key: "delimiter".to_string(),
            reason: format!("expected 'comma' or 'tab', got '{d}'"),
        }),
    }
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    match config.get_string("import", "exchange") {
        None => Ok(()),
        Some(value) => match Exchange::parse(&value) {
            Some(_) => Ok(()),
            None => Err(BardepotError::ConfigInvalid {
                section: "import".to_string(),
                key: "exchange".to_string(),
                reason: format!("unknown exchange '{value}'"),
            }),
        },
    }
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), BardepotError> {
    match config.get_string("import", "interval") {
        None => Ok(()),
        Some(value) => match Interval::parse(&value) {
            Some(_) => Ok(()),
            None => Err(BardepotError::ConfigInvalid {
                section: "import".to_string(),
                key: "interval".to_string(),
                reason: format!("unknown interval '{value}'"),
            }),
        },
    }
}
