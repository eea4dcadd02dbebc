use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::str::FromStr;

/// Parses a level name such as `"debug"` or `"warn"`, falling back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Info)
}

/// Installs the global logger. Only the first call wins.
pub fn init_logging(level: &str) -> Result<(), log::SetLoggerError> {
    SimpleLogger::new().with_level(parse_level(level)).init()?;
    log::debug!("logging initialized at {}", parse_level(level));
    Ok(())
}
