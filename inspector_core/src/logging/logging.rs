// inspector_core/src/logging/logging.rs
use std::io::*;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use flexi_logger::*;
use log::Record;
use once_cell::sync::Lazy;
use crate::constants::LOG_BASENAME;

// Most recent message, shown by hosts in their status area.
pub static LAST_LOG: Lazy<Mutex<String>> = Lazy::new(|| Mutex::new(String::new()));

/// Logs through `log` and remembers the message so the host can display it.
#[macro_export]
macro_rules! inspector_log {
    ($lvl:expr, $($arg:tt)*) => {{
        log::log!($lvl, $($arg)*);
        $crate::logging::logging::set_last_log(format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! inspector_info  { ($($arg:tt)*) => { $crate::inspector_log!(log::Level::Info,  $($arg)*) }; }

#[macro_export]
macro_rules! inspector_warn  { ($($arg:tt)*) => { $crate::inspector_log!(log::Level::Warn,  $($arg)*) }; }

#[macro_export]
macro_rules! inspector_error { ($($arg:tt)*) => { $crate::inspector_log!(log::Level::Error, $($arg)*) }; }

/// Debug output is not kept in `LAST_LOG`.
#[macro_export]
macro_rules! inspector_debug { ($($arg:tt)*) => { log::log!(log::Level::Debug, $($arg)*) }; }

/// Replaces the remembered message.
pub fn set_last_log(message: String) {
    let mut buf = LAST_LOG.lock().unwrap_or_else(PoisonError::into_inner);
    *buf = message;
}

/// Returns a copy of the most recent message.
pub fn last_log() -> String {
    LAST_LOG.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Initializes the rotating file logger inside `log_dir`.
pub fn init_file_logger(log_dir: &Path, spec: &str) -> std::result::Result<LoggerHandle, FlexiLoggerError> {
    let file_spec = FileSpec::default()
        .directory(log_dir)
        .basename(LOG_BASENAME)
        .suffix("log");

    let handle = Logger::try_with_str(spec)?
        .log_to_file(file_spec)
        .format(inspector_formatter)
        .rotate(
            Criterion::Size(5_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(5),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .start()?;

    crate::inspector_info!("Log dir: {}.", log_dir.display());
    Ok(handle)
}

fn inspector_formatter(
    write: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<()> {
    write!(
        write,
        "{} {:5} [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        &record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_macro_remembers_message() {
        crate::inspector_warn!("key `{}` has no member", "speed");
        // Other tests may log concurrently, so only check the shape.
        assert!(!last_log().is_empty());
    }
}
