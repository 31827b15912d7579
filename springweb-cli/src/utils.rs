//! Some utilities

use std::path::{Path, PathBuf};

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// Most detailed level written to the log file. Per-frame statistics are
/// logged at `Debug` and only show up with `verbose`.
pub fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Sibling of `log_path` named `<stem>-err`.
pub fn err_log_path(log_path: &Path) -> Option<PathBuf> {
    let stem = log_path.file_stem()?.to_str()?;
    Some(log_path.with_file_name(format!("{stem}-err")))
}

/// Configures the logger.
///
/// Logs go to `./logs/<file_name>`, rotated daily. Warnings and errors raised
/// by ftlog's own appender (failed writes, rotation problems) go to
/// `./logs/<stem>-err` so they do not end up in the file they concern.
///
/// # Errors
///
/// - If a logs directory could not be located/created.
/// - If the logger could not be initialized.
pub fn configure_logger(file_name: &str, verbose: bool) -> Result<(LoggerGuard, PathBuf), String> {
    let root_dir = PathBuf::from(".").canonicalize().map_err(|e| e.to_string())?;
    let logs_dir = root_dir.join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(file_name);

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let err_path = err_log_path(&log_path).ok_or_else(|| format!("invalid log file name '{file_name}'"))?;

    let guard = ftlog::Builder::new()
        .max_log_level(log_level(verbose))
        .root(writer)
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Warn)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}
