//! Writes the statistics of the cumulative constraints as `{PREFIX} {NAME}={VALUE}` lines.
//!
//! Nothing is written until [`configure_statistic_logging`] has been called; the embedding
//! solver decides where the lines go and how the names are cased.
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how the statistics are written.
pub struct StatisticOptions {
    prefix: String,
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Enables the logging of statistics; only the first call has an effect.
///
/// Without a `writer` the statistics are written to stdout.
pub fn configure_statistic_logging(
    prefix: impl Into<String>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix: prefix.into(),
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

/// Logs the statistic `name` with the given `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        return;
    };
    if let Ok(mut options) = options.lock() {
        let line = format_statistic(&options.prefix, options.casing, name, value);
        let _ = writeln!(options.writer, "{line}");
    }
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

fn format_statistic(
    prefix: &str,
    casing: Option<Case>,
    name: impl Display,
    value: impl Display,
) -> String {
    let name = match casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    format!("{prefix} {name}={value}")
}
