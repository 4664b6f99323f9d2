use std::io::Write;
use std::time::Instant;

use anstyle::{AnsiColor, Style};
use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

struct DevshLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    color: bool,
    start: Instant,
}

impl Log for DevshLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        if self.color {
            let style = level_style(level);
            eprintln!("{style}{level:<5}{style:#} devsh: {}", record.args());
        } else {
            eprintln!("{level:<5} devsh: {}", record.args());
        }

        // Also write to file if configured
        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{level}] {} - {}",
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Initialize the global logger. Must be called once before any logging.
///
/// The level comes from `RUST_LOG` and defaults to warnings only, so child
/// output is not interleaved with devsh's own chatter.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::LevelFilter::Warn);

    let logger = DevshLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::IsTerminal::is_terminal(&std::io::stderr()),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}

/// Terminal style used for a log level's tag.
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Blue,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().fg_color(Some(color.into())).bold()
}
