use parking_lot::Mutex;
/// Debug logging for tabclose
///
/// Routes the `log` facade to a file. The level comes from, in order:
/// - the `--log-level` CLI flag
/// - the DEBUG_LEVEL environment variable:
///   - 0: No debugging
///   - 1: Errors only
///   - 2: Info level (ledger events, flow routing)
///   - 3: Debug level (per-tab detail)
///   - 4: Trace level
/// - `log_level` in the config file
///
/// All output goes to /tmp/tabclose_debug.log on Unix/macOS,
/// or %TEMP%\tabclose_debug.log on Windows.
/// When RUST_LOG is set, lines are mirrored to stderr as well.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use tabclose_config::LogLevel;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    /// Parse a DEBUG_LEVEL value; `None` for anything outside 0-4.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<u8>() {
            Ok(0) => Some(DebugLevel::Off),
            Ok(1) => Some(DebugLevel::Error),
            Ok(2) => Some(DebugLevel::Info),
            Ok(3) => Some(DebugLevel::Debug),
            Ok(4) => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    fn from_env() -> Option<Self> {
        std::env::var("DEBUG_LEVEL")
            .ok()
            .and_then(|val| Self::parse(&val))
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Error,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Pick the effective level: CLI flag, then DEBUG_LEVEL, then config.
pub fn resolve_level(
    cli: Option<LogLevel>,
    env: Option<DebugLevel>,
    config: LogLevel,
) -> log::LevelFilter {
    if let Some(level) = cli {
        return level.to_level_filter();
    }
    if let Some(level) = env {
        return level.to_level_filter();
    }
    config.to_level_filter()
}

/// `log` backend writing to the debug log file
struct DebugLogger {
    level: log::LevelFilter,
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(level: log::LevelFilter) -> Self {
        let file = if level != log::LevelFilter::Off {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(mut f) => {
                    let _ = write!(
                        f,
                        "\n{}\ntabclose debug session started at {} (level={})\n{}\n",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    );
                    Some(f)
                }
                // Logging must never break the run
                Err(_e) => None,
            }
        } else {
            None
        };

        DebugLogger {
            level,
            file: Mutex::new(file),
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        }
    }
}

impl log::Log for DebugLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &get_timestamp(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

fn log_path() -> PathBuf {
    #[cfg(windows)]
    {
        std::env::temp_dir().join("tabclose_debug.log")
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp/tabclose_debug.log")
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_line(timestamp: &str, level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", timestamp, level, target, msg)
}

/// Install the file logger as the `log` backend.
///
/// Returns the effective level. Calling it again keeps the first logger.
pub fn init_log_bridge(cli: Option<LogLevel>, config: LogLevel) -> log::LevelFilter {
    let level = resolve_level(cli, DebugLevel::from_env(), config);
    let logger = LOGGER.get_or_init(|| DebugLogger::new(level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
    logger.level
}
