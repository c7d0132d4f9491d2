use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging settings resolved from the environment.
///
/// - `CR_LOG_DIR`: write daily-rotated `<app>.log` files there instead of stderr
/// - `CR_LOG_INCLUDE_BACKTRACE`: also run the default panic hook (prints backtraces)
/// - `RUST_LOG`: filter directives; `default_filter` applies when unset
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub app_name: &'static str,
    pub log_dir: Option<PathBuf>,
    pub include_backtrace: bool,
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn from_env(app_name: &'static str) -> Self {
        Self {
            app_name,
            log_dir: std::env::var_os("CR_LOG_DIR").map(PathBuf::from),
            include_backtrace: std::env::var("CR_LOG_INCLUDE_BACKTRACE")
                .map(|value| is_truthy(&value))
                .unwrap_or(false),
            default_filter: "info".into(),
        }
    }

    /// Overrides the fallback filter, e.g. `warn` for quiet CLI runs.
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Where log output ended up after initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Route panics through `tracing` so they land in the same sink as other events.
/// The hook is installed once per process.
pub fn install_tracing_panic_hook(config: &LoggingConfig) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    let app_name = config.app_name;
    let include_backtrace = config.include_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let thread_name = current_thread_name();
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());

            tracing::error!(
                application = app_name,
                %thread_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

/// Name of the panicking thread ("unknown" for unnamed workers such as the default rayon pool).
fn current_thread_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("unknown")
        .to_string()
}

fn rotating_file_writer(config: &LoggingConfig) -> Option<(BoxMakeWriter, PathBuf)> {
    let dir = config.log_dir.clone()?;
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!(
            "failed to create CR_LOG_DIR {}: {err}; logging to stderr",
            dir.display()
        );
        return None;
    }

    let file_name = format!("{}.log", config.app_name);
    let appender = tracing_appender::rolling::daily(&dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some((BoxMakeWriter::new(non_blocking), dir.join(file_name)))
}

/// Initialize the global subscriber. Calling it again is a no-op for the
/// subscriber itself (the first registration wins).
pub fn init_tracing_subscriber(config: &LoggingConfig) -> LogTarget {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match rotating_file_writer(config) {
        Some((writer, path)) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
            LogTarget::File(path)
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
            LogTarget::Stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy("0"));
    }

    #[test]
    fn stderr_target_without_log_dir() {
        let config = LoggingConfig {
            app_name: "cr-test",
            log_dir: None,
            include_backtrace: false,
            default_filter: "warn".into(),
        };
        assert_eq!(init_tracing_subscriber(&config), LogTarget::Stderr);
        // 2 回目の初期化は失敗せず無視される
        assert_eq!(init_tracing_subscriber(&config), LogTarget::Stderr);
    }

    #[test]
    fn panic_reports_name_the_thread() {
        let name = std::thread::Builder::new()
            .name("cr-scoring-worker".into())
            .spawn(current_thread_name)
            .expect("spawn named thread")
            .join()
            .expect("thread finished");
        assert_eq!(name, "cr-scoring-worker");

        let unnamed = std::thread::spawn(current_thread_name)
            .join()
            .expect("thread finished");
        assert_eq!(unnamed, "unknown");
    }

    #[test]
    fn default_filter_can_be_overridden() {
        let config = LoggingConfig::from_env("cr-test").with_default_filter("debug");
        assert_eq!(config.default_filter, "debug");
        assert_eq!(config.app_name, "cr-test");
    }
}
