//! Logging setup for the helpers.
//!
//! Natively the subscriber honours `RUST_LOG`; in the browser events are written
//! to the developer console without timestamps or ANSI colours.

use std::fmt::Debug;

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::UiError;

/// Default logging level when no filter is provided.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive used when the environment provides none.
    pub level: &'a str,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`UiError::Logging`] if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<(), UiError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level));

    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false);
    #[cfg(target_arch = "wasm32")]
    let builder = builder
        .without_time()
        .with_ansi(false)
        .with_writer(console::ConsoleMakeWriter);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|err| UiError::Logging {
        detail: err.to_string(),
    })
}

/// Log a failed page callback and hand the error back to the caller.
pub fn log_callback_failure<T, E: Debug>(callback: &str, result: Result<T, E>) -> Option<E> {
    let err = result.err()?;
    tracing::warn!(callback, error = ?err, "request callback threw");
    Some(err)
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    /// Routes formatted events to `console.log` / `warn` / `error`.
    pub(super) struct ConsoleMakeWriter;

    pub(super) struct ConsoleWriter {
        level: Level,
        buffer: Vec<u8>,
    }

    impl ConsoleWriter {
        const fn new(level: Level) -> Self {
            Self {
                level,
                buffer: Vec::new(),
            }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let text = String::from_utf8_lossy(&self.buffer);
            let text = text.trim_end().to_string();
            if text.is_empty() {
                return;
            }
            match self.level {
                Level::ERROR => gloo::console::error!(text),
                Level::WARN => gloo::console::warn!(text),
                _ => gloo::console::log!(text),
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter::new(Level::INFO)
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter::new(*meta.level())
        }
    }
}
