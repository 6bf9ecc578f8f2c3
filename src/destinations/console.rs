//! Console destination

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Level, LogError, Record, Result};
use crate::format::Format;

/// Which standard stream receives the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    StdOut,
    StdErr,
    /// Records below [`Level::Error`] go to stdout, the rest to stderr.
    #[default]
    Split,
}

impl ConsoleStream {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "stdout" => Some(ConsoleStream::StdOut),
            "stderr" => Some(ConsoleStream::StdErr),
            "split" => Some(ConsoleStream::Split),
            _ => None,
        }
    }
}

/// Writes formatted records to stdout/stderr.
///
/// The `stream` configuration key selects the policy (`"stdout"`, `"stderr"`,
/// `"split"`); with the `console` feature the whole line is colored by level
/// unless `color` is set to false.
pub struct ConsoleDestination {
    format: Box<dyn Format>,
    stream: ConsoleStream,
    use_colors: bool,
    metrics: DeliveryMetrics,
}

impl ConsoleDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            stream: ConsoleStream::default(),
            use_colors: true,
            metrics: DeliveryMetrics::new(),
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, enable: bool) -> Self {
        self.use_colors = enable;
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    #[cfg(feature = "console")]
    fn render(&self, text: &str, level: Level) -> String {
        use colored::Colorize;
        if self.use_colors {
            text.color(level.color_code()).to_string()
        } else {
            text.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn render(&self, text: &str, _level: Level) -> String {
        text.to_string()
    }
}

impl Destination for ConsoleDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        if let Some(stream) = config.get_str("stream") {
            self.stream = ConsoleStream::parse(stream).ok_or_else(|| {
                LogError::config(
                    "console",
                    format!("unknown stream '{}', expected stdout|stderr|split", stream),
                )
            })?;
        }
        if let Some(color) = config.get_bool("color") {
            self.use_colors = color;
        }
        Ok(true)
    }

    fn write(&mut self, text: &str, record: &Record) {
        let line = self.render(text, record.level);
        let to_stderr = match self.stream {
            ConsoleStream::StdOut => false,
            ConsoleStream::StdErr => true,
            ConsoleStream::Split => record.level >= Level::Error,
        };

        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        self.metrics.record_delivered();
    }

    fn close(&mut self) {
        use std::io::Write;
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }

    fn formatter(&self) -> &dyn Format {
        self.format.as_ref()
    }

    fn name(&self) -> &'static str {
        "console"
    }

    fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }
}
