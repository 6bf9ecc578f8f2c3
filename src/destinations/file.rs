//! File destination

use crate::core::{diag, DeliveryMetrics, Destination, DestinationConfig, Record, Result};
use crate::format::Format;
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

/// Appends one formatted line per record, CRLF-terminated, to a log file.
///
/// The configured `file_name` may contain `%DATE%`, which expands to the
/// current UTC date as `YYYY-MM-DD.log`: `logs/app-%DATE%` opens
/// `logs/app-2024-09-01.log`.
pub struct FileDestination {
    format: Box<dyn Format>,
    writer: Option<BufWriter<File>>,
    file_name: Option<String>,
    metrics: DeliveryMetrics,
}

impl FileDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            writer: None,
            file_name: None,
            metrics: DeliveryMetrics::new(),
        }
    }

    /// Expand `%DATE%` in a file name mask.
    pub fn build_file_name(mask: &str) -> String {
        mask.replace("%DATE%", &format!("{}.log", Utc::now().format("%Y-%m-%d")))
    }

    /// The resolved file name, once opened.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

impl Destination for FileDestination {
    /// Opens the file in append mode. An unopenable path (missing directory,
    /// permissions) is reported as `Ok(false)`, mirroring a refused network
    /// connection rather than a configuration mistake.
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let mask = config.require_str("file", "file_name")?;
        let name = Self::build_file_name(mask);

        match OpenOptions::new().create(true).append(true).open(&name) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                self.file_name = Some(name);
                Ok(true)
            }
            Err(_) => {
                self.file_name = Some(name);
                Ok(false)
            }
        }
    }

    fn write(&mut self, text: &str, _record: &Record) {
        let Some(writer) = self.writer.as_mut() else {
            self.metrics.record_dropped();
            return;
        };

        match writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.write_all(b"\r\n"))
        {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(err) => {
                diag("file", format!("write failed: {}", err));
                self.metrics.record_dropped();
            }
        }
    }

    fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }

    fn formatter(&self) -> &dyn Format {
        self.format.as_ref()
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        self.close();
    }
}
