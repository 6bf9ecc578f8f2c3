//! Papertrail destination: RFC 5424 syslog over TCP, plain or TLS

use crate::core::{
    diag, DeliveryError, DeliveryMetrics, Destination, DestinationConfig, LogError, Record,
    Reconnector, Result, RetryPolicy,
};
use crate::format::Format;
use crate::wire::rfc5424;
use std::io::Write;
use std::net::TcpStream;

const NAME: &str = "papertrail";

const DEFAULT_SD_ID: &str = "logferry@32473";
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_RECONNECT_DELAY: f64 = 1.0;

struct PapertrailSettings {
    host: String,
    port: u16,
    use_tls: bool,
    facility: u8,
    system_name: String,
    sd_id: String,
}

enum SyslogStream {
    Plain(TcpStream),
    #[cfg(feature = "tls")]
    Tls(Box<native_tls::TlsStream<TcpStream>>),
}

impl Write for SyslogStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            SyslogStream::Plain(stream) => stream.write(buf),
            #[cfg(feature = "tls")]
            SyslogStream::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            SyslogStream::Plain(stream) => stream.flush(),
            #[cfg(feature = "tls")]
            SyslogStream::Tls(stream) => stream.flush(),
        }
    }
}

/// Ships RFC 5424 syslog lines to a Papertrail-style TCP collector.
///
/// Keys: `host` + `port` (required), `use_tls` (default true), `facility`
/// (0..=23, default 16 for local0), `system_name` (default: `HOSTNAME`
/// environment variable), `sd_id` (default `logferry@32473`),
/// `max_reconnect_attempts` (default 5), `reconnect_delay` (default 1.0s).
///
/// `open` makes exactly one connection attempt and reports refusal as
/// `Ok(false)`; the configuration is kept, so a later `write` can still bring
/// the connection up. A failed write closes the socket and the *next* write
/// triggers one reconnect attempt under exponential backoff, until the
/// attempt ceiling is reached and messages drop fast.
pub struct PapertrailDestination {
    format: Box<dyn Format>,
    settings: Option<PapertrailSettings>,
    stream: Option<SyslogStream>,
    reconnector: Reconnector,
    metrics: DeliveryMetrics,
}

impl PapertrailDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            settings: None,
            stream: None,
            reconnector: Reconnector::new(RetryPolicy::new(
                DEFAULT_MAX_RECONNECT_ATTEMPTS,
                DEFAULT_RECONNECT_DELAY,
            )),
            metrics: DeliveryMetrics::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn connect(settings: &PapertrailSettings) -> std::result::Result<SyslogStream, DeliveryError> {
        let stream = super::connect_tcp(&settings.host, settings.port)?;
        if settings.use_tls {
            #[cfg(feature = "tls")]
            {
                let connector = native_tls::TlsConnector::new()
                    .map_err(|err| DeliveryError::handshake(err.to_string()))?;
                let tls = connector
                    .connect(&settings.host, stream)
                    .map_err(|err| DeliveryError::handshake(err.to_string()))?;
                return Ok(SyslogStream::Tls(Box::new(tls)));
            }
            #[cfg(not(feature = "tls"))]
            {
                return Err(DeliveryError::handshake("tls feature not enabled"));
            }
        }
        Ok(SyslogStream::Plain(stream))
    }

    /// One bounded reconnect attempt; true when the socket is up again.
    fn try_reconnect(&mut self) -> bool {
        let Some(settings) = &self.settings else {
            return false;
        };
        if !self.reconnector.begin_attempt() {
            return false;
        }
        self.metrics.record_reconnect();
        match Self::connect(settings) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.reconnector.mark_connected();
                true
            }
            Err(err) => {
                diag(NAME, format!("reconnect failed: {err}"));
                false
            }
        }
    }
}

impl Destination for PapertrailDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let host = config.require_str(NAME, "host")?;
        let port = config.require_u16(NAME, "port")?;
        let use_tls = config.get_bool("use_tls").unwrap_or(true);
        if use_tls && cfg!(not(feature = "tls")) {
            return Err(LogError::config(
                NAME,
                "use_tls requires the tls crate feature",
            ));
        }

        let facility = super::parse_facility(NAME, config)?;
        let max_attempts = config
            .get_u32("max_reconnect_attempts")
            .unwrap_or(DEFAULT_MAX_RECONNECT_ATTEMPTS);
        let reconnect_delay = config
            .get_f64("reconnect_delay")
            .unwrap_or(DEFAULT_RECONNECT_DELAY);
        if reconnect_delay < 0.0 {
            return Err(LogError::config(NAME, "reconnect_delay must be non-negative"));
        }

        let settings = PapertrailSettings {
            host: host.to_string(),
            port,
            use_tls,
            facility,
            system_name: config
                .get_str("system_name")
                .map(str::to_string)
                .unwrap_or_else(rfc5424::default_hostname),
            sd_id: config.get_str("sd_id").unwrap_or(DEFAULT_SD_ID).to_string(),
        };

        self.stream = None;
        self.reconnector = Reconnector::new(RetryPolicy::new(max_attempts, reconnect_delay));

        let connected = match Self::connect(&settings) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.reconnector.mark_connected();
                true
            }
            Err(err) => {
                diag(NAME, format!("connect failed: {err}"));
                false
            }
        };
        self.settings = Some(settings);
        Ok(connected)
    }

    fn write(&mut self, text: &str, record: &Record) {
        let Some(settings) = &self.settings else {
            self.metrics.record_dropped();
            return;
        };
        let mut line =
            rfc5424::format_message(settings.facility, &settings.system_name, &settings.sd_id, text, record);
        line.push('\n');

        if self.stream.is_none() && !self.try_reconnect() {
            self.metrics.record_dropped();
            return;
        }
        let Some(stream) = &mut self.stream else {
            self.metrics.record_dropped();
            return;
        };

        match stream.write_all(line.as_bytes()) {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(err) => {
                diag(NAME, format!("write failed: {err}"));
                self.stream = None;
                self.reconnector.mark_disconnected();
                self.metrics.record_dropped();
            }
        }
    }

    fn close(&mut self) {
        self.stream = None;
        self.reconnector.mark_disconnected();
    }

    fn formatter(&self) -> &dyn Format {
        self.format.as_ref()
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }
}

impl Drop for PapertrailDestination {
    fn drop(&mut self) {
        self.close();
    }
}
