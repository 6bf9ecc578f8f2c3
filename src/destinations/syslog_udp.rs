//! Local syslog over UDP

use crate::core::{diag, DeliveryMetrics, Destination, DestinationConfig, Record, Result};
use crate::format::Format;
use crate::wire::rfc5424;
use std::net::UdpSocket;

const NAME: &str = "syslog";

const DEFAULT_ADDRESS: &str = "127.0.0.1:514";

struct SyslogSettings {
    facility: u8,
    system_name: String,
    sd_id: String,
}

/// Sends one RFC 5424 datagram per record to a syslog daemon.
///
/// Keys: `address` (default `127.0.0.1:514`), `facility` (0..=23, default
/// 16), `system_name`, `sd_id`. UDP is fire-and-forget: there is no
/// connection to lose and no reconnect machinery; a send error drops that
/// record and the next write simply tries again.
pub struct SyslogUdpDestination {
    format: Box<dyn Format>,
    settings: Option<SyslogSettings>,
    socket: Option<UdpSocket>,
    metrics: DeliveryMetrics,
}

impl SyslogUdpDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            settings: None,
            socket: None,
            metrics: DeliveryMetrics::new(),
        }
    }
}

impl Destination for SyslogUdpDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let address = config.get_str("address").unwrap_or(DEFAULT_ADDRESS);
        let facility = super::parse_facility(NAME, config)?;

        self.settings = Some(SyslogSettings {
            facility,
            system_name: config
                .get_str("system_name")
                .map(str::to_string)
                .unwrap_or_else(rfc5424::default_hostname),
            sd_id: config
                .get_str("sd_id")
                .unwrap_or("logferry@32473")
                .to_string(),
        });

        let socket = UdpSocket::bind("0.0.0.0:0").and_then(|socket| {
            socket.connect(address)?;
            Ok(socket)
        });
        match socket {
            Ok(socket) => {
                self.socket = Some(socket);
                Ok(true)
            }
            Err(err) => {
                diag(NAME, format!("cannot reach {address}: {err}"));
                Ok(false)
            }
        }
    }

    fn write(&mut self, text: &str, record: &Record) {
        let (Some(settings), Some(socket)) = (&self.settings, &self.socket) else {
            self.metrics.record_dropped();
            return;
        };
        let message = rfc5424::format_message(
            settings.facility,
            &settings.system_name,
            &settings.sd_id,
            text,
            record,
        );
        match socket.send(message.as_bytes()) {
            Ok(_) => {
                self.metrics.record_delivered();
            }
            Err(err) => {
                diag(NAME, format!("send failed: {err}"));
                self.metrics.record_dropped();
            }
        }
    }

    fn close(&mut self) {
        self.socket = None;
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
