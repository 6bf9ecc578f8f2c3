//! Concrete destinations
//!
//! Local sinks (console, file, memory, null), socket sinks with reconnect
//! semantics (Papertrail-style syslog over TCP, WebSocket), UDP syslog, and
//! the batching HTTP family (Slack, webhook, SQS, Nightwatch). The network
//! sinks carry the delivery pipeline's reliability behavior; the local ones
//! are deliberately plain.

pub mod batch;
pub mod console;
pub mod file;
pub mod memory;
pub mod nightwatch;
pub mod null;
pub mod papertrail;
pub mod slack;
pub mod sqs;
pub mod syslog_udp;
pub mod transport;
pub mod webhook;
pub mod websocket;

pub use batch::BatchBuffer;
pub use console::{ConsoleDestination, ConsoleStream};
pub use file::FileDestination;
pub use memory::{MemoryBuffer, MemoryDestination};
pub use nightwatch::NightwatchDestination;
pub use null::NullDestination;
pub use papertrail::PapertrailDestination;
pub use slack::SlackDestination;
pub use sqs::SqsDestination;
pub use syslog_udp::SyslogUdpDestination;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use webhook::WebhookDestination;
pub use websocket::WebSocketDestination;

#[cfg(feature = "http")]
pub use transport::ReqwestTransport;

use crate::core::{DeliveryError, DestinationConfig, LogError, Result};
use crate::wire::rfc5424;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Connect, read, and write timeout applied to every raw socket sink.
pub(crate) const SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a TCP connection with the standard socket-sink settings.
///
/// Tries each resolved address in turn; the last connect error wins when all
/// fail. Nagle is disabled so single log lines go out immediately.
pub(crate) fn connect_tcp(host: &str, port: u16) -> std::result::Result<TcpStream, DeliveryError> {
    let addrs = (host, port).to_socket_addrs()?;
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, SOCKET_TIMEOUT) {
            Ok(stream) => {
                stream.set_read_timeout(Some(SOCKET_TIMEOUT))?;
                stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(match last_err {
        Some(err) => DeliveryError::Io(err),
        None => DeliveryError::rejected(format!("no address resolved for {host}:{port}")),
    })
}

/// Parse the `facility` key shared by the syslog sinks.
///
/// Absent means local0 (16); present but outside 0..=23 is a configuration
/// error rather than a silent fallback.
pub(crate) fn parse_facility(name: &str, config: &DestinationConfig) -> Result<u8> {
    if !config.contains("facility") {
        return Ok(rfc5424::DEFAULT_FACILITY);
    }
    config
        .get_u8("facility")
        .filter(|facility| *facility <= rfc5424::MAX_FACILITY)
        .ok_or_else(|| {
            LogError::config(name, format!("facility must be 0..={}", rfc5424::MAX_FACILITY))
        })
}
