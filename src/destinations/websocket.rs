//! WebSocket destination: one masked text frame per record

use crate::core::{
    diag, DeliveryError, DeliveryMetrics, Destination, DestinationConfig, LogError, Record,
    Reconnector, Result, RetryPolicy,
};
use crate::format::Format;
use crate::wire::ws;
use std::io::{Read, Write};
use std::net::TcpStream;

const NAME: &str = "websocket";

const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_RECONNECT_DELAY: f64 = 1.0;

struct WebSocketSettings {
    host: String,
    port: u16,
    path: String,
}

/// Streams formatted records to a WebSocket server.
///
/// Keys: `url` (required, `ws://host:port/path`), `max_reconnect_attempts`
/// (default 5), `reconnect_delay` (default 1.0s). The reconnect backoff
/// carries random jitter so a fleet of producers does not stampede a
/// restarted collector. Each record goes out as one masked text frame;
/// `close` sends a best-effort close frame first.
pub struct WebSocketDestination {
    format: Box<dyn Format>,
    settings: Option<WebSocketSettings>,
    stream: Option<TcpStream>,
    reconnector: Reconnector,
    metrics: DeliveryMetrics,
}

impl WebSocketDestination {
    pub fn new(format: Box<dyn Format>) -> Self {
        Self {
            format,
            settings: None,
            stream: None,
            reconnector: Reconnector::new(RetryPolicy::new(
                DEFAULT_MAX_RECONNECT_ATTEMPTS,
                DEFAULT_RECONNECT_DELAY,
            ))
            .with_jitter(true),
            metrics: DeliveryMetrics::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// TCP connect plus the opening handshake.
    fn connect(settings: &WebSocketSettings) -> std::result::Result<TcpStream, DeliveryError> {
        let mut stream = super::connect_tcp(&settings.host, settings.port)?;

        let key = ws::handshake_key();
        let request = ws::handshake_request(&settings.host, &settings.path, &key);
        stream.write_all(request.as_bytes())?;

        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(DeliveryError::handshake("connection closed during handshake"));
        }
        let response = String::from_utf8_lossy(&buf[..n]);
        if !ws::handshake_accepted(&response) {
            return Err(DeliveryError::handshake(
                response.lines().next().unwrap_or("empty response").to_string(),
            ));
        }
        Ok(stream)
    }

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

impl Destination for WebSocketDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let raw = config.require_str(NAME, "url")?;
        let parsed = url::Url::parse(raw).map_err(|_| LogError::url(NAME, raw))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| LogError::url(NAME, raw))?
            .to_string();

        let max_attempts = config
            .get_u32("max_reconnect_attempts")
            .unwrap_or(DEFAULT_MAX_RECONNECT_ATTEMPTS);
        let reconnect_delay = config
            .get_f64("reconnect_delay")
            .unwrap_or(DEFAULT_RECONNECT_DELAY);
        if reconnect_delay < 0.0 {
            return Err(LogError::config(NAME, "reconnect_delay must be non-negative"));
        }

        let settings = WebSocketSettings {
            host,
            port: parsed.port().unwrap_or(80),
            path: match parsed.path() {
                "" => "/".to_string(),
                path => path.to_string(),
            },
        };

        self.stream = None;
        self.reconnector =
            Reconnector::new(RetryPolicy::new(max_attempts, reconnect_delay)).with_jitter(true);

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

    fn write(&mut self, text: &str, _record: &Record) {
        if self.settings.is_none() {
            self.metrics.record_dropped();
            return;
        }
        if self.stream.is_none() && !self.try_reconnect() {
            self.metrics.record_dropped();
            return;
        }
        let Some(stream) = &mut self.stream else {
            self.metrics.record_dropped();
            return;
        };

        match stream.write_all(&ws::text_frame(text)) {
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
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.write_all(&ws::close_frame());
        }
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

impl Drop for WebSocketDestination {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use crate::format::RawFormat;
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Accepts one client, completes the upgrade, and returns the text of the
    /// first frame received.
    fn spawn_ws_server(listener: TcpListener) -> JoinHandle<String> {
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let request = String::from_utf8(request).unwrap();
            assert!(request.starts_with("GET /ingest HTTP/1.1\r\n"));
            assert!(request.contains("Upgrade: websocket"));

            stream
                .write_all(
                    b"HTTP/1.1 101 Switching Protocols\r\n\
                      Upgrade: websocket\r\nConnection: Upgrade\r\n\r\n",
                )
                .unwrap();

            let mut header = [0u8; 2];
            stream.read_exact(&mut header).unwrap();
            assert_eq!(header[0], 0x81, "expected a text frame");
            assert_ne!(header[1] & 0x80, 0, "client frames must be masked");
            let length = (header[1] & 0x7F) as usize;

            let mut mask = [0u8; 4];
            stream.read_exact(&mut mask).unwrap();
            let mut payload = vec![0u8; length];
            stream.read_exact(&mut payload).unwrap();
            let unmasked: Vec<u8> = payload
                .iter()
                .enumerate()
                .map(|(i, byte)| byte ^ mask[i % 4])
                .collect();
            String::from_utf8(unmasked).unwrap()
        })
    }

    fn refused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_url_required_and_validated() {
        let mut dest = WebSocketDestination::new(Box::new(RawFormat::new()));
        assert!(dest.open(&DestinationConfig::new()).is_err());
        assert!(dest
            .open(&DestinationConfig::new().set("url", "not a url"))
            .is_err());
    }

    #[test]
    fn test_handshake_and_frame_delivery() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = spawn_ws_server(listener);

        let mut dest = WebSocketDestination::new(Box::new(RawFormat::new()));
        let config =
            DestinationConfig::new().set("url", format!("ws://127.0.0.1:{port}/ingest"));
        assert!(dest.open(&config).unwrap());
        assert!(dest.is_connected());

        dest.write("cache warmed", &Record::new(Level::Info, "cache warmed"));
        dest.close();

        assert_eq!(server.join().unwrap(), "cache warmed");
        assert_eq!(dest.metrics().delivered_count(), 1);
    }

    #[test]
    fn test_open_reports_refusal_without_error() {
        let mut dest = WebSocketDestination::new(Box::new(RawFormat::new()));
        let config = DestinationConfig::new()
            .set("url", format!("ws://127.0.0.1:{}/", refused_port()))
            .set("reconnect_delay", 0.0);

        assert!(!dest.open(&config).unwrap());
        assert!(!dest.is_connected());
    }

    #[test]
    fn test_write_makes_one_reconnect_attempt() {
        let mut dest = WebSocketDestination::new(Box::new(RawFormat::new()));
        let config = DestinationConfig::new()
            .set("url", format!("ws://127.0.0.1:{}/", refused_port()))
            .set("max_reconnect_attempts", 1)
            .set("reconnect_delay", 0.0);
        assert!(!dest.open(&config).unwrap());

        dest.write("gone", &Record::new(Level::Info, "gone"));
        assert_eq!(dest.metrics().reconnect_count(), 1);
        assert_eq!(dest.metrics().dropped_count(), 1);

        // Ceiling of one: the next write drops without another attempt
        dest.write("gone again", &Record::new(Level::Info, "gone again"));
        assert_eq!(dest.metrics().reconnect_count(), 1);
        assert_eq!(dest.metrics().dropped_count(), 2);
    }
}
