//! Network delivery tests
//!
//! These tests verify:
//! - Batch accumulation and flush-on-capacity
//! - Bounded retry with drop-and-count on exhaustion
//! - Reconnect behavior of the socket sinks against real loopback servers
//! - Wire payloads (RFC 5424 lines, WebSocket frames, SQS/Nightwatch JSON)
//! - Up-front rejection of invalid configuration

use logferry::core::{Context, DeliveryError, Destination, DestinationConfig, Level, Logger, Record};
use logferry::destinations::{
    HttpRequest, HttpResponse, HttpTransport, NightwatchDestination, PapertrailDestination,
    SlackDestination, SqsDestination, SyslogUdpDestination, WebSocketDestination,
    WebhookDestination,
};
use logferry::format::{RawFormat, SlackFormat};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, UdpSocket};
use std::sync::Arc;

/// Records every request and answers with the next scripted status
/// (`Err(())` scripts a transport-level failure). Repeats 200 once the
/// script runs out.
#[derive(Clone, Default)]
struct ScriptedTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    script: Arc<Mutex<VecDeque<Result<u16, ()>>>>,
}

impl ScriptedTransport {
    fn ok() -> Self {
        Self::default()
    }

    fn with_script(script: impl IntoIterator<Item = Result<u16, ()>>) -> Self {
        Self {
            requests: Arc::default(),
            script: Arc::new(Mutex::new(script.into_iter().collect())),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, DeliveryError> {
        self.requests.lock().push(request.clone());
        match self.script.lock().pop_front() {
            Some(Ok(status)) => Ok(HttpResponse {
                status,
                body: String::new(),
            }),
            Some(Err(())) => Err(DeliveryError::rejected("scripted connect failure")),
            None => Ok(HttpResponse {
                status: 200,
                body: String::new(),
            }),
        }
    }
}

/// A transport that never produces a response.
#[derive(Clone, Default)]
struct DeadTransport {
    calls: Arc<Mutex<u64>>,
}

impl HttpTransport for DeadTransport {
    fn post(&self, _request: &HttpRequest) -> Result<HttpResponse, DeliveryError> {
        *self.calls.lock() += 1;
        Err(DeliveryError::rejected("endpoint is down"))
    }
}

/// Bind then drop a listener so the port deterministically refuses.
fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ============================================================================
// Batching and retry
// ============================================================================

#[test]
fn test_batch_accumulates_until_capacity() {
    let transport = ScriptedTransport::ok();
    let dest = SlackDestination::with_transport(
        Box::new(SlackFormat::new()),
        Box::new(transport.clone()),
    );
    let mut logger = Logger::new(Box::new(dest)).with_run_level(Level::Debug);
    logger
        .open(
            &DestinationConfig::new()
                .set("endpoint", "https://hooks.slack.com/services/T0/B0/x")
                .set("batch_size", 3),
        )
        .unwrap();

    logger.error("one");
    logger.error("two");
    assert!(transport.requests().is_empty(), "batch not yet full");

    logger.error("three");
    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "full batch posts exactly once");
    let text = requests[0].body["text"].as_str().unwrap().to_string();
    assert_eq!(text.lines().count(), 3);
    assert_eq!(logger.metrics().delivered_count(), 3);
}

#[test]
fn test_exhausted_retries_drop_the_batch() {
    let transport = DeadTransport::default();
    let mut dest =
        WebhookDestination::with_transport(Box::new(RawFormat::new()), Box::new(transport.clone()));
    dest.open(
        &DestinationConfig::new()
            .set("endpoint", "https://logs.example.com/ingest")
            .set("batch_size", 2)
            .set("max_retries", 3)
            .set("retry_delay", 0.0),
    )
    .unwrap();

    let record = Record::new(Level::Error, "x");
    dest.write("a", &record);
    dest.write("b", &record);

    // 3 attempts for the one batch; both records dropped, never re-queued
    assert_eq!(*transport.calls.lock(), 3);
    assert_eq!(dest.metrics().retry_count(), 2);
    assert_eq!(dest.metrics().dropped_count(), 2);
    assert_eq!(dest.metrics().delivered_count(), 0);
    assert_eq!(dest.pending(), 0);

    // The sink keeps accepting work after a permanent failure
    dest.write("c", &record);
    assert_eq!(dest.pending(), 1);
}

#[test]
fn test_failure_status_retries_then_recovers() {
    let transport = ScriptedTransport::with_script([Ok(500), Ok(200)]);
    let mut dest =
        WebhookDestination::with_transport(Box::new(RawFormat::new()), Box::new(transport.clone()));
    dest.open(
        &DestinationConfig::new()
            .set("endpoint", "https://logs.example.com/ingest")
            .set("retry_delay", 0.0),
    )
    .unwrap();

    dest.write("flaky", &Record::new(Level::Error, "flaky"));

    assert_eq!(transport.requests().len(), 2, "500 then a retry");
    assert_eq!(dest.metrics().retry_count(), 1);
    assert_eq!(dest.metrics().delivered_count(), 1);
    assert_eq!(dest.metrics().dropped_count(), 0);
}

#[test]
fn test_close_flushes_partial_batch_once() {
    let transport = ScriptedTransport::ok();
    let mut dest = SlackDestination::with_transport(
        Box::new(SlackFormat::new()),
        Box::new(transport.clone()),
    );
    dest.open(
        &DestinationConfig::new()
            .set("endpoint", "https://hooks.slack.com/services/T0/B0/x")
            .set("batch_size", 10),
    )
    .unwrap();

    let record = Record::new(Level::Warning, "x");
    dest.write("first", &record);
    dest.write("second", &record);
    dest.close();
    dest.close();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["text"], "first\nsecond");
    assert_eq!(dest.metrics().delivered_count(), 2);
}

// ============================================================================
// Hosted API payloads
// ============================================================================

#[test]
fn test_sqs_batch_envelope_and_signed_headers() {
    let transport = ScriptedTransport::ok();
    let dest = SqsDestination::with_transport(
        Box::new(RawFormat::new()),
        Box::new(transport.clone()),
    );
    let mut logger = Logger::new(Box::new(dest))
        .with_run_level(Level::Debug)
        .with_channel("payments");
    logger
        .open(
            &DestinationConfig::new()
                .set("queue_url", "https://sqs.us-east-1.amazonaws.com/123/logs")
                .set("region", "us-east-1")
                .set("access_key", "AKIA_TEST")
                .set("secret_key", "shhh")
                .set("batch_size", 2),
        )
        .unwrap();

    logger.error("charge failed");
    logger.critical("gateway down");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body["QueueUrl"], "https://sqs.us-east-1.amazonaws.com/123/logs");

    let entries = body["Entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0]["Id"], entries[1]["Id"], "entry ids must be unique");
    for entry in entries {
        let attrs = &entry["MessageAttributes"];
        assert_eq!(attrs["Channel"]["StringValue"], "payments");
        assert!(attrs["LogLevel"]["StringValue"].is_string());
    }

    let headers = &requests[0].headers;
    assert!(headers.contains(&("x-amz-region", "us-east-1".to_string())));
    assert!(headers.contains(&("x-amz-access-key", "AKIA_TEST".to_string())));
    assert_eq!(logger.metrics().delivered_count(), 2);
}

#[test]
fn test_nightwatch_posts_logs_array_with_bearer_auth() {
    let transport = ScriptedTransport::ok();
    let mut dest = NightwatchDestination::with_transport(
        Box::new(RawFormat::new()),
        Box::new(transport.clone()),
    );
    dest.open(
        &DestinationConfig::new()
            .set("token", "nw_secret")
            .set("batch_size", 2),
    )
    .unwrap();

    let record = Record::new(Level::Error, "x");
    dest.write("first entry", &record);
    dest.write("second entry", &record);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, logferry::destinations::nightwatch::DEFAULT_ENDPOINT);
    assert_eq!(requests[0].body["logs"].as_array().unwrap().len(), 2);

    let headers = &requests[0].headers;
    assert!(headers.contains(&("Authorization", "Bearer nw_secret".to_string())));
    assert!(headers
        .iter()
        .any(|(name, value)| *name == "User-Agent" && value.starts_with("logferry/")));
}

// ============================================================================
// Socket sinks over loopback
// ============================================================================

#[test]
fn test_papertrail_line_reaches_collector() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let reader = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).unwrap();
        line
    });

    let dest = PapertrailDestination::new(Box::new(RawFormat::new()));
    let mut logger = Logger::new(Box::new(dest)).with_channel("api");
    let opened = logger
        .open(
            &DestinationConfig::new()
                .set("host", "127.0.0.1")
                .set("port", u32::from(port))
                .set("use_tls", false)
                .set("system_name", "web-1"),
        )
        .unwrap();
    assert!(opened);

    logger.error_with_context(
        "upstream timeout",
        Context::new().with_field("region", "us-east-1"),
    );
    logger.close();

    let line = reader.join().unwrap();
    // local0 (16) * 8 + error (3) = 131
    assert!(line.starts_with("<131>1 "), "got: {line}");
    assert!(line.contains(" web-1 api "));
    assert!(line.contains(r#"[logferry@32473 region="us-east-1"]"#));
    assert!(line.ends_with("upstream timeout\n"));
    assert_eq!(logger.metrics().delivered_count(), 1);
}

#[test]
fn test_papertrail_connects_on_later_write() {
    let port = refused_port();

    let mut dest = PapertrailDestination::new(Box::new(RawFormat::new()));
    let opened = dest
        .open(
            &DestinationConfig::new()
                .set("host", "127.0.0.1")
                .set("port", u32::from(port))
                .set("use_tls", false)
                .set("reconnect_delay", 0.0),
        )
        .unwrap();
    assert!(!opened, "nothing is listening yet");

    // The collector comes up after open; the next write brings the
    // connection with it
    let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();
    let reader = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).unwrap();
        line
    });

    dest.write("recovered", &Record::new(Level::Error, "recovered"));
    dest.close();

    assert!(reader.join().unwrap().ends_with("recovered\n"));
    assert_eq!(dest.metrics().reconnect_count(), 1);
    assert_eq!(dest.metrics().delivered_count(), 1);
    assert_eq!(dest.metrics().dropped_count(), 0);
}

#[test]
fn test_reconnect_ceiling_turns_into_fast_drops() {
    let dest = PapertrailDestination::new(Box::new(RawFormat::new()));
    let mut logger = Logger::new(Box::new(dest));
    let opened = logger
        .open(
            &DestinationConfig::new()
                .set("host", "127.0.0.1")
                .set("port", u32::from(refused_port()))
                .set("use_tls", false)
                .set("max_reconnect_attempts", 2)
                .set("reconnect_delay", 0.0),
        )
        .unwrap();
    assert!(!opened);

    for i in 0..4 {
        logger.error(format!("attempt {}", i));
    }

    // Two bounded attempts, then the ceiling: everything drops, fast
    assert_eq!(logger.metrics().reconnect_count(), 2);
    assert_eq!(logger.metrics().dropped_count(), 4);
    assert_eq!(logger.metrics().delivered_count(), 0);
}

#[test]
fn test_websocket_frame_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Read the upgrade request up to the blank line
        let mut request = Vec::new();
        let mut buf = [0u8; 512];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\n\r\n")
            .unwrap();

        // Decode one masked text frame
        let mut header = [0u8; 2];
        stream.read_exact(&mut header).unwrap();
        assert_eq!(header[0], 0x81);
        assert_ne!(header[1] & 0x80, 0, "client frames must be masked");
        let length = (header[1] & 0x7F) as usize;
        let mut mask = [0u8; 4];
        stream.read_exact(&mut mask).unwrap();
        let mut payload = vec![0u8; length];
        stream.read_exact(&mut payload).unwrap();
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte ^= mask[i % 4];
        }
        String::from_utf8(payload).unwrap()
    });

    let dest = WebSocketDestination::new(Box::new(RawFormat::new()));
    let mut logger = Logger::new(Box::new(dest));
    let opened = logger
        .open(&DestinationConfig::new().set("url", format!("ws://127.0.0.1:{port}/logs")))
        .unwrap();
    assert!(opened);

    logger.error("stream me");
    logger.close();

    assert_eq!(server.join().unwrap(), "stream me");
    assert_eq!(logger.metrics().delivered_count(), 1);
}

#[test]
fn test_udp_syslog_priority_spans_severity_range() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    let address = receiver.local_addr().unwrap().to_string();

    let mut dest = SyslogUdpDestination::new(Box::new(RawFormat::new()));
    let opened = dest
        .open(
            &DestinationConfig::new()
                .set("address", address)
                .set("facility", 3)
                .set("system_name", "daemon-host"),
        )
        .unwrap();
    assert!(opened);

    dest.write("all stop", &Record::new(Level::Emergency, "all stop"));
    dest.write("noisy detail", &Record::new(Level::Debug, "noisy detail"));

    let mut buf = [0u8; 2048];
    let n = receiver.recv(&mut buf).unwrap();
    let first = String::from_utf8_lossy(&buf[..n]).to_string();
    let n = receiver.recv(&mut buf).unwrap();
    let second = String::from_utf8_lossy(&buf[..n]).to_string();

    // daemon (3) * 8 + emergency (0) = 24; + debug (7) = 31
    assert!(first.starts_with("<24>1 "), "got: {first}");
    assert!(second.starts_with("<31>1 "), "got: {second}");
    assert!(!first.ends_with('\n'), "datagrams carry no newline framing");
    assert_eq!(dest.metrics().delivered_count(), 2);
}

// ============================================================================
// Configuration validation
// ============================================================================

#[test]
fn test_invalid_configuration_is_rejected_up_front() {
    let mut slack = SlackDestination::with_transport(
        Box::new(SlackFormat::new()),
        Box::new(ScriptedTransport::ok()),
    );
    let err = slack
        .open(&DestinationConfig::new().set("endpoint", "ftp://not-http"))
        .unwrap_err();
    assert!(err.to_string().contains("Invalid URL"), "got: {err}");

    let mut sqs = SqsDestination::with_transport(
        Box::new(RawFormat::new()),
        Box::new(ScriptedTransport::ok()),
    );
    let err = sqs
        .open(
            &DestinationConfig::new()
                .set("queue_url", "https://sqs.us-east-1.amazonaws.com/123/logs")
                .set("region", "us-east-1")
                .set("batch_size", 11),
        )
        .unwrap_err();
    assert!(err.to_string().contains("batch_size"), "got: {err}");

    let err = sqs
        .open(
            &DestinationConfig::new()
                .set("queue_url", "https://sqs.us-east-1.amazonaws.com/123/logs")
                .set("region", "us-east-1")
                .set("access_key", "AKIA_TEST"),
        )
        .unwrap_err();
    assert!(err.to_string().contains("together"), "got: {err}");

    let mut papertrail = PapertrailDestination::new(Box::new(RawFormat::new()));
    let err = papertrail
        .open(
            &DestinationConfig::new()
                .set("host", "127.0.0.1")
                .set("port", 514)
                .set("use_tls", false)
                .set("facility", 24),
        )
        .unwrap_err();
    assert!(err.to_string().contains("facility"), "got: {err}");

    let mut webhook = WebhookDestination::with_transport(
        Box::new(RawFormat::new()),
        Box::new(ScriptedTransport::ok()),
    );
    let err = webhook
        .open(
            &DestinationConfig::new()
                .set("endpoint", "https://logs.example.com/ingest")
                .set("retry_delay", -1.0),
        )
        .unwrap_err();
    assert!(err.to_string().contains("retry_delay"), "got: {err}");

    let mut websocket = WebSocketDestination::new(Box::new(RawFormat::new()));
    assert!(websocket.open(&DestinationConfig::new()).is_err());
}
