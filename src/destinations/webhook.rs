//! Generic JSON webhook destination

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Record, Result, RetryPolicy};
use crate::destinations::batch::{deliver_with_retry, parse_endpoint, retry_policy_from, BatchBuffer};
use crate::destinations::transport::{HttpRequest, HttpTransport};
use crate::format::Format;
use chrono::SecondsFormat;

const NAME: &str = "webhook";

struct WebhookSettings {
    endpoint: String,
    policy: RetryPolicy,
}

/// POSTs each record to an arbitrary HTTP endpoint as JSON.
///
/// A single record posts one `{timestamp, level, message, channel, context}`
/// object; with `batch_size` above 1 the accumulated entries post as
/// `{"logs": [...]}`. Keys: `endpoint` (required), `batch_size` (default 1),
/// `max_retries`, `retry_delay`.
pub struct WebhookDestination {
    format: Box<dyn Format>,
    transport: Box<dyn HttpTransport>,
    settings: Option<WebhookSettings>,
    buffer: BatchBuffer,
    metrics: DeliveryMetrics,
}

impl WebhookDestination {
    #[cfg(feature = "http")]
    pub fn new(format: Box<dyn Format>) -> Self {
        Self::with_transport(format, Box::new(crate::destinations::ReqwestTransport::new()))
    }

    pub fn with_transport(format: Box<dyn Format>, transport: Box<dyn HttpTransport>) -> Self {
        Self {
            format,
            transport,
            settings: None,
            buffer: BatchBuffer::new(1),
            metrics: DeliveryMetrics::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn entry(text: &str, record: &Record) -> serde_json::Value {
        serde_json::json!({
            "timestamp": record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "level": record.level.api_name(),
            "message": text,
            "channel": record.channel,
            "context": record.context.to_json_value(),
        })
    }

    fn send(&self, batch: Vec<serde_json::Value>) {
        let Some(settings) = &self.settings else {
            return;
        };
        let count = batch.len() as u64;
        let body = if count == 1 {
            batch.into_iter().next().unwrap_or(serde_json::Value::Null)
        } else {
            serde_json::json!({ "logs": batch })
        };

        let request = HttpRequest::new(&settings.endpoint, body);
        deliver_with_retry(
            NAME,
            self.transport.as_ref(),
            &request,
            count,
            &settings.policy,
            &self.metrics,
        );
    }
}

impl Destination for WebhookDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let endpoint = config.require_str(NAME, "endpoint")?;
        parse_endpoint(NAME, endpoint)?;
        let policy = retry_policy_from(NAME, config)?;

        self.settings = Some(WebhookSettings {
            endpoint: endpoint.to_string(),
            policy,
        });
        self.buffer = BatchBuffer::new(config.get_usize("batch_size").unwrap_or(1));
        Ok(true)
    }

    fn write(&mut self, text: &str, record: &Record) {
        if self.settings.is_none() {
            self.metrics.record_dropped();
            return;
        }
        if let Some(batch) = self.buffer.push(Self::entry(text, record)) {
            self.send(batch);
        }
    }

    fn close(&mut self) {
        if let Some(batch) = self.buffer.drain() {
            self.send(batch);
        }
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

impl Drop for WebhookDestination {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, DeliveryError, Level};
    use crate::destinations::transport::HttpResponse;
    use crate::format::RawFormat;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CapturingTransport {
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl HttpTransport for CapturingTransport {
        fn post(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, DeliveryError> {
            self.requests.lock().push(request.clone());
            Ok(HttpResponse {
                status: 204,
                body: String::new(),
            })
        }
    }

    fn open_webhook(config: DestinationConfig) -> (WebhookDestination, CapturingTransport) {
        let transport = CapturingTransport::default();
        let mut dest = WebhookDestination::with_transport(
            Box::new(RawFormat::new()),
            Box::new(transport.clone()),
        );
        dest.open(&config).unwrap();
        (dest, transport)
    }

    #[test]
    fn test_requires_valid_endpoint() {
        let mut dest = WebhookDestination::with_transport(
            Box::new(RawFormat::new()),
            Box::new(CapturingTransport::default()),
        );
        assert!(dest.open(&DestinationConfig::new()).is_err());

        let config = DestinationConfig::new().set("endpoint", "nope");
        assert!(dest.open(&config).is_err());
    }

    #[test]
    fn test_single_record_shape() {
        let config = DestinationConfig::new().set("endpoint", "https://example.com/logs");
        let (mut dest, transport) = open_webhook(config);

        let record = Record::new(Level::Warning, "disk low")
            .with_context(Context::new().with_field("free_mb", 12))
            .with_channel("ops");
        dest.write("disk low", &record);

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 1);
        let body = &requests[0].body;
        assert_eq!(body["level"], "warning");
        assert_eq!(body["message"], "disk low");
        assert_eq!(body["channel"], "ops");
        assert_eq!(body["context"]["free_mb"], 12);
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_batch_posts_logs_array() {
        let config = DestinationConfig::new()
            .set("endpoint", "https://example.com/logs")
            .set("batch_size", 2);
        let (mut dest, transport) = open_webhook(config);
        let record = Record::new(Level::Info, "x");

        dest.write("a", &record);
        assert!(transport.requests.lock().is_empty());
        dest.write("b", &record);

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 1);
        let logs = requests[0].body["logs"].as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["message"], "a");
        assert_eq!(logs[1]["message"], "b");
        assert_eq!(dest.metrics().delivered_count(), 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let config = DestinationConfig::new()
            .set("endpoint", "https://example.com/logs")
            .set("batch_size", 5);
        let (mut dest, transport) = open_webhook(config);

        dest.write("only", &Record::new(Level::Info, "x"));
        dest.close();
        dest.close();

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body["message"], "only");
    }
}
