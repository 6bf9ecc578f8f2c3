//! Slack incoming-webhook destination

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Record, Result, RetryPolicy};
use crate::destinations::batch::{deliver_with_retry, parse_endpoint, retry_policy_from, BatchBuffer};
use crate::destinations::transport::{HttpRequest, HttpTransport};
use crate::format::Format;

const NAME: &str = "slack";

struct SlackSettings {
    endpoint: String,
    channel: Option<String>,
    username: Option<String>,
    icon_emoji: Option<String>,
    policy: RetryPolicy,
}

/// Posts formatted records to a Slack incoming webhook.
///
/// Configuration keys: `endpoint` (required, webhook URL), `channel`,
/// `username`, `icon_emoji` (optional, forwarded verbatim in the payload),
/// `batch_size` (default 1), `max_retries`, `retry_delay`. With a batch size
/// above 1, the batched lines are joined with newlines into a single Slack
/// message.
pub struct SlackDestination {
    format: Box<dyn Format>,
    transport: Box<dyn HttpTransport>,
    settings: Option<SlackSettings>,
    buffer: BatchBuffer,
    metrics: DeliveryMetrics,
}

impl SlackDestination {
    #[cfg(feature = "http")]
    pub fn new(format: Box<dyn Format>) -> Self {
        Self::with_transport(format, Box::new(crate::destinations::ReqwestTransport::new()))
    }

    /// Construct with an explicit transport. Tests inject a counting or
    /// failing transport here.
    pub fn with_transport(format: Box<dyn Format>, transport: Box<dyn HttpTransport>) -> Self {
        Self {
            format,
            transport,
            settings: None,
            buffer: BatchBuffer::new(1),
            metrics: DeliveryMetrics::new(),
        }
    }

    /// Number of lines waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn send(&self, batch: Vec<serde_json::Value>) {
        let Some(settings) = &self.settings else {
            return;
        };
        let count = batch.len() as u64;
        let text = batch
            .iter()
            .filter_map(|entry| entry.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut payload = serde_json::json!({ "text": text });
        if let Some(channel) = &settings.channel {
            payload["channel"] = serde_json::Value::String(channel.clone());
        }
        if let Some(username) = &settings.username {
            payload["username"] = serde_json::Value::String(username.clone());
        }
        if let Some(icon) = &settings.icon_emoji {
            payload["icon_emoji"] = serde_json::Value::String(icon.clone());
        }

        let request = HttpRequest::new(&settings.endpoint, payload);
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

impl Destination for SlackDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let endpoint = config.require_str(NAME, "endpoint")?;
        parse_endpoint(NAME, endpoint)?;
        let policy = retry_policy_from(NAME, config)?;

        self.settings = Some(SlackSettings {
            endpoint: endpoint.to_string(),
            channel: config.get_str("channel").map(str::to_string),
            username: config.get_str("username").map(str::to_string),
            icon_emoji: config.get_str("icon_emoji").map(str::to_string),
            policy,
        });
        self.buffer = BatchBuffer::new(config.get_usize("batch_size").unwrap_or(1));
        Ok(true)
    }

    fn write(&mut self, text: &str, _record: &Record) {
        if self.settings.is_none() {
            self.metrics.record_dropped();
            return;
        }
        if let Some(batch) = self.buffer.push(serde_json::Value::String(text.to_string())) {
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

impl Drop for SlackDestination {
    fn drop(&mut self) {
        self.close();
    }
}
