//! Amazon SQS queue destination

use crate::core::{
    DeliveryMetrics, Destination, DestinationConfig, LogError, Record, Result, RetryPolicy,
};
use crate::destinations::batch::{deliver_with_retry, parse_endpoint, retry_policy_from, BatchBuffer};
use crate::destinations::transport::{HttpRequest, HttpTransport};
use crate::format::Format;
use chrono::SecondsFormat;

const NAME: &str = "sqs";

/// SQS caps a SendMessageBatch call at ten entries.
const MAX_BATCH_SIZE: usize = 10;

struct SqsSettings {
    queue_url: String,
    region: String,
    credentials: Option<(String, String)>,
    policy: RetryPolicy,
}

/// Queues records onto an Amazon SQS queue for downstream processing.
///
/// Keys: `queue_url` and `region` (required), `access_key` + `secret_key`
/// (optional, both or neither), `batch_size` (1..=10, default 1),
/// `max_retries` (floored at 1, default 3), `retry_delay` (default 1.0s).
/// Each entry carries the record as a JSON message body plus `LogLevel` and
/// `Channel` message attributes for queue-side filtering. Request signing is
/// delegated to the endpoint; credentials travel as headers.
pub struct SqsDestination {
    format: Box<dyn Format>,
    transport: Box<dyn HttpTransport>,
    settings: Option<SqsSettings>,
    buffer: BatchBuffer,
    metrics: DeliveryMetrics,
    sequence: u64,
}

impl SqsDestination {
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
            sequence: 0,
        }
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn entry(&mut self, text: &str, record: &Record) -> serde_json::Value {
        self.sequence += 1;

        let channel = record.channel.as_deref().unwrap_or("default");
        let body = serde_json::json!({
            "timestamp": record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "level": record.level_text,
            "level_value": record.level.value(),
            "message": text,
            "channel": channel,
            "context": record.context.to_json_value(),
        });

        let mut attributes = serde_json::json!({
            "LogLevel": { "DataType": "String", "StringValue": record.level_text },
        });
        if let Some(channel) = &record.channel {
            attributes["Channel"] = serde_json::json!({
                "DataType": "String",
                "StringValue": channel,
            });
        }

        serde_json::json!({
            "Id": format!("log_{}", self.sequence),
            "MessageBody": body.to_string(),
            "MessageAttributes": attributes,
        })
    }

    fn send(&self, batch: Vec<serde_json::Value>) {
        let Some(settings) = &self.settings else {
            return;
        };
        let count = batch.len() as u64;
        let envelope = serde_json::json!({
            "QueueUrl": settings.queue_url,
            "Entries": batch,
        });

        let mut request =
            HttpRequest::new(&settings.queue_url, envelope).with_header("x-amz-region", settings.region.clone());
        if let Some((access_key, secret_key)) = &settings.credentials {
            request = request
                .with_header("x-amz-access-key", access_key.clone())
                .with_header("x-amz-secret-key", secret_key.clone());
        }

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

impl Destination for SqsDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let queue_url = config.require_str(NAME, "queue_url")?;
        parse_endpoint(NAME, queue_url)?;
        let region = config.require_str(NAME, "region")?;

        let credentials = match (config.get_str("access_key"), config.get_str("secret_key")) {
            (Some(access_key), Some(secret_key)) => {
                Some((access_key.to_string(), secret_key.to_string()))
            }
            (None, None) => None,
            _ => {
                return Err(LogError::config(
                    NAME,
                    "access_key and secret_key must be provided together",
                ))
            }
        };

        let batch_size = config.get_usize("batch_size").unwrap_or(1);
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(LogError::config(
                NAME,
                format!("batch_size must be between 1 and {MAX_BATCH_SIZE}"),
            ));
        }
        let policy = retry_policy_from(NAME, config)?;

        self.settings = Some(SqsSettings {
            queue_url: queue_url.to_string(),
            region: region.to_string(),
            credentials,
            policy,
        });
        self.buffer = BatchBuffer::new(batch_size);
        Ok(true)
    }

    fn write(&mut self, text: &str, record: &Record) {
        if self.settings.is_none() {
            self.metrics.record_dropped();
            return;
        }
        let entry = self.entry(text, record);
        if let Some(batch) = self.buffer.push(entry) {
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

impl Drop for SqsDestination {
    fn drop(&mut self) {
        self.close();
    }
}
