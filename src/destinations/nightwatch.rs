//! Laravel Nightwatch log API destination

use crate::core::{DeliveryMetrics, Destination, DestinationConfig, Record, Result, RetryPolicy};
use crate::destinations::batch::{deliver_with_retry, parse_endpoint, retry_policy_from, BatchBuffer};
use crate::destinations::transport::{HttpRequest, HttpTransport};
use crate::format::Format;
use std::time::Duration;

const NAME: &str = "nightwatch";

/// Hosted Nightwatch ingestion endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://nightwatch.laravel.com/api/logs";

const USER_AGENT: &str = concat!("logferry/", env!("CARGO_PKG_VERSION"));

struct NightwatchSettings {
    token: String,
    endpoint: String,
    timeout: Duration,
    application_name: Option<String>,
    policy: RetryPolicy,
}

/// Ships records to the Laravel Nightwatch monitoring service.
///
/// Pairs naturally with [`NightwatchFormat`](crate::format::NightwatchFormat):
/// formatted text that parses as JSON is embedded structurally in the
/// `{"logs": [...]}` payload, anything else travels as a plain string. Keys:
/// `token` (required), `endpoint` (default hosted service), `batch_size`
/// (default 1), `timeout` seconds (default 10), `application_name`,
/// `max_retries`, `retry_delay`. Authenticates with a Bearer token.
pub struct NightwatchDestination {
    format: Box<dyn Format>,
    transport: Box<dyn HttpTransport>,
    settings: Option<NightwatchSettings>,
    buffer: BatchBuffer,
    metrics: DeliveryMetrics,
}

impl NightwatchDestination {
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

    /// Structural embed when the formatted text is JSON, string otherwise.
    fn entry(text: &str, application_name: Option<&str>) -> serde_json::Value {
        let mut entry = serde_json::from_str(text)
            .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
        if let (Some(application), serde_json::Value::Object(map)) = (application_name, &mut entry)
        {
            let extra = map
                .entry("extra")
                .or_insert_with(|| serde_json::Value::Object(Default::default()));
            if let serde_json::Value::Object(extra) = extra {
                extra.insert(
                    "application".to_string(),
                    serde_json::Value::String(application.to_string()),
                );
            }
        }
        entry
    }

    fn send(&self, batch: Vec<serde_json::Value>) {
        let Some(settings) = &self.settings else {
            return;
        };
        let count = batch.len() as u64;
        let request = HttpRequest::new(&settings.endpoint, serde_json::json!({ "logs": batch }))
            .with_header("Authorization", format!("Bearer {}", settings.token))
            .with_header("Accept", "application/json")
            .with_header("User-Agent", USER_AGENT)
            .with_timeout(settings.timeout);

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

impl Destination for NightwatchDestination {
    fn open(&mut self, config: &DestinationConfig) -> Result<bool> {
        let token = config.require_str(NAME, "token")?;
        let endpoint = config.get_str("endpoint").unwrap_or(DEFAULT_ENDPOINT);
        parse_endpoint(NAME, endpoint)?;
        let policy = retry_policy_from(NAME, config)?;
        let timeout = Duration::from_secs(config.get_u64("timeout").unwrap_or(10));

        self.settings = Some(NightwatchSettings {
            token: token.to_string(),
            endpoint: endpoint.to_string(),
            timeout,
            application_name: config.get_str("application_name").map(str::to_string),
            policy,
        });
        self.buffer = BatchBuffer::new(config.get_usize("batch_size").unwrap_or(1));
        Ok(true)
    }

    fn write(&mut self, text: &str, _record: &Record) {
        let Some(settings) = &self.settings else {
            self.metrics.record_dropped();
            return;
        };
        let entry = Self::entry(text, settings.application_name.as_deref());
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

impl Drop for NightwatchDestination {
    fn drop(&mut self) {
        self.close();
    }
}
