//! Best-effort notification sink.
//!
//! Every event is formatted, offered to the transport when one is
//! configured, and recorded in an append-only queue. Delivery failures and
//! timeouts end up as log lines; they never reach the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::event::PipelineEvent;
use super::format::format_event;
use super::transport::Transport;
use crate::config::NotifyConfig;

/// Default bound on a single delivery attempt
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Local log used when a message cannot be (or is not) delivered
pub trait FallbackLog: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Fallback that writes through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFallback;

impl FallbackLog for LogFallback {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// One notified event, whatever happened to its delivery
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub event: PipelineEvent,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Notification sink owning the event history of one pipeline run
pub struct Notifier {
    channel_id: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    log: Arc<dyn FallbackLog>,
    timeout: Duration,
    queue: Vec<QueueEntry>,
}

impl Notifier {
    /// A sink with no transport; everything goes to the local log
    pub fn new() -> Self {
        Self {
            channel_id: None,
            transport: None,
            log: Arc::new(LogFallback),
            timeout: DEFAULT_DELIVERY_TIMEOUT,
            queue: Vec::new(),
        }
    }

    /// Channel and timeout from configuration; the transport is attached separately
    pub fn from_config(config: &NotifyConfig) -> Self {
        let mut notifier = Self::new().with_timeout(Duration::from_millis(config.timeout_ms));
        notifier.channel_id = config.channel_id.clone();
        notifier
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_log(mut self, log: Arc<dyn FallbackLog>) -> Self {
        self.log = log;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delivery is attempted only with both a channel and a transport
    pub fn is_enabled(&self) -> bool {
        self.channel_id.is_some() && self.transport.is_some()
    }

    /// Report an event. Never fails.
    pub async fn notify(&mut self, event: PipelineEvent) {
        let message = format_event(&event);

        match (&self.channel_id, &self.transport) {
            (Some(channel_id), Some(transport)) => {
                match tokio::time::timeout(self.timeout, transport.post(channel_id, &message)).await {
                    Ok(Ok(())) => {
                        log::debug!("Delivered {} via {} to {}", event.kind(), transport.name(), channel_id);
                    }
                    Ok(Err(e)) => {
                        self.log.warn(&format!("Notification delivery failed: {}", e));
                        self.log.info(&message);
                    }
                    Err(_) => {
                        self.log.warn(&format!(
                            "Notification delivery timed out after {}ms",
                            self.timeout.as_millis()
                        ));
                        self.log.info(&message);
                    }
                }
            }
            _ => self.log.info(&message),
        }

        self.queue.push(QueueEntry {
            event,
            message,
            timestamp: Utc::now(),
        });
    }

    /// Every event notified so far, in order
    pub fn queue(&self) -> &[QueueEntry] {
        &self.queue
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
