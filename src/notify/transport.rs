//! Delivery capability for notifications.
//!
//! The wire protocol lives outside this crate; a transport only has to turn
//! a `(channel, message)` pair into a delivery attempt that either succeeds
//! or returns an error.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;

/// External channel notifications are posted to
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a message to a channel
    async fn post(&self, channel_id: &str, message: &str) -> Result<()>;

    /// Name used in log lines
    fn name(&self) -> &str {
        "transport"
    }
}

/// Adapts an async closure into a [`Transport`]
pub struct FnTransport<F> {
    post: F,
}

impl<F> FnTransport<F> {
    pub fn new(post: F) -> Self
    where
        F: Fn(String, String) -> BoxFuture<'static, Result<()>> + Send + Sync,
    {
        Self { post }
    }
}

#[async_trait]
impl<F> Transport for FnTransport<F>
where
    F: Fn(String, String) -> BoxFuture<'static, Result<()>> + Send + Sync,
{
    async fn post(&self, channel_id: &str, message: &str) -> Result<()> {
        (self.post)(channel_id.to_string(), message.to_string()).await
    }

    fn name(&self) -> &str {
        "closure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;
    use futures::FutureExt;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_fn_transport_forwards_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let transport = FnTransport::new(move |channel, message| {
            sink.lock().unwrap().push((channel, message));
            async { Ok(()) }.boxed()
        });

        transport.post("C123", "hello").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("C123".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_fn_transport_propagates_error() {
        let transport =
            FnTransport::new(|_, _| async { Err(GateError::Transport("rate limited".to_string())) }.boxed());
        let err = transport.post("C1", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Transport error: rate limited");
        assert_eq!(transport.name(), "closure");
    }
}
