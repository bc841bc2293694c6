//! Event stream transport
//!
//! One server-push subscription = one spawned task reading a streaming
//! GET response through the SSE parser. The task ends on explicit close
//! (cancellation token) or on transport failure; by default a dropped
//! stream stays dropped and the owning UI decides whether to resubscribe.
//! An opt-in reconnect policy adds exponential backoff for deployments
//! that want the stream to heal itself.

use super::parser::{SseEvent, SseParser};
use crate::error::ClientError;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Reconnect behavior after a transport failure.
///
/// Disabled by default: the subscription reports the error and goes dead,
/// and resubscribing is the caller's deliberate act.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    /// First retry delay
    pub initial_delay: Duration,
    /// Exponential backoff cap
    pub max_delay: Duration,
    /// Attempts before giving up for good
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Backoff with the default delays enabled.
    pub fn with_backoff() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Per-subscription transport configuration
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    pub reconnect: ReconnectPolicy,
}

/// Handle to one open subscription.
///
/// `close` tears the transport down deterministically: the read task is
/// cancelled and awaited, so no connection outlives the call. Dropping
/// the handle cancels the task without waiting.
#[derive(Debug)]
pub struct SubscriptionHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Close the subscription and wait for the transport to shut down.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// True once the read task has ended (closed or transport death).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Open a subscription to `url` and dispatch its events to `on_event`.
///
/// Transport errors and parse-level failures go to `on_error`; the stream
/// itself survives payload-level problems, so one bad event never costs
/// the subscription.
pub(crate) fn spawn_event_stream<F, E>(
    client: reqwest::Client,
    url: String,
    config: StreamConfig,
    on_event: F,
    on_error: E,
) -> SubscriptionHandle
where
    F: Fn(SseEvent) + Send + Sync + 'static,
    E: Fn(ClientError) + Send + Sync + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut attempt: u32 = 0;
        loop {
            let received_events = tokio::select! {
                _ = token.cancelled() => return,
                received = run_stream(&client, &url, &on_event, &on_error) => received,
            };

            if !config.reconnect.enabled {
                tracing::debug!(url = %url, "Event stream ended, reconnect disabled");
                return;
            }

            if received_events {
                attempt = 0;
            }
            attempt += 1;
            if attempt > config.reconnect.max_attempts {
                on_error(ClientError::Stream(
                    "reconnect attempts exhausted".to_string(),
                ));
                return;
            }

            let delay = config.reconnect.delay_for(attempt);
            tracing::debug!(url = %url, attempt, ?delay, "Reconnecting event stream");
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    });

    SubscriptionHandle {
        cancel,
        task: Some(task),
    }
}

/// Run one connection to completion. Returns whether any event arrived,
/// so the reconnect loop can tell a healthy-then-dropped stream from one
/// that never came up.
async fn run_stream<F, E>(client: &reqwest::Client, url: &str, on_event: &F, on_error: &E) -> bool
where
    F: Fn(SseEvent) + Send + Sync,
    E: Fn(ClientError) + Send + Sync,
{
    let response = match client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Event stream connect failed");
            on_error(e.into());
            return false;
        }
    };

    if !response.status().is_success() {
        on_error(ClientError::Stream(format!(
            "unexpected status {}",
            response.status()
        )));
        return false;
    }

    tracing::debug!(url = %url, "Event stream open");
    let mut stream = response.bytes_stream();
    let mut parser = SseParser::new();
    let mut received = false;

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for event in parser.feed(&bytes) {
                    received = true;
                    on_event(event);
                }
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Event stream transport error");
                on_error(e.into());
                return received;
            }
        }
    }

    tracing::debug!(url = %url, "Event stream closed by server");
    on_error(ClientError::Stream("stream closed by server".to_string()));
    received
}
