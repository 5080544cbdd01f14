//! Live-preview calling contract.
//!
//! The engine itself is pure, never blocks, and needs no cancellation
//! internally; the scheduling concern lives entirely at the boundary. A
//! driving caller that recalculates while the user types must guarantee:
//!
//! * rapid input changes are coalesced into at most one recalculation per
//!   quiescence window (debounce),
//! * at most one in-flight recalculation is authoritative at a time, and
//! * a superseded in-flight call is cancelled and its late response is
//!   ignored, never merged.
//!
//! [`LivePreview`] packages those guarantees around an arbitrary transport;
//! [`post_calculate`] is the HTTP transport against the REST API.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{Result, ServerError};
use crate::payload::CalcResponse;

/// Options for the live preview driver.
#[derive(Debug, Clone)]
pub struct LiveOptions {
    /// Quiescence window before a pending change triggers a recalculation.
    pub debounce: Duration,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
        }
    }
}

/// Debounced, cancel-superseded recalculation driver.
///
/// Feed input changes through [`LivePreview::input_changed`]; observe the
/// latest authoritative result on the watch channel from
/// [`LivePreview::results`]. A superseded in-flight call is cancelled and
/// dropped, so a stale result can never be published.
pub struct LivePreview {
    changes: mpsc::UnboundedSender<Value>,
    results: watch::Receiver<Option<CalcResponse>>,
    shutdown: CancellationToken,
}

impl LivePreview {
    /// Spawn the driver around a transport function. The transport receives
    /// the request payload and a cancellation token that fires when the call
    /// is superseded.
    pub fn spawn<F, Fut>(transport: F, options: LiveOptions) -> Self
    where
        F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CalcResponse>> + Send + 'static,
    {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        tokio::spawn(run_loop(
            transport,
            options,
            changes_rx,
            results_tx,
            shutdown.clone(),
        ));
        Self {
            changes: changes_tx,
            results: results_rx,
            shutdown,
        }
    }

    /// Record a new input state. Changes arriving within the debounce window
    /// are coalesced; once a recalculation fires, a newer change supersedes
    /// it.
    pub fn input_changed(&self, payload: Value) {
        let _ = self.changes.send(payload);
    }

    /// Latest authoritative result (`None` until the first one lands).
    pub fn results(&self) -> watch::Receiver<Option<CalcResponse>> {
        self.results.clone()
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_loop<F, Fut>(
    transport: F,
    options: LiveOptions,
    mut changes: mpsc::UnboundedReceiver<Value>,
    results: watch::Sender<Option<CalcResponse>>,
    shutdown: CancellationToken,
) where
    F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CalcResponse>> + Send + 'static,
{
    let mut generation: u64 = 0;
    let mut pending: Option<Value> = None;

    loop {
        // Wait for the next input change (a superseding one may already be
        // queued from the previous round).
        let mut latest = match pending.take() {
            Some(value) => value,
            None => tokio::select! {
                _ = shutdown.cancelled() => return,
                msg = changes.recv() => match msg {
                    Some(value) => value,
                    None => return,
                },
            },
        };

        // Debounce: every further change restarts the quiescence window.
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                msg = changes.recv() => match msg {
                    Some(value) => latest = value,
                    None => return,
                },
                _ = tokio::time::sleep(options.debounce) => break,
            }
        }

        // At most one in-flight recalculation is authoritative. A change
        // arriving while it runs cancels it; the superseded future is
        // dropped, so its late response cannot be applied.
        generation += 1;
        let call_token = shutdown.child_token();
        let call = transport(latest, call_token.clone());
        tokio::pin!(call);

        tokio::select! {
            _ = shutdown.cancelled() => return,
            msg = changes.recv() => match msg {
                Some(value) => {
                    debug!(generation, "recalculation superseded");
                    call_token.cancel();
                    pending = Some(value);
                }
                None => return,
            },
            outcome = &mut call => match outcome {
                Ok(response) => {
                    debug!(generation, "recalculation published");
                    let _ = results.send(Some(response));
                }
                Err(e) => warn!(generation, "recalculation failed: {e}"),
            },
        }
    }
}

/// POST the payload to the calculation endpoint, honouring cancellation.
pub async fn post_calculate(
    client: &Client,
    base_url: &str,
    payload: Value,
    cancel: CancellationToken,
) -> Result<CalcResponse> {
    let url = format!("{}/api/calculate", base_url.trim_end_matches('/'));
    let request = client.post(&url).json(&payload).send();

    tokio::select! {
        _ = cancel.cancelled() => Err(ServerError::Cancelled),
        response = request => {
            let response = response?.error_for_status()?;
            Ok(response.json::<CalcResponse>().await?)
        }
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
