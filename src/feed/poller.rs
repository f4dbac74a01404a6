//! Periodic quote refresh
//!
//! One tokio task per feed owns the `FeedState`. Ticks follow a fixed
//! wall-clock schedule; a tick that fires while the previous refresh is still
//! in flight is skipped, so at most one request is outstanding and the state
//! is only ever mutated from the loop itself.

use super::{unique_assets, AssetId, AssetQuote, FeedState, FetchError, QuoteSource, Quotes};
use crate::telemetry::{self, RefreshOutcome};
use chrono::Utc;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest accepted refresh interval
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Refresh interval used when none is configured
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Perform a single batched refresh.
///
/// All-or-nothing: the result holds a valid quote for every requested asset,
/// or is an error. Repeated assets are requested once; quotes for assets that
/// were not requested are dropped.
pub async fn refresh_once<S>(source: &S, assets: &[AssetId]) -> Result<Quotes, FetchError>
where
    S: QuoteSource + ?Sized,
{
    let assets = unique_assets(assets.iter().cloned());
    if assets.is_empty() {
        return Ok(Quotes::new());
    }

    let started = Instant::now();
    let result = source
        .fetch_quotes(&assets)
        .await
        .and_then(|quotes| ensure_complete(&quotes, &assets));
    let elapsed = started.elapsed();

    match &result {
        Ok(quotes) => {
            telemetry::record_refresh(RefreshOutcome::Success, elapsed);
            tracing::debug!(
                assets = quotes.len(),
                latency_ms = elapsed.as_millis() as u64,
                "Quotes refreshed"
            );
        }
        Err(e) => {
            telemetry::record_refresh(outcome_for(e), elapsed);
            tracing::warn!(
                error = %e,
                kind = e.kind(),
                latency_ms = elapsed.as_millis() as u64,
                "Quote refresh failed, keeping previous quotes"
            );
        }
    }

    result
}

fn ensure_complete(quotes: &Quotes, assets: &[AssetId]) -> Result<Quotes, FetchError> {
    let mut complete = Quotes::with_capacity(assets.len());
    for asset in assets {
        let quote = quotes
            .get(asset)
            .copied()
            .ok_or_else(|| FetchError::Parse(format!("missing quote for {}", asset)))?;
        if AssetQuote::new(quote.price_usd, quote.change_pct_24h).is_none() {
            return Err(FetchError::Parse(format!(
                "out of range quote for {}: price={} change={}",
                asset, quote.price_usd, quote.change_pct_24h
            )));
        }
        complete.insert(asset.clone(), quote);
    }
    Ok(complete)
}

fn outcome_for(e: &FetchError) -> RefreshOutcome {
    match e {
        FetchError::Network(_) => RefreshOutcome::Network,
        FetchError::Http { .. } => RefreshOutcome::Http,
        FetchError::Parse(_) => RefreshOutcome::Parse,
    }
}

/// Builder for a periodically refreshed price feed
pub struct PriceFeed {
    source: Arc<dyn QuoteSource>,
    assets: Vec<AssetId>,
    interval: Duration,
}

impl PriceFeed {
    /// Create a feed tracking BTC every 30 seconds
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self {
            source,
            assets: vec![AssetId::btc()],
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Set the tracked assets; duplicates are dropped, first occurrence wins
    pub fn assets(mut self, assets: impl IntoIterator<Item = AssetId>) -> Self {
        self.assets = unique_assets(assets);
        self
    }

    /// Set the refresh interval (clamped to `MIN_INTERVAL`)
    pub fn interval(mut self, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                min_ms = MIN_INTERVAL.as_millis() as u64,
                "Refresh interval too short, clamping"
            );
        }
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn tracked_assets(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn refresh_interval(&self) -> Duration {
        self.interval
    }

    /// Start refreshing: once immediately, then on every tick.
    ///
    /// `on_update` runs after each successful refresh with the new state.
    /// Must be called from within a tokio runtime.
    pub fn start<F>(self, on_update: F) -> FeedHandle
    where
        F: FnMut(&FeedState) + Send + 'static,
    {
        let initial = FeedState::new(&self.assets);
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let stopped = Arc::new(AtomicBool::new(false));

        tracing::info!(
            assets = ?self.assets.iter().map(AssetId::symbol).collect::<Vec<_>>(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting price feed"
        );

        let task = tokio::spawn(run_feed_loop(
            self.source,
            self.assets.into(),
            self.interval,
            initial,
            Arc::clone(&stopped),
            state_tx,
            on_update,
        ));

        FeedHandle {
            stopped,
            task,
            state_rx,
        }
    }
}

/// Run the refresh loop until the task is aborted
async fn run_feed_loop<F>(
    source: Arc<dyn QuoteSource>,
    assets: Arc<[AssetId]>,
    interval: Duration,
    mut state: FeedState,
    stopped: Arc<AtomicBool>,
    state_tx: watch::Sender<FeedState>,
    mut on_update: F,
) where
    F: FnMut(&FeedState) + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<BoxFuture<'static, Result<Quotes, FetchError>>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if stopped.load(Ordering::Acquire) {
                    break;
                }
                if in_flight.is_some() {
                    tracing::debug!("Refresh still in flight, skipping tick");
                    telemetry::record_skipped_tick();
                    continue;
                }

                let source = Arc::clone(&source);
                let assets = Arc::clone(&assets);
                in_flight = Some(
                    async move { refresh_once(&*source, &assets).await }.boxed(),
                );
            }

            result = async {
                match in_flight.as_mut() {
                    Some(fut) => fut.await,
                    None => std::future::pending().await,
                }
            } => {
                in_flight = None;

                if stopped.load(Ordering::Acquire) {
                    tracing::debug!("Feed stopped, discarding refresh result");
                    break;
                }

                // Failures were logged by refresh_once; the state stays as is
                if let Ok(quotes) = result {
                    state.apply(&quotes, Utc::now());
                    for (asset, entry) in state.iter() {
                        if let Some(quote) = entry.quote() {
                            telemetry::set_quote(asset, quote);
                        }
                    }
                    state_tx.send_replace(state.clone());
                    on_update(&state);
                }
            }
        }
    }
}

/// Handle to a running feed
///
/// Dropping the handle stops the feed.
pub struct FeedHandle {
    stopped: Arc<AtomicBool>,
    task: JoinHandle<()>,
    state_rx: watch::Receiver<FeedState>,
}

impl FeedHandle {
    /// Cancel all future ticks and any in-flight request. Idempotent.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.task.abort();
        tracing::info!("Price feed stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Snapshot of the latest state
    pub fn state(&self) -> FeedState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified after every successful refresh
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_rx.clone()
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
