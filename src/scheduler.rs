use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::ReadingSource;
use crate::history::Reconciler;
use crate::utils::sync::lock;

pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// User-adjustable refresh settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub auto_refresh: bool,
    /// Raw date-picker value; `None` means no filter.
    pub selected_date: Option<String>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::config::DEFAULT_REFRESH_SECS),
            auto_refresh: true,
            selected_date: None,
        }
    }
}

/// A repeating timer task. Dropping it cancels the task.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTimer {
    /// Calls `on_tick` every `period`, first after one full period.
    pub fn arm<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let start = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives periodic and on-demand refreshes of a [`Reconciler`].
pub struct RefreshScheduler<S> {
    ticker: Ticker<S>,
    timer: Mutex<Option<RefreshTimer>>,
}

struct Ticker<S> {
    reconciler: Reconciler<S>,
    config: Arc<Mutex<RefreshConfig>>,
}

impl<S> Clone for Ticker<S> {
    fn clone(&self) -> Self {
        Self {
            reconciler: self.reconciler.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: ReadingSource> Ticker<S> {
    fn tick(&self) {
        if !lock(&self.config).auto_refresh {
            tracing::trace!("[scheduler] tick skipped, auto-refresh paused");
            return;
        }
        tracing::debug!("[scheduler] refreshing automatically");
        self.spawn_refresh(true);
    }

    fn spawn_refresh(&self, silent: bool) {
        let this = self.clone();
        tokio::spawn(async move { this.refresh(silent).await });
    }

    async fn refresh(&self, silent: bool) {
        let date = lock(&self.config).selected_date.clone();
        match date {
            Some(date) => self.reconciler.fetch_by_date(&date, silent).await,
            None => self.reconciler.fetch_all(silent).await,
        }
    }
}

impl<S: ReadingSource> RefreshScheduler<S> {
    pub fn new(reconciler: Reconciler<S>, config: RefreshConfig) -> Self {
        Self {
            ticker: Ticker {
                reconciler,
                config: Arc::new(Mutex::new(config)),
            },
            timer: Mutex::new(None),
        }
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.ticker.reconciler
    }

    pub fn config(&self) -> RefreshConfig {
        lock(&self.ticker.config).clone()
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        lock(&self.timer).is_some()
    }

    /// Page init: arm the timer, then load current readings and the full history.
    pub async fn launch(&self) {
        let interval = self.config().interval;
        self.start(interval);
        futures::join!(
            self.ticker.reconciler.fetch_current(),
            self.ticker.reconciler.fetch_all(false)
        );
    }

    /// (Re)arms the repeating timer. Safe to call while running.
    pub fn start(&self, interval: Duration) {
        let interval = interval.max(MIN_INTERVAL);
        let mut slot = lock(&self.timer);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        lock(&self.ticker.config).interval = interval;
        let ticker = self.ticker.clone();
        *slot = Some(RefreshTimer::arm(interval, move || ticker.tick()));
        tracing::info!(
            "[scheduler] auto-refresh armed (every {}s)",
            interval.as_secs_f64()
        );
    }

    pub fn stop(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.cancel();
            tracing::info!("[scheduler] auto-refresh stopped");
        }
    }

    /// What the timer does on every period.
    pub fn tick(&self) {
        self.ticker.tick();
    }

    /// Flips auto-refresh. Resuming catches up with one silent refresh.
    pub fn toggle_auto(&self) -> bool {
        let (enabled, interval) = {
            let mut cfg = lock(&self.ticker.config);
            cfg.auto_refresh = !cfg.auto_refresh;
            (cfg.auto_refresh, cfg.interval)
        };
        if enabled {
            tracing::info!("[scheduler] auto-refresh resumed");
            let stale = lock(&self.timer)
                .as_ref()
                .is_some_and(|t| t.period() != interval);
            if stale {
                self.start(interval);
            }
            self.ticker.spawn_refresh(true);
        } else {
            tracing::info!("[scheduler] auto-refresh paused by user");
        }
        enabled
    }

    /// User-triggered refresh with the loading indicator.
    pub async fn refresh_now(&self) {
        tracing::info!("[scheduler] manual refresh");
        self.ticker.refresh(false).await;
    }

    pub fn set_interval_secs(&self, seconds: u64) {
        let interval = Duration::from_secs(seconds).max(MIN_INTERVAL);
        let auto = {
            let mut cfg = lock(&self.ticker.config);
            cfg.interval = interval;
            cfg.auto_refresh
        };
        tracing::info!("[scheduler] interval set to {}s", interval.as_secs());
        if auto {
            self.start(interval);
        }
    }

    /// Sets the date filter (empty clears it) and reloads visibly.
    pub async fn select_date(&self, date: &str) {
        let date = date.trim();
        lock(&self.ticker.config).selected_date = (!date.is_empty()).then(|| date.to_string());
        self.refresh_now().await;
    }

    /// Page teardown.
    pub fn shutdown(&self) {
        self.stop();
        self.ticker.reconciler.shutdown();
    }
}
