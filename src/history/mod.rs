pub mod day;
pub mod series;

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use crate::api::ReadingSource;
use crate::chart::{ChartSurface, LineChartConfig, RenderedChart};
use crate::shared::types::{HistoryQuery, Reading};
use crate::utils::sync::lock;

use self::day::normalize_day;
use self::series::ChartSeries;

/// Everything the page shows, observable through [`Reconciler::subscribe`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub current: Vec<Reading>,
    pub history: Vec<Reading>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub last_fetch_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    /// A silent refresh returned more records than the window held before.
    NewRecords {
        count: usize,
        day: Option<NaiveDate>,
    },
    Rendered {
        points: usize,
    },
    /// A refresh failed and the window was emptied.
    Cleared,
}

/// Delay between replacing the window and drawing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTiming {
    pub all: Duration,
    pub by_day: Duration,
}

impl RenderTiming {
    pub fn immediate() -> Self {
        Self {
            all: Duration::ZERO,
            by_day: Duration::ZERO,
        }
    }

    fn for_query(&self, query: HistoryQuery) -> Duration {
        match query {
            HistoryQuery::All => self.all,
            HistoryQuery::Day(_) => self.by_day,
        }
    }
}

impl Default for RenderTiming {
    fn default() -> Self {
        Self {
            all: Duration::from_millis(500),
            by_day: Duration::from_millis(300),
        }
    }
}

/// Fetches history, swaps it into the window and redraws the chart.
pub struct Reconciler<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<S> {
    source: S,
    surface: Arc<dyn ChartSurface>,
    state: watch::Sender<PageState>,
    events: broadcast::Sender<HistoryEvent>,
    chart: Mutex<Option<Box<dyn RenderedChart>>>,
    timing: RenderTiming,
    closed: AtomicBool,
}

impl<S: ReadingSource> Reconciler<S> {
    pub fn new(source: S, surface: Arc<dyn ChartSurface>, timing: RenderTiming) -> Self {
        let (state, _) = watch::channel(PageState::default());
        let (events, _) = broadcast::channel(32);
        Self {
            inner: Arc::new(Inner {
                source,
                surface,
                state,
                events,
                chart: Mutex::new(None),
                timing,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<HistoryEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> PageState {
        self.inner.state.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Loads the most recent readings. A failure keeps what was there.
    pub async fn fetch_current(&self) {
        match self.inner.source.latest().await {
            Ok(readings) => {
                if self.is_closed() {
                    return;
                }
                tracing::debug!("[history] {} current readings", readings.len());
                self.inner.state.send_modify(|s| s.current = readings);
            }
            Err(e) => tracing::error!("[history] fetching current readings failed: {e:#}"),
        }
    }

    pub async fn fetch_all(&self, silent: bool) {
        self.refresh(HistoryQuery::All, silent).await;
    }

    /// Fetches one day of history. An empty `date` fetches everything.
    pub async fn fetch_by_date(&self, date: &str, silent: bool) {
        match normalize_day(date) {
            Ok(None) => self.fetch_all(silent).await,
            Ok(Some(day)) => self.refresh(HistoryQuery::Day(day), silent).await,
            Err(e) => {
                tracing::error!("[history] cannot filter by date: {e:#}");
                self.clear(format!("{e:#}"));
            }
        }
    }

    async fn refresh(&self, query: HistoryQuery, silent: bool) {
        if !silent {
            self.set_loading(true);
        }
        let result = self.inner.source.history(query).await;
        match result {
            Ok(readings) => self.replace(query, readings, silent),
            Err(e) => {
                tracing::error!("[history] fetching {:?} failed: {e:#}", query);
                self.clear(format!("{e:#}"));
            }
        }
        if !silent {
            self.set_loading(false);
        }
    }

    fn set_loading(&self, loading: bool) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    fn replace(&self, query: HistoryQuery, readings: Vec<Reading>, silent: bool) {
        if self.is_closed() {
            tracing::debug!("[history] dropping late response for {:?}", query);
            return;
        }
        let incoming = readings.len();
        let mut previous = 0;
        self.inner.state.send_modify(|s| {
            previous = s.history.len();
            s.history = readings;
            s.last_error = None;
            s.last_fetch_at = Some(Utc::now());
        });
        if silent && incoming > previous {
            let count = incoming - previous;
            match query.day() {
                Some(day) => tracing::info!("[history] {} new records for {}", count, day),
                None => tracing::info!("[history] {} new records", count),
            }
            let _ = self.inner.events.send(HistoryEvent::NewRecords {
                count,
                day: query.day(),
            });
        }
        self.schedule_render(self.inner.timing.for_query(query));
    }

    fn clear(&self, error: String) {
        if self.is_closed() {
            return;
        }
        self.inner.state.send_modify(|s| {
            s.history.clear();
            s.last_error = Some(error);
        });
        let _ = self.inner.events.send(HistoryEvent::Cleared);
    }

    // Gives the hosting view time to lay out its drawing target.
    fn schedule_render(&self, delay: Duration) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.render();
        });
    }

    /// Rebuilds the chart from the current window. Returns the number of points
    /// drawn, or `None` when nothing was drawn.
    pub fn render(&self) -> Option<usize> {
        if self.is_closed() {
            return None;
        }
        if !self.inner.surface.is_available() {
            tracing::debug!("[history] chart surface not available");
            return None;
        }
        let series = ChartSeries::from_history(&self.inner.state.borrow().history);
        if series.is_empty() {
            tracing::debug!("[history] nothing to render");
            return None;
        }
        tracing::debug!("[history] building chart from {} readings", series.len());
        let config = LineChartConfig::from_series(series);
        let points = {
            let mut slot = lock(&self.inner.chart);
            if let Some(old) = slot.take() {
                old.destroy();
            }
            let chart = self.inner.surface.create(config);
            let points = chart.points();
            *slot = Some(chart);
            points
        };
        tracing::info!("[history] chart rendered with {} points", points);
        let _ = self.inner.events.send(HistoryEvent::Rendered { points });
        Some(points)
    }

    /// Stops accepting responses and tears down the chart.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(chart) = lock(&self.inner.chart).take() {
            chart.destroy();
        }
        tracing::debug!("[history] reconciler closed");
    }
}
