//! Fakes shared by the unit tests.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::api::ReadingSource;
use crate::chart::{ChartSurface, LineChartConfig, RenderedChart};
use crate::shared::types::{HistoryQuery, Reading};
use crate::utils::sync::lock;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` readings on `date`, one per hour starting at 08:00.
pub fn readings(date: &str, n: usize) -> Vec<Reading> {
    (0..n)
        .map(|i| Reading {
            timestamp: format!("{date}T{:02}:00:00Z", 8 + i),
            temperature: 20.0 + i as f64,
            humidity: 50.0 + i as f64,
        })
        .collect()
}

/// Lets spawned tasks and short timers run to completion on a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[derive(Clone, Default)]
pub struct FakeSource {
    inner: Arc<FakeInner>,
}

#[derive(Default)]
struct FakeInner {
    all: Mutex<Option<Vec<Reading>>>,
    all_error: Mutex<Option<String>>,
    days: Mutex<HashMap<NaiveDate, Vec<Reading>>>,
    latest: Mutex<Vec<Reading>>,
    latest_fails: AtomicBool,
    calls: Mutex<Vec<HistoryQuery>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_all(&self, readings: Vec<Reading>) {
        *lock(&self.inner.all) = Some(readings);
        *lock(&self.inner.all_error) = None;
    }

    pub fn fail_all(&self, msg: &str) {
        *lock(&self.inner.all_error) = Some(msg.to_string());
    }

    pub fn set_day(&self, day: NaiveDate, readings: Vec<Reading>) {
        lock(&self.inner.days).insert(day, readings);
    }

    pub fn set_latest(&self, readings: Vec<Reading>) {
        *lock(&self.inner.latest) = readings;
        self.inner.latest_fails.store(false, Ordering::SeqCst);
    }

    pub fn fail_latest(&self) {
        self.inner.latest_fails.store(true, Ordering::SeqCst);
    }

    /// The next history call blocks until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.inner.gate) = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<HistoryQuery> {
        lock(&self.inner.calls).clone()
    }
}

impl ReadingSource for FakeSource {
    fn latest(&self) -> impl Future<Output = Result<Vec<Reading>>> + Send {
        let inner = self.inner.clone();
        async move {
            if inner.latest_fails.load(Ordering::SeqCst) {
                return Err(anyhow!("latest unavailable"));
            }
            Ok(lock(&inner.latest).clone())
        }
    }

    fn history(&self, query: HistoryQuery) -> impl Future<Output = Result<Vec<Reading>>> + Send {
        let inner = self.inner.clone();
        async move {
            lock(&inner.calls).push(query);
            let gate = lock(&inner.gate).take();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match query {
                HistoryQuery::All => {
                    if let Some(msg) = lock(&inner.all_error).clone() {
                        return Err(anyhow!(msg));
                    }
                    Ok(lock(&inner.all).clone().unwrap_or_default())
                }
                HistoryQuery::Day(d) => Ok(lock(&inner.days).get(&d).cloned().unwrap_or_default()),
            }
        }
    }
}

/// Records every chart created on it.
pub struct RecordingSurface {
    available: AtomicBool,
    created: Mutex<Vec<LineChartConfig>>,
    destroyed: Arc<AtomicUsize>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            created: Mutex::new(Vec::new()),
            destroyed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Point counts of every chart created so far.
    pub fn created(&self) -> Vec<usize> {
        lock(&self.created).iter().map(|c| c.points()).collect()
    }

    pub fn last_config(&self) -> Option<LineChartConfig> {
        lock(&self.created).last().cloned()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl ChartSurface for RecordingSurface {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn create(&self, config: LineChartConfig) -> Box<dyn RenderedChart> {
        let points = config.points();
        lock(&self.created).push(config);
        Box::new(RecordingChart {
            points,
            destroyed: self.destroyed.clone(),
        })
    }
}

struct RecordingChart {
    points: usize,
    destroyed: Arc<AtomicUsize>,
}

impl RenderedChart for RecordingChart {
    fn points(&self) -> usize {
        self.points
    }

    fn destroy(self: Box<Self>) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
