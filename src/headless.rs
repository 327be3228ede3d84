//! `watch` subcommand: runs the refresh loop without a window and logs every
//! rebuilt chart.

use anyhow::{Context, Result};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::api::{ReadingSource, SensorApi};
use crate::chart::LogSurface;
use crate::config::DashboardConfig;
use crate::history::{HistoryEvent, Reconciler, RenderTiming};
use crate::scheduler::{RefreshConfig, RefreshScheduler};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchArgs {
    pub date: Option<String>,
    pub dump_json: bool,
}

impl WatchArgs {
    pub fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut out = Self::default();
        for arg in args {
            match arg.as_str() {
                "--json" => out.dump_json = true,
                other if other.starts_with("--") => {
                    anyhow::bail!("unknown option {other}; usage: watch [YYYY-MM-DD] [--json]")
                }
                other => out.date = Some(other.to_string()),
            }
        }
        Ok(out)
    }
}

pub async fn run(cfg: &DashboardConfig, args: WatchArgs) -> Result<()> {
    let api = SensorApi::new(cfg)?;
    let surface = LogSurface {
        dump_json: args.dump_json,
    };
    let timing = RenderTiming {
        all: cfg.render_delay,
        by_day: cfg.day_render_delay,
    };
    let reconciler = Reconciler::new(api, Arc::new(surface), timing);
    let scheduler = RefreshScheduler::new(
        reconciler,
        RefreshConfig {
            interval: cfg.refresh_interval,
            selected_date: args.date.clone(),
            ..Default::default()
        },
    );

    tracing::info!(
        "[watch] polling {} ({}) every {}s",
        cfg.api_base_url,
        cfg.collection,
        cfg.refresh_interval.as_secs()
    );
    let mut events = scheduler.reconciler().events();
    let interval = scheduler.config().interval;
    scheduler.start(interval);
    scheduler.reconciler().fetch_current().await;
    scheduler.refresh_now().await;

    let report = report_events(&mut events, scheduler.reconciler());
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.context("waiting for Ctrl-C")?,
        _ = report => {}
    }

    scheduler.shutdown();
    tracing::info!("[watch] stopped");
    Ok(())
}

/// Logs failed refreshes until the event stream closes. Lagging only skips.
async fn report_events<S: ReadingSource>(
    events: &mut broadcast::Receiver<HistoryEvent>,
    reconciler: &Reconciler<S>,
) {
    loop {
        match events.recv().await {
            Ok(HistoryEvent::Cleared) => {
                if let Some(err) = reconciler.snapshot().last_error {
                    tracing::warn!("[watch] history cleared: {err}");
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::debug!("[watch] skipped {n} events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{settle, FakeSource, RecordingSurface};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn report_survives_lagging_behind() {
        let reconciler = Reconciler::new(
            FakeSource::new(),
            RecordingSurface::new(),
            RenderTiming::immediate(),
        );
        let (tx, mut rx) = broadcast::channel(2);
        for points in 0..5 {
            tx.send(HistoryEvent::Rendered { points }).unwrap();
        }

        let report = tokio::spawn(async move {
            report_events(&mut rx, &reconciler).await;
        });
        settle().await;
        assert!(!report.is_finished());

        tx.send(HistoryEvent::Cleared).unwrap();
        settle().await;
        assert!(!report.is_finished());

        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), report)
            .await
            .expect("report ends once the stream closes")
            .unwrap();
    }

    fn args(v: &[&str]) -> Result<WatchArgs> {
        WatchArgs::parse(v.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_date_and_json_flag() {
        assert_eq!(args(&[]).unwrap(), WatchArgs::default());
        let a = args(&["2024-03-02", "--json"]).unwrap();
        assert_eq!(a.date.as_deref(), Some("2024-03-02"));
        assert!(a.dump_json);
        assert!(args(&["--verbose"]).is_err());
    }
}
