use tokio::sync::watch;

use super::LineChartConfig;

/// Something a chart can be drawn on.
pub trait ChartSurface: Send + Sync {
    /// Whether the drawing target currently exists.
    fn is_available(&self) -> bool;

    fn create(&self, config: LineChartConfig) -> Box<dyn RenderedChart>;
}

/// A drawn chart. Charts are never updated in place, only destroyed and rebuilt.
pub trait RenderedChart: Send + Sync {
    fn points(&self) -> usize;

    fn destroy(self: Box<Self>);
}

/// Publishes the live chart configuration to a UI view.
///
/// The surface is available while at least one receiver (the mounted view) exists.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    tx: watch::Sender<Option<LineChartConfig>>,
}

impl ChannelSurface {
    pub fn new() -> (Self, watch::Receiver<Option<LineChartConfig>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl ChartSurface for ChannelSurface {
    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }

    fn create(&self, config: LineChartConfig) -> Box<dyn RenderedChart> {
        let points = config.points();
        self.tx.send_replace(Some(config));
        Box::new(ChannelChart {
            tx: self.tx.clone(),
            points,
        })
    }
}

struct ChannelChart {
    tx: watch::Sender<Option<LineChartConfig>>,
    points: usize,
}

impl RenderedChart for ChannelChart {
    fn points(&self) -> usize {
        self.points
    }

    fn destroy(self: Box<Self>) {
        self.tx.send_replace(None);
    }
}

/// Headless surface: every rebuilt chart is written to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface {
    /// Also dump the full chart config as JSON.
    pub dump_json: bool,
}

impl ChartSurface for LogSurface {
    fn is_available(&self) -> bool {
        true
    }

    fn create(&self, config: LineChartConfig) -> Box<dyn RenderedChart> {
        let points = config.points();
        let first = config.data.labels.first().map(String::as_str).unwrap_or("-");
        let last = config.data.labels.last().map(String::as_str).unwrap_or("-");
        let latest = |i: usize| {
            config
                .data
                .datasets
                .get(i)
                .and_then(|d| d.data.last().copied())
                .unwrap_or(0.0)
        };
        tracing::info!(
            "[chart] {} points ({} .. {}), latest {:.1} °C / {:.1} %",
            points,
            first,
            last,
            latest(0),
            latest(1)
        );
        if self.dump_json {
            match serde_json::to_string(&config) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!("[chart] could not serialize config: {e}"),
            }
        }
        Box::new(LoggedChart { points })
    }
}

struct LoggedChart {
    points: usize,
}

impl RenderedChart for LoggedChart {
    fn points(&self) -> usize {
        self.points
    }

    fn destroy(self: Box<Self>) {
        tracing::debug!("[chart] destroyed chart with {} points", self.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::series::ChartSeries;

    fn config(n: usize) -> LineChartConfig {
        LineChartConfig::from_series(ChartSeries {
            labels: vec!["00:00".into(); n],
            temperature: vec![1.0; n],
            humidity: vec![2.0; n],
        })
    }

    #[test]
    fn channel_surface_follows_receiver_lifetime() {
        let (surface, rx) = ChannelSurface::new();
        assert!(surface.is_available());
        drop(rx);
        assert!(!surface.is_available());
    }

    #[test]
    fn channel_surface_publishes_and_clears() {
        let (surface, rx) = ChannelSurface::new();
        let chart = surface.create(config(3));
        assert_eq!(chart.points(), 3);
        assert_eq!(rx.borrow().as_ref().map(|c| c.points()), Some(3));
        chart.destroy();
        assert!(rx.borrow().is_none());
    }
}
