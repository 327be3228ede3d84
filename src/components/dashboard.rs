use dioxus::prelude::*;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use crate::api::SensorApi;
use crate::chart::{ChannelSurface, LineChartConfig};
use crate::components::{HistoryChart, ReadingsCard, RefreshControls};
use crate::config::{self, DashboardConfig};
use crate::history::{HistoryEvent, PageState, Reconciler, RenderTiming};
use crate::scheduler::{RefreshConfig, RefreshScheduler};

type Scheduler = RefreshScheduler<SensorApi>;

#[derive(Clone)]
struct Page {
    scheduler: Arc<Scheduler>,
    chart: watch::Receiver<Option<LineChartConfig>>,
}

fn build_page(cfg: &DashboardConfig) -> Option<Page> {
    let api = match SensorApi::new(cfg) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("[dashboard] cannot build API client: {e:#}");
            return None;
        }
    };
    let (surface, chart) = ChannelSurface::new();
    let timing = RenderTiming {
        all: cfg.render_delay,
        by_day: cfg.day_render_delay,
    };
    let reconciler = Reconciler::new(api, Arc::new(surface), timing);
    let refresh = RefreshConfig {
        interval: cfg.refresh_interval,
        ..Default::default()
    };
    Some(Page {
        scheduler: Arc::new(RefreshScheduler::new(reconciler, refresh)),
        chart,
    })
}

#[allow(non_snake_case)]
#[component]
pub fn DashboardPage() -> Element {
    let page = use_hook(|| build_page(config::get()));

    let mut state = use_signal(PageState::default);
    let mut chart = use_signal(|| Option::<LineChartConfig>::None);
    let mut refresh = use_signal(|| {
        page.as_ref()
            .map(|p| p.scheduler.config())
            .unwrap_or_default()
    });
    let mut notice = use_signal(|| Option::<String>::None);

    // page init
    use_future({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move {
                if let Some(page) = page {
                    page.scheduler.launch().await;
                }
            }
        }
    });

    // page state feed
    use_future({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move {
                let Some(page) = page else { return };
                let mut rx = page.scheduler.reconciler().subscribe();
                loop {
                    let snapshot = rx.borrow_and_update().clone();
                    state.set(snapshot);
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // chart feed
    use_future({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move {
                let Some(page) = page else { return };
                let mut rx = page.chart.clone();
                loop {
                    let cfg = rx.borrow_and_update().clone();
                    chart.set(cfg);
                    if rx.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // "N new records" banner
    use_future({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move {
                let Some(page) = page else { return };
                let mut events = page.scheduler.reconciler().events();
                loop {
                    match events.recv().await {
                        Ok(HistoryEvent::NewRecords { count, day }) => {
                            let msg = match day {
                                Some(d) => format!("🆕 {count} novos registros do dia {d}!"),
                                None => format!("🆕 {count} novos registros detectados!"),
                            };
                            notice.set(Some(msg));
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::debug!("[dashboard] skipped {n} events");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    use_drop({
        let page = page.clone();
        move || {
            if let Some(page) = page {
                page.scheduler.shutdown();
            }
        }
    });

    let Some(page) = page else {
        return rsx! {
            div { class: "card error", "Não foi possível iniciar o cliente HTTP." }
        };
    };

    let on_toggle = {
        let scheduler = page.scheduler.clone();
        move |_: ()| {
            scheduler.toggle_auto();
            refresh.set(scheduler.config());
        }
    };
    let on_refresh = {
        let scheduler = page.scheduler.clone();
        move |_: ()| {
            let scheduler = scheduler.clone();
            spawn(async move { scheduler.refresh_now().await });
        }
    };
    let on_interval = {
        let scheduler = page.scheduler.clone();
        move |secs: u64| {
            scheduler.set_interval_secs(secs);
            refresh.set(scheduler.config());
        }
    };
    let on_date = {
        let scheduler = page.scheduler.clone();
        move |date: String| {
            let scheduler = scheduler.clone();
            spawn(async move {
                scheduler.select_date(&date).await;
                refresh.set(scheduler.config());
            });
        }
    };

    let st = state.read().clone();
    let rc = refresh.read().clone();

    rsx! {
        div { class: "page",
            if let Some(msg) = notice() {
                div { class: "notice", onclick: move |_| notice.set(None), "{msg}" }
            }
            ReadingsCard {
                current: st.current.clone(),
                history_len: st.history.len(),
                last_fetch_at: st.last_fetch_at,
            }
            RefreshControls {
                auto_refresh: rc.auto_refresh,
                interval_secs: rc.interval.as_secs(),
                selected_date: rc.selected_date.clone().unwrap_or_default(),
                loading: st.loading,
                on_toggle,
                on_refresh,
                on_interval,
                on_date,
            }
            HistoryChart { config: chart(), loading: st.loading }
        }
    }
}
