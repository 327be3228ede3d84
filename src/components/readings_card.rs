use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use crate::chart::{HUMIDITY_COLOR, TEMPERATURE_COLOR};
use crate::components::Gauge;
use crate::history::series::time_label;
use crate::shared::types::Reading;
use crate::utils::format::{format_celsius, format_local, format_percent};

/// Latest reading plus a short summary of the loaded window.
#[allow(non_snake_case)]
#[component]
pub fn ReadingsCard(
    current: Vec<Reading>,
    history_len: usize,
    last_fetch_at: Option<DateTime<Utc>>,
) -> Element {
    // the endpoint answers newest first
    let latest = current.first().cloned();

    rsx! {
        div { class: "card readings-card",
            h1 { class: "card-title", "Leituras atuais" }
            {
                match latest {
                    Some(r) => {
                        let at = time_label(&r.timestamp);
                        rsx! {
                            div { class: "gauges",
                                Gauge { value: r.temperature, min: 0.0, max: 50.0, size: 160, stroke: 12, color: TEMPERATURE_COLOR.to_string(),
                                    div { class: "gauge-value", style: "color:{TEMPERATURE_COLOR}", "{format_celsius(r.temperature)}" }
                                    div { class: "gauge-caption", "Temperatura" }
                                }
                                Gauge { value: r.humidity, min: 0.0, max: 100.0, size: 160, stroke: 12, color: HUMIDITY_COLOR.to_string(),
                                    div { class: "gauge-value", style: "color:{HUMIDITY_COLOR}", "{format_percent(r.humidity)}" }
                                    div { class: "gauge-caption", "Umidade" }
                                }
                            }
                            div { class: "muted", "Leitura das {at}" }
                        }
                    }
                    None => rsx! {
                        div { class: "empty",
                            p { "Nenhuma leitura ainda" }
                            p { class: "muted", "Aguardando dados do sensor..." }
                        }
                    },
                }
            }
            div { class: "card-footer",
                span { "{history_len} registros no histórico" }
                if let Some(ts) = last_fetch_at {
                    span { class: "muted", "Atualizado em {format_local(&ts)}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(app: fn() -> Element) -> String {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    fn empty_card() -> Element {
        rsx! {
            ReadingsCard { current: Vec::new(), history_len: 0, last_fetch_at: None }
        }
    }

    fn loaded_card() -> Element {
        let reading = Reading {
            timestamp: "2024-03-02T14:05:00Z".into(),
            temperature: 23.4,
            humidity: 61.0,
        };
        rsx! {
            ReadingsCard { current: vec![reading], history_len: 12, last_fetch_at: None }
        }
    }

    #[test]
    fn failed_fetch_shows_only_empty_state() {
        let html = render(empty_card);
        assert!(html.contains("Nenhuma leitura ainda"));
        assert!(html.contains("0 registros"));
        assert!(!html.contains("Erro"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn latest_reading_is_shown_in_gauges() {
        let html = render(loaded_card);
        assert!(html.contains("23.4"));
        assert!(html.contains("Leitura das 14:05"));
        assert!(html.contains("12 registros"));
    }
}
