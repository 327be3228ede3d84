use dioxus::prelude::*;

use crate::config::REFRESH_CHOICES_SECS;
use crate::utils::format::format_interval;

#[allow(non_snake_case)]
#[component]
pub fn RefreshControls(
    auto_refresh: bool,
    interval_secs: u64,
    selected_date: String,
    loading: bool,
    on_toggle: EventHandler<()>,
    on_refresh: EventHandler<()>,
    on_interval: EventHandler<u64>,
    on_date: EventHandler<String>,
) -> Element {
    let toggle_label = if auto_refresh { "⏸️ Pausar" } else { "▶️ Retomar" };
    let status = if auto_refresh {
        format!("Auto-refresh a cada {}", format_interval(interval_secs))
    } else {
        "Auto-refresh pausado".to_string()
    };

    rsx! {
        div { class: "card controls",
            div { class: "controls-row",
                button { class: "btn", onclick: move |_| on_toggle.call(()), "{toggle_label}" }
                button { class: "btn btn-primary", disabled: loading,
                    onclick: move |_| on_refresh.call(()),
                    if loading { "Atualizando..." } else { "🔄 Atualizar agora" }
                }
                select { class: "select",
                    onchange: move |evt| {
                        if let Ok(secs) = evt.value().parse::<u64>() {
                            on_interval.call(secs);
                        }
                    },
                    for secs in REFRESH_CHOICES_SECS {
                        option { value: "{secs}", selected: secs == interval_secs, "{format_interval(secs)}" }
                    }
                }
            }
            div { class: "controls-row",
                input { class: "input", r#type: "date", value: "{selected_date}",
                    onchange: move |evt| on_date.call(evt.value()),
                }
                if !selected_date.is_empty() {
                    button { class: "btn", onclick: move |_| on_date.call(String::new()), "Limpar filtro" }
                }
                span { class: "muted", "{status}" }
            }
        }
    }
}
