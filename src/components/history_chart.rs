use dioxus::prelude::*;

use crate::chart::LineChartConfig;

const HEIGHT: f32 = 260.0;
const PADDING: f32 = 36.0;
const STEP: f32 = 48.0;
const GRID_LINES: usize = 5;

#[allow(non_snake_case)]
#[component]
pub fn HistoryChart(config: Option<LineChartConfig>, loading: bool) -> Element {
    let mut hovered = use_signal(|| Option::<usize>::None);

    let Some(cfg) = config else {
        return rsx! {
            div { class: "card chart-card",
                h2 { class: "card-title", "Histórico" }
                div { class: "chart-empty",
                    if loading { "Carregando..." } else { "Sem dados para exibir" }
                }
            }
        };
    };

    let n = cfg.points().max(1);
    let width = (n as f32 - 1.0).max(1.0) * STEP + PADDING * 2.0;
    let bottom = PADDING + HEIGHT;
    // zero-based Y axis with some headroom
    let y_max = (cfg.max_value() * 1.1).max(1.0) as f32;
    let x_at = move |i: usize| PADDING + i as f32 * STEP;
    let y_at = move |v: f64| bottom - (v as f32 / y_max) * HEIGHT;
    let view_box = format!("0 0 {} {}", width, bottom + PADDING + 24.0);

    let grid_color = cfg.options.scales.y.grid.color.clone();
    let tick_color = cfg.options.scales.y.ticks.color.clone();
    let legend_font = cfg.options.plugins.legend.labels.font.size;
    let rotation = cfg.options.scales.x.ticks.max_rotation.unwrap_or(0);

    let lines: Vec<(String, String, String, String)> = cfg
        .data
        .datasets
        .iter()
        .map(|d| {
            let pts: Vec<String> = d
                .data
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
                .collect();
            let line = pts.join(" ");
            let area = if d.fill && !pts.is_empty() {
                format!(
                    "M {:.1},{:.1} L {} L {:.1},{:.1} Z",
                    x_at(0),
                    bottom,
                    line,
                    x_at(d.data.len().saturating_sub(1)),
                    bottom
                )
            } else {
                String::new()
            };
            (
                line,
                area,
                d.border_color.clone(),
                d.background_color.clone(),
            )
        })
        .collect();

    rsx! {
        div { class: "card chart-card",
            div { class: "chart-header",
                h2 { class: "card-title", "Histórico" }
                div { class: "chart-legend", style: "font-size:{legend_font}px",
                    for d in cfg.data.datasets.iter() {
                        span { class: "legend-item",
                            span { class: "legend-swatch", style: "background:{d.border_color}" }
                            "{d.label}"
                        }
                    }
                }
            }
            div { class: "chart-scroll",
                svg { class: "chart-svg", view_box: "{view_box}", width: "{width}", height: "{bottom + PADDING + 24.0}",
                    // horizontal grid + Y ticks
                    {
                        (0..=GRID_LINES).map(|k| {
                            let v = y_max * k as f32 / GRID_LINES as f32;
                            let y = bottom - (v / y_max) * HEIGHT;
                            let tick = format!("{:.0}", v);
                            rsx! {
                                g { key: "grid-{k}",
                                    line { x1: "{PADDING}", y1: "{y}", x2: "{width - PADDING}", y2: "{y}", stroke: "{grid_color}", stroke_width: "1" }
                                    text { x: "{PADDING - 6.0}", y: "{y + 4.0}", fill: "{tick_color}", font_size: "10", text_anchor: "end", "{tick}" }
                                }
                            }
                        })
                    }
                    for (area, color) in lines.iter().map(|l| (&l.1, &l.3)) {
                        if !area.is_empty() {
                            path { d: "{area}", fill: "{color}", stroke: "none" }
                        }
                    }
                    for (line, color) in lines.iter().map(|l| (&l.0, &l.2)) {
                        polyline { points: "{line}", fill: "none", stroke: "{color}", stroke_width: "2" }
                    }
                    {
                        cfg.data.datasets.iter().enumerate().flat_map(|(di, d)| {
                            let point_color = d.point_background_color.clone();
                            let border = d.point_border_color.clone();
                            let radius = d.point_radius;
                            let hover_radius = d.point_hover_radius;
                            let border_width = d.point_border_width;
                            d.data.iter().enumerate().map(move |(i, v)| {
                                let r = if *hovered.read() == Some(i) { hover_radius } else { radius };
                                rsx! {
                                    circle {
                                        key: "p-{di}-{i}",
                                        cx: "{x_at(i)}", cy: "{y_at(*v)}", r: "{r}",
                                        fill: "{point_color}", stroke: "{border}", stroke_width: "{border_width}",
                                        onmouseenter: move |_| *hovered.write() = Some(i),
                                        onmouseleave: move |_| *hovered.write() = None,
                                    }
                                }
                            }).collect::<Vec<_>>()
                        })
                    }
                    for (i, label) in cfg.data.labels.iter().enumerate() {
                        text {
                            key: "x-{i}",
                            x: "{x_at(i)}", y: "{bottom + 16.0}",
                            fill: "{tick_color}", font_size: "10", text_anchor: "end",
                            transform: "rotate(-{rotation} {x_at(i)} {bottom + 16.0})",
                            "{label}"
                        }
                    }
                }
            }
            {
                match *hovered.read() {
                    Some(i) if i < cfg.points() => {
                        let label = cfg.data.labels[i].clone();
                        let values: Vec<String> = cfg.data.datasets.iter()
                            .map(|d| format!("{}: {:.1}", d.label, d.data.get(i).copied().unwrap_or(0.0)))
                            .collect();
                        rsx! {
                            div { class: "chart-tooltip",
                                div { class: "tooltip-title", "{label}" }
                                for v in values { div { "{v}" } }
                            }
                        }
                    }
                    _ => rsx! { Fragment {} },
                }
            }
        }
    }
}
