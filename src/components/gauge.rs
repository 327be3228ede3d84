use dioxus::prelude::*;

/// Arc gauge for a value in `min..=max`.
#[allow(non_snake_case)]
#[component]
pub fn Gauge(
    value: f64,
    min: f64,
    max: f64,
    size: i32,
    stroke: i32,
    color: String,
    children: Element,
) -> Element {
    const START: f32 = 45.0;
    const STOP: f32 = 315.0;

    let span = (max - min).abs().max(f64::EPSILON);
    let frac = ((value - min) / span).clamp(0.0, 1.0) as f32;
    let end_angle = START + (STOP - START) * frac;

    let c = (size as f32) / 2.0;
    let r = c - (stroke as f32) / 2.0 - 1.0;

    fn polar(cx: f32, cy: f32, r: f32, ang: f32) -> (f32, f32) {
        let rad = ang.to_radians();
        (cx + r * rad.cos(), cy + r * rad.sin())
    }
    fn arc_path(cx: f32, cy: f32, r: f32, a0: f32, a1: f32) -> String {
        let (x0, y0) = polar(cx, cy, r, a0);
        let (x1, y1) = polar(cx, cy, r, a1);
        let large_arc = if (a1 - a0).abs() >= 180.0 { 1 } else { 0 };
        let sweep = if a1 >= a0 { 1 } else { 0 };
        format!("M {x0:.3} {y0:.3} A {r:.3} {r:.3} 0 {large_arc} {sweep} {x1:.3} {y1:.3}")
    }

    // opening at the bottom
    let offset = 90.0;
    let track_d = arc_path(c, c, r, START + offset, STOP + offset);
    let value_d = arc_path(c, c, r, START + offset, end_angle + offset);

    let view_box = format!("0 0 {size} {size}");
    let container_style = format!("width:{size}px;height:{size}px");

    rsx! {
        div { class: "gauge", style: "{container_style}",
            svg { width: "{size}", height: "{size}", view_box: "{view_box}",
                path { d: "{track_d}", fill: "none", stroke: "rgba(255, 255, 255, 0.1)", stroke_width: "{stroke}", stroke_linecap: "round" }
                if frac > 0.0 {
                    path { d: "{value_d}", fill: "none", stroke: "{color}", stroke_width: "{stroke}", stroke_linecap: "round" }
                }
            }
            div { class: "gauge-center", {children} }
        }
    }
}
