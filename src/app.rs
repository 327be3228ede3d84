use dioxus::prelude::*;

use crate::components::DashboardPage;
use crate::MAIN_CSS;

#[allow(non_snake_case)]
#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        document::Meta { name: "theme-color", content: "#0f172a" }
        document::Meta { name: "color-scheme", content: "dark" }
        document::Title { "Monitor de Sensores" }
        div { class: "app",
            DashboardPage {}
        }
    }
}
