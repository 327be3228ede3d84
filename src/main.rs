use dioxus::prelude::*;

mod api;
mod app;
mod chart;
mod components;
mod config;
mod headless;
mod history;
mod scheduler;
mod shared;
mod utils;

#[cfg(test)]
mod testing;

pub const MAIN_CSS: Asset = asset!("/assets/main.css");

use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let _ = config::CONFIG.set(config::DashboardConfig::from_env());

    let mut args = std::env::args();
    let _bin = args.next();
    if let Some(cmd) = args.next() {
        if cmd == "watch" {
            let watch_args = match headless::WatchArgs::parse(args) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            };
            let res = tokio::runtime::Runtime::new()
                .map_err(anyhow::Error::from)
                .and_then(|rt| rt.block_on(headless::run(config::get(), watch_args)));
            if let Err(e) = res {
                eprintln!("watch: {e:#}");
                std::process::exit(1);
            }
            return;
        }
    }

    dioxus::launch(app::App);
}
