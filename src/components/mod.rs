pub mod dashboard;
pub mod gauge;
pub mod history_chart;
pub mod readings_card;
pub mod refresh_controls;

pub use dashboard::DashboardPage;
pub use gauge::Gauge;
pub use history_chart::HistoryChart;
pub use readings_card::ReadingsCard;
pub use refresh_controls::RefreshControls;
