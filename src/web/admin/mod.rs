mod api;
mod dashboard;
mod export;
mod verify;

pub use api::list_registrations;
pub use dashboard::{DashboardQuery, dashboard};
pub use export::export_csv;
pub use verify::toggle_verification;
