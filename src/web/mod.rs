pub mod admin;
pub mod auth;
pub mod events;
pub mod landing;
pub mod register;
pub mod router;
pub mod state;
pub mod storage;
pub mod templates;

pub use state::AppState;
pub use templates::{escape_html, render_page};
