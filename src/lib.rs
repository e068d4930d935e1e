pub mod aggregate;
pub mod app;
pub mod cache;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod state;
pub mod ui;

pub use app::router;
pub use cache::LocalCache;
pub use controller::Controller;
pub use remote::{HttpRemoteStore, RemoteConfig};
pub use state::AppState;
