pub mod bootstrap;
pub mod host;
pub mod logging;
pub mod state;
pub mod windows;

pub use bootstrap::{AppBootstrap, bootstrap};
pub use state::{AppState, window_id};
