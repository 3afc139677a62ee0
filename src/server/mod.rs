pub mod config;
pub mod handlers;
pub mod services;

pub use config::AppState;
