pub mod app;
pub mod clock;
pub mod config;
pub mod dates;
pub mod document;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod reminder;
pub mod sanitize;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
