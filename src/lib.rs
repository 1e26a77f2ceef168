pub mod config;
pub mod diff;
pub mod format;
pub mod http_client;
pub mod leaderboard;
pub mod notify;
pub mod pipeline;
pub mod scheduler;
pub mod server;
pub mod snapshot;
pub mod store;
