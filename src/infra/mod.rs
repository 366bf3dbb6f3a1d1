pub mod config;
pub mod file_store;
pub mod github_http;
pub mod logging;
pub mod random;
pub mod system_clock;
pub mod time;
