pub mod github;
pub mod log_sink;
