pub mod config;

pub use config::CorvidConfig;
