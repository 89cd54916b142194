// Infrastructure layer - Configuration and external data adapters
pub mod config;
pub mod json_file_source;
