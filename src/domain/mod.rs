// Domain layer - Telemetry and connection models
pub mod bounds;
pub mod connection;
pub mod error;
pub mod network;
pub mod sample;
