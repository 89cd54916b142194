// Application layer - Decision core and replay use cases
pub mod connection_machine;
pub mod decision_policy;
pub mod handoff_session;
pub mod replay_driver;
pub mod telemetry_source;
pub mod telemetry_store;
