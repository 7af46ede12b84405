pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod table;
pub mod telemetry;
pub mod upload;
