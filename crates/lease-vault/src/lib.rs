pub mod config;
pub mod error;
pub mod leases;
pub mod telemetry;
