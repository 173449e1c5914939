//! Gateway between job-application clients, the Kestra workflow engine, and the scraped
//! job-listing dataset.

pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod telemetry;
pub mod workflows;

pub use gateway::gateway_router;
