//! # Application Layer
//!
//! Resilience and orchestration on top of the domain: circuit breakers,
//! retries, vendor fan-out and the aggregation entry point.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, InfrastructureError};
