//! Adapters for the compute-service boundary.
//!
//! [`EarthEngineClient`] talks to the Earth Engine REST API;
//! [`MockEngine`] serves deterministic synthetic data for tests and
//! credential-less runs.

pub mod expr;
pub mod mock;
pub mod rest;

pub use mock::MockEngine;
pub use rest::{EarthEngineClient, EngineConfig};
