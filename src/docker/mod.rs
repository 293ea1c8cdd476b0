//! Docker Engine API adapter.
//!
//! Wraps a [`bollard::Docker`] handle and exposes the two calls the collector
//! needs through [`crate::runtime::RuntimeClient`]:
//!
//! - the container listing (`GET /containers/json`), stopped containers included on request;
//! - a single stats snapshot per container (`GET /containers/{id}/stats?stream=false`).
mod client;
mod error;
mod models;

pub use client::DockerClient;
pub use error::{Error, Result};
