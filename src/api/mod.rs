//! API module for the HTTP endpoints
//!
//! This module provides the axum router and the REST handlers that
//! expose the bus over HTTP.

pub mod http;
pub mod rest;
