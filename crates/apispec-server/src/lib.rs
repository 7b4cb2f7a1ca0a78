//! # apispec-server
//!
//! HTTP server library for apispec.
//!
//! This library provides the API handlers, logging setup and state
//! management used by the `apispec-server` and `gen-spec` binaries.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
