//! Agency content calendar library
//!
//! This library exposes the calendar engine for the binary and for
//! integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod schedule;
pub mod services;
pub mod store;
