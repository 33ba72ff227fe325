//! Calendar event storage
//!
//! This module provides:
//! - Model definitions for events and generated drafts
//! - The in-memory event store shared by the generator, scheduler and sweep

pub mod models;
pub mod repository;

pub use models::*;
pub use repository::EventStore;
