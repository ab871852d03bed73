//! Service integrations for external APIs and storage.
//!
//! This module contains implementations for the services used by the reaction-bot:
//! - Chat services (e.g., Limoo)
//! - Reaction storage (e.g., a flat JSON file)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod store;
