//! Core components, types, and utilities for the reaction-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Reaction list diffing.
//! - Notification formatting.
//! - Common types and result handling.

pub mod config;
pub mod diff;
pub mod notification;
pub mod types;
