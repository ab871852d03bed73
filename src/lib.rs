//! Library root for `reaction-bot`.
//!
//! Reaction-bot lurks in a chat workspace and lets people know when someone reacts
//! to their messages:
//! - Caches the reactions of every message it sees
//! - Diffs the reactions whenever a message is edited
//! - Sends the author a direct message for each reaction added by someone else
//!
//! The bot integrates with Limoo for chat and a flat JSON file for storage. The
//! architecture is built around traits that allow for different implementations
//! of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the reaction-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the reaction store and chat client
/// - Starts the main event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting reaction-bot ...");

    // Start the crypto provider; it may already be installed by a dependency.
    let _ = crypto::ring::default_provider().install_default();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
