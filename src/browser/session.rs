//! Session traits - the capability boundary to the browser driver
//!
//! The engine only ever sees these traits; the concrete driver (agent-browser
//! CLI) and the scripted sessions used in tests both live behind them.

use async_trait::async_trait;

use crate::core::{ExtractedItem, Result};

/// One exclusive browsing context for the duration of a single plan run
///
/// Never shared across concurrent runs. Every capability call is fallible;
/// the engine treats any failure as an unrecoverable step failure.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate the main frame to a URL
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Click the first element matching the selector
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Focus an element and input literal text
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Block until the selector is present or the timeout elapses
    async fn wait_for(&mut self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Scroll the page to the bottom once
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// Capture the current viewport as a base64 image
    async fn screenshot(&mut self) -> Result<String>;

    /// Collect up to `limit` matching elements' text and href
    async fn extract(&mut self, selector: &str, limit: usize) -> Result<Vec<ExtractedItem>>;

    /// Release the browsing context
    ///
    /// Must be safe to call more than once.
    async fn close(&mut self) -> Result<()>;
}

/// Acquires a fresh session for one plan run
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Start a browsing session, failing with `SessionAcquisition` if the
    /// underlying driver cannot start
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>>;
}
