//! Browser driver - wraps the agent-browser CLI
//!
//! Provides the async session capability set on top of agent-browser
//! subcommands. Each run gets its own session name so concurrent runs never
//! share a browsing context.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::browser::session::{BrowserSession, SessionProvider};
use crate::core::config::BrowserConfig;
use crate::core::{ExtractedItem, Result, WebstepError};

/// A browsing session backed by the agent-browser CLI
pub struct CliSession {
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Whether close has already run
    closed: bool,
}

impl CliSession {
    fn new(session_name: String, headed: bool) -> Self {
        Self {
            session_name,
            headed,
            closed: false,
        }
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("agent-browser");
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WebstepError::AgentBrowserNotFound
            } else {
                WebstepError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(WebstepError::step(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl BrowserSession for CliSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.run_command(&["click", selector]).await?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.run_command(&["fill", selector, text]).await?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout_ms: u64) -> Result<()> {
        let timeout = timeout_ms.to_string();
        self.run_command(&["wait", selector, "--timeout", &timeout])
            .await?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.run_command(&["eval", "window.scrollTo(0, document.body.scrollHeight)"])
            .await?;
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<String> {
        let output = self.run_command(&["screenshot"]).await?;
        Ok(output.trim().to_string())
    }

    async fn extract(&mut self, selector: &str, limit: usize) -> Result<Vec<ExtractedItem>> {
        let script = build_extract_script(selector, limit)?;
        let output = self.run_command(&["eval", &script]).await?;

        serde_json::from_str(output.trim()).map_err(|e| {
            WebstepError::step(format!("extraction returned unparseable output: {}", e))
        })
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.run_command(&["close"]).await?;
        Ok(())
    }
}

/// Build the in-page script that collects matching elements' text and href
fn build_extract_script(selector: &str, limit: usize) -> Result<String> {
    // Embed the selector as a JS string literal so quoting is always valid
    let selector_literal = serde_json::to_string(selector)?;
    Ok(format!(
        "JSON.stringify(Array.from(document.querySelectorAll({selector})).slice(0, {limit})\
         .map(el => ({{ text: el.innerText ? el.innerText.trim() : null, href: el.href || null }})))",
        selector = selector_literal,
        limit = limit,
    ))
}

/// Acquires agent-browser sessions, one per run
pub struct CliSessionProvider {
    config: BrowserConfig,
}

impl CliSessionProvider {
    /// Create a provider from browser configuration
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Unique session name so concurrent runs stay isolated
    fn fresh_session_name(&self) -> String {
        format!("{}-{:08x}", self.config.session_prefix, rand::random::<u32>())
    }
}

#[async_trait]
impl SessionProvider for CliSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        if !CliSession::is_available().await {
            return Err(WebstepError::AgentBrowserNotFound);
        }

        let session = CliSession::new(self.fresh_session_name(), self.config.headed);

        // Start the browsing context now so acquisition failures surface
        // before any step dispatches.
        session
            .run_command(&["open", "about:blank"])
            .await
            .map_err(|e| WebstepError::session(e.to_string()))?;

        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_names_are_unique_per_run() {
        let provider = CliSessionProvider::new(BrowserConfig {
            session_prefix: "test".to_string(),
            headed: false,
            timeout_ms: 30000,
        });

        let a = provider.fresh_session_name();
        let b = provider.fresh_session_name();
        assert!(a.starts_with("test-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_extract_script_quotes_selector() {
        let script = build_extract_script("a[title=\"it's\"]", 5).unwrap();
        assert!(script.contains(r#"querySelectorAll("a[title=\"it's\"]")"#));
        assert!(script.contains("slice(0, 5)"));
    }

    #[test]
    fn test_extract_script_zero_limit() {
        let script = build_extract_script(".item", 0).unwrap();
        assert!(script.contains("slice(0, 0)"));
    }
}
