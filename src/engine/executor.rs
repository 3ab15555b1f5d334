//! Execution engine
//!
//! Drives a browsing session through a canonical plan, one step at a time:
//! acquire session, dispatch in order, close unconditionally. The run moves
//! through acquire -> dispatch -> close; a failed acquisition or a failed
//! step short-circuits to close, and the report always keeps the log
//! accumulated so far plus anything already extracted.

use crate::browser::session::{BrowserSession, SessionProvider};
use crate::core::{Result, RunReport, WebstepError};
use crate::plan::step::Step;

/// Executes canonical plans against browsing sessions
///
/// Holds only a session provider, so one engine can serve concurrent runs;
/// every run acquires its own exclusive session.
pub struct Engine {
    provider: Box<dyn SessionProvider>,
    debug: bool,
}

impl Engine {
    /// Create an engine over a session provider
    pub fn new(provider: Box<dyn SessionProvider>) -> Self {
        Self {
            provider,
            debug: false,
        }
    }

    /// Enable or disable debug output
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Execute a plan and return its report
    ///
    /// Never returns `Err`: every outcome, including session acquisition
    /// failure and mid-plan step failure, is a report carrying the full log
    /// up to the point the run stopped. Steps are dispatched strictly in
    /// order with no retries and no engine-imposed deadline.
    pub async fn run(&self, plan: &[Step]) -> RunReport {
        let mut report = RunReport::new();

        report.push_log("Launching browser...");
        let mut session = match self.provider.acquire().await {
            Ok(session) => session,
            Err(e) => {
                let e = into_acquisition_error(e);
                if self.debug {
                    eprintln!("DEBUG: session acquisition failed: {}", e);
                }
                report.set_failure(&e);
                return report;
            }
        };

        for step in plan {
            report.push_log(format!("Executing step: {}", step_json(step)));

            match self.dispatch(session.as_mut(), step, &mut report).await {
                Ok(entry) => report.push_log(entry),
                Err(e) => {
                    let e = into_step_error(e);
                    if self.debug {
                        eprintln!("DEBUG: step '{}' failed: {}", step.kind(), e);
                    }
                    report.set_failure(&e);
                    break;
                }
            }
        }

        // Teardown is unconditional and never masks the primary outcome.
        match session.close().await {
            Ok(()) => report.push_log("Browser closed"),
            Err(e) => report.push_log(format!("Browser close failed: {}", e)),
        }

        report
    }

    /// Perform one step's capability call, returning its completion log entry
    async fn dispatch(
        &self,
        session: &mut dyn BrowserSession,
        step: &Step,
        report: &mut RunReport,
    ) -> Result<String> {
        match step {
            Step::OpenPage { url } => {
                session.navigate(url).await?;
                Ok(format!("Navigated to: {}", url))
            }
            Step::Click { selector } => {
                session.click(selector).await?;
                Ok(format!("Clicked: {}", selector))
            }
            Step::Type { selector, text } => {
                session.type_text(selector, text).await?;
                Ok(format!("Typed into {}: {}", selector, text))
            }
            Step::Wait { duration_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(*duration_ms)).await;
                Ok(format!("Waited {} ms", duration_ms))
            }
            Step::WaitForSelector {
                selector,
                timeout_ms,
            } => {
                session.wait_for(selector, *timeout_ms).await?;
                Ok(format!("Selector present: {}", selector))
            }
            Step::ScrollToBottom { times, delay_ms } => {
                for _ in 0..*times {
                    session.scroll_to_bottom().await?;
                    tokio::time::sleep(std::time::Duration::from_millis(*delay_ms)).await;
                }
                Ok(format!("Scrolled to bottom {} time(s)", times))
            }
            Step::ExtractList { selector, limit } => {
                let items = session.extract(selector, *limit).await?;
                let count = items.len();
                // Only the last extraction's output survives.
                report.extracted = items;
                Ok(format!("Extracted {} item(s)", count))
            }
            Step::Screenshot => {
                report.screenshot = Some(session.screenshot().await?);
                Ok("Screenshot captured".to_string())
            }
        }
    }
}

/// Render a step for its start log entry
fn step_json(step: &Step) -> String {
    serde_json::to_string(step).unwrap_or_else(|_| step.kind().to_string())
}

/// Normalize acquisition-path errors to the acquisition taxonomy kind
fn into_acquisition_error(e: WebstepError) -> WebstepError {
    match e.kind() {
        "session_acquisition" => e,
        _ => WebstepError::session(e.to_string()),
    }
}

/// Normalize dispatch-path errors to the step-execution taxonomy kind
fn into_step_error(e: WebstepError) -> WebstepError {
    match e {
        WebstepError::StepExecution(_) => e,
        other => WebstepError::step(other.to_string()),
    }
}
