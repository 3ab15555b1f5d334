//! End-to-end pipeline tests against scripted backends
//!
//! Plugs a scripted planner and a recording browser session into the agent
//! to verify sequencing, failure policy, and guaranteed session teardown
//! without a real browser or LLM.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use webstep::browser::session::{BrowserSession, SessionProvider};
use webstep::core::{Config, ExtractedItem, Result, WebstepError};
use webstep::planner::Planner;
use webstep::Agent;

/// Shared record of everything the driver was asked to do
#[derive(Default)]
struct Journal {
    acquires: usize,
    calls: Vec<String>,
    close_calls: usize,
}

/// Session that records calls and optionally fails one capability
struct ScriptedSession {
    journal: Arc<Mutex<Journal>>,
    fail_on: Option<&'static str>,
}

impl ScriptedSession {
    fn record(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        let capability = call.split(' ').next().unwrap_or("").to_string();
        self.journal.lock().unwrap().calls.push(call);

        if self.fail_on == Some(capability.as_str()) {
            return Err(WebstepError::step(format!("{} refused", capability)));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.record(format!("navigate {}", url))
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.record(format!("click {}", selector))
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.record(format!("type {} {}", selector, text))
    }

    async fn wait_for(&mut self, selector: &str, timeout_ms: u64) -> Result<()> {
        self.record(format!("wait_for {} {}", selector, timeout_ms))
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.record("scroll_to_bottom")
    }

    async fn screenshot(&mut self) -> Result<String> {
        self.record("screenshot")?;
        Ok("ZmFrZS1pbWFnZQ==".to_string())
    }

    async fn extract(&mut self, selector: &str, limit: usize) -> Result<Vec<ExtractedItem>> {
        self.record(format!("extract {} {}", selector, limit))?;
        Ok((0..limit.min(2))
            .map(|i| ExtractedItem::new(format!("item {}", i), format!("https://x/{}", i)))
            .collect())
    }

    async fn close(&mut self) -> Result<()> {
        self.journal.lock().unwrap().close_calls += 1;
        Ok(())
    }
}

struct ScriptedProvider {
    journal: Arc<Mutex<Journal>>,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        self.journal.lock().unwrap().acquires += 1;
        Ok(Box::new(ScriptedSession {
            journal: self.journal.clone(),
            fail_on: self.fail_on,
        }))
    }
}

/// Planner that returns a fixed raw plan or a fixed failure
struct ScriptedPlanner {
    raw: std::result::Result<Vec<Value>, String>,
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, _prompt: &str) -> Result<Vec<Value>> {
        match &self.raw {
            Ok(steps) => Ok(steps.clone()),
            Err(raw_text) => Err(WebstepError::plan_generation(
                "Output is not valid JSON",
                raw_text.clone(),
            )),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.run.site_heuristics = true;
    config.run.debug = false;
    config
}

fn agent_with(
    planner: ScriptedPlanner,
    fail_on: Option<&'static str>,
) -> (Agent, Arc<Mutex<Journal>>) {
    let journal = Arc::new(Mutex::new(Journal::default()));
    let provider = ScriptedProvider {
        journal: journal.clone(),
        fail_on,
    };
    let agent = Agent::with_parts(test_config(), Box::new(planner), Box::new(provider));
    (agent, journal)
}

#[tokio::test]
async fn prompt_plan_flows_through_normalizer_to_driver_in_order() {
    let planner = ScriptedPlanner {
        raw: Ok(vec![
            json!({"action": "goto", "url": "https://example.com"}),
            json!({"action": "extract", "selector": "a", "limit": 3}),
        ]),
    };
    let (agent, journal) = agent_with(planner, None);

    let report = agent.run_prompt("top links please").await.unwrap();
    assert!(report.is_success());
    assert!(report.extracted.len() <= 3);

    let journal = journal.lock().unwrap();
    assert_eq!(journal.acquires, 1);
    assert_eq!(journal.close_calls, 1);

    // navigate, readiness wait, four scrolls, extract; pure waits never
    // reach the driver.
    assert_eq!(
        journal.calls,
        vec![
            "navigate https://example.com",
            "wait_for a 8000",
            "scroll_to_bottom",
            "scroll_to_bottom",
            "scroll_to_bottom",
            "scroll_to_bottom",
            "extract a 3",
        ]
    );
}

#[tokio::test]
async fn failing_step_halts_dispatch_but_still_closes_the_session() {
    let planner = ScriptedPlanner {
        raw: Ok(vec![
            json!({"action": "open_page", "url": "https://example.com"}),
            json!({"action": "click", "selector": "#missing"}),
            json!({"action": "screenshot"}),
        ]),
    };
    let (agent, journal) = agent_with(planner, Some("click"));

    let report = agent.run_prompt("click something").await.unwrap();
    let failure = report.failure.as_ref().expect("run should fail");
    assert_eq!(failure.error, "step_execution");
    assert!(failure.message.contains("click"));
    assert!(report.screenshot.is_none());

    let journal = journal.lock().unwrap();
    assert_eq!(journal.close_calls, 1);
    // The screenshot step never dispatched.
    assert!(journal.calls.iter().all(|c| !c.starts_with("screenshot")));

    // The log ends with the failing step's start entry plus teardown.
    let click_entries: Vec<_> = report.log.iter().filter(|l| l.contains("click")).collect();
    assert_eq!(click_entries.len(), 1);
}

#[tokio::test]
async fn planner_failure_opens_no_session() {
    let planner = ScriptedPlanner {
        raw: Err("Here are the steps you asked for:".to_string()),
    };
    let (agent, journal) = agent_with(planner, None);

    let err = agent.run_prompt("do a thing").await.unwrap_err();
    match err {
        WebstepError::PlanGeneration { raw, .. } => {
            assert_eq!(raw, "Here are the steps you asked for:");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let journal = journal.lock().unwrap();
    assert_eq!(journal.acquires, 0);
}

#[tokio::test]
async fn malformed_plan_opens_no_session() {
    let planner = ScriptedPlanner {
        raw: Ok(vec![json!({"action": "click"})]),
    };
    let (agent, journal) = agent_with(planner, None);

    let err = agent.run_prompt("click it").await.unwrap_err();
    assert!(matches!(err, WebstepError::MalformedStep { .. }));
    assert_eq!(journal.lock().unwrap().acquires, 0);
}

#[tokio::test]
async fn site_heuristics_reach_the_driver() {
    let planner = ScriptedPlanner {
        raw: Ok(vec![
            json!({"action": "goto", "url": "https://news.ycombinator.com/"}),
            json!({"action": "extract", "selector": "a", "limit": 5}),
        ]),
    };
    let (agent, journal) = agent_with(planner, None);

    let report = agent.run_prompt("top HN stories").await.unwrap();
    assert!(report.is_success());

    let journal = journal.lock().unwrap();
    assert!(journal
        .calls
        .iter()
        .any(|c| c == "extract .titleline > a 5"));
}

#[tokio::test]
async fn screenshot_and_extraction_overwrite_previous_values() {
    let planner = ScriptedPlanner {
        raw: Ok(vec![
            json!({"action": "extract_list", "selector": "", "limit": 2}),
            json!({"action": "screenshot"}),
            json!({"action": "extract_list", "selector": "", "limit": 1}),
            json!({"action": "screenshot"}),
        ]),
    };
    let (agent, _journal) = agent_with(planner, None);

    let report = agent.run_prompt("grab things twice").await.unwrap();
    assert!(report.is_success());
    // Only the last extraction survives.
    assert_eq!(report.extracted.len(), 1);
    assert!(report.screenshot.is_some());
}

#[tokio::test]
async fn session_close_is_idempotent() {
    let journal = Arc::new(Mutex::new(Journal::default()));
    let mut session = ScriptedSession {
        journal: journal.clone(),
        fail_on: None,
    };

    session.close().await.unwrap();
    session.close().await.unwrap();
    assert_eq!(journal.lock().unwrap().close_calls, 2);
}
