//! Step model - the vocabulary of executable browser actions
//!
//! A `Step` is one declarative action with typed parameters. Raw mappings from
//! the planner are turned into validated steps by [`Step::parse`]; anything
//! missing a required field or carrying an out-of-range value is rejected
//! before execution starts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{Result, WebstepError};

/// A single browser action with its parameters
///
/// The `action` tag and field names here are the canonical wire format; the
/// normalizer rewrites legacy spellings before steps are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate the main frame to a URL
    OpenPage { url: String },
    /// Click the first element matching the selector
    Click { selector: String },
    /// Focus an element and input literal text
    Type { selector: String, text: String },
    /// Suspend execution for a fixed time
    Wait { duration_ms: u64 },
    /// Block until the selector is present or the timeout elapses
    WaitForSelector { selector: String, timeout_ms: u64 },
    /// Repeat scroll-to-bottom with a delay between iterations
    ScrollToBottom { times: u32, delay_ms: u64 },
    /// Collect up to `limit` matching elements' text and href
    ExtractList { selector: String, limit: usize },
    /// Capture the current viewport as a base64 image
    Screenshot,
}

impl Step {
    /// Parse an arbitrary JSON mapping into a validated step
    ///
    /// Fails with `MalformedStep` naming the offending field, or
    /// `UnsupportedAction` for an unknown action kind. No side effects.
    pub fn parse(value: &Value) -> Result<Step> {
        let obj = value
            .as_object()
            .ok_or_else(|| WebstepError::malformed("step", "expected a JSON object"))?;

        let action = obj
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| WebstepError::malformed("action", "missing or not a string"))?;

        match action {
            "open_page" => Ok(Step::OpenPage {
                url: require_string(obj, "url")?,
            }),
            "click" => Ok(Step::Click {
                selector: require_string(obj, "selector")?,
            }),
            "type" => Ok(Step::Type {
                selector: require_string(obj, "selector")?,
                text: require_text(obj, "text")?,
            }),
            "wait" => Ok(Step::Wait {
                duration_ms: require_integer(obj, "duration_ms")?,
            }),
            "wait_for_selector" => {
                let timeout_ms = require_integer(obj, "timeout_ms")?;
                if timeout_ms == 0 {
                    return Err(WebstepError::malformed(
                        "timeout_ms",
                        "must be greater than zero",
                    ));
                }
                Ok(Step::WaitForSelector {
                    selector: require_string(obj, "selector")?,
                    timeout_ms,
                })
            }
            "scroll_to_bottom" => {
                let times = require_integer(obj, "times")?;
                if times == 0 {
                    return Err(WebstepError::malformed("times", "must be at least 1"));
                }
                let times = u32::try_from(times)
                    .map_err(|_| WebstepError::malformed("times", "value too large"))?;
                Ok(Step::ScrollToBottom {
                    times,
                    delay_ms: require_integer(obj, "delay_ms")?,
                })
            }
            "extract_list" => {
                // An empty selector is tolerated here; the normalizer simply
                // skips the defensive prelude for it.
                let selector = require_text(obj, "selector")?;
                let limit = require_integer(obj, "limit")? as usize;
                Ok(Step::ExtractList { selector, limit })
            }
            "screenshot" => Ok(Step::Screenshot),
            other => Err(WebstepError::UnsupportedAction(other.to_string())),
        }
    }

    /// Canonical action name for this step
    pub fn kind(&self) -> &'static str {
        match self {
            Step::OpenPage { .. } => "open_page",
            Step::Click { .. } => "click",
            Step::Type { .. } => "type",
            Step::Wait { .. } => "wait",
            Step::WaitForSelector { .. } => "wait_for_selector",
            Step::ScrollToBottom { .. } => "scroll_to_bottom",
            Step::ExtractList { .. } => "extract_list",
            Step::Screenshot => "screenshot",
        }
    }
}

/// Extract a required non-empty string field
fn require_string(obj: &Map<String, Value>, field: &str) -> Result<String> {
    let value = require_text(obj, field)?;
    if value.is_empty() {
        return Err(WebstepError::malformed(field, "must not be empty"));
    }
    Ok(value)
}

/// Extract a required string field, empty allowed
fn require_text(obj: &Map<String, Value>, field: &str) -> Result<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WebstepError::malformed(field, "missing or not a string"))
}

/// Extract a required non-negative integer field
fn require_integer(obj: &Map<String, Value>, field: &str) -> Result<u64> {
    let value = obj
        .get(field)
        .ok_or_else(|| WebstepError::malformed(field, "missing"))?;
    value
        .as_u64()
        .ok_or_else(|| WebstepError::malformed(field, "must be a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_every_variant() {
        let cases = vec![
            json!({"action": "open_page", "url": "https://example.com"}),
            json!({"action": "click", "selector": "#go"}),
            json!({"action": "type", "selector": "input[name=q]", "text": "rust"}),
            json!({"action": "wait", "duration_ms": 500}),
            json!({"action": "wait_for_selector", "selector": ".list", "timeout_ms": 8000}),
            json!({"action": "scroll_to_bottom", "times": 4, "delay_ms": 600}),
            json!({"action": "extract_list", "selector": "a.item", "limit": 10}),
            json!({"action": "screenshot"}),
        ];

        for case in cases {
            let step = Step::parse(&case).unwrap();
            assert_eq!(step.kind(), case["action"].as_str().unwrap());
        }
    }

    #[test]
    fn test_round_trip_is_identity() {
        let steps = vec![
            Step::OpenPage {
                url: "https://example.com".to_string(),
            },
            Step::Click {
                selector: "#go".to_string(),
            },
            Step::Type {
                selector: "input".to_string(),
                text: "hello".to_string(),
            },
            Step::Wait { duration_ms: 100 },
            Step::WaitForSelector {
                selector: ".x".to_string(),
                timeout_ms: 8000,
            },
            Step::ScrollToBottom {
                times: 4,
                delay_ms: 600,
            },
            Step::ExtractList {
                selector: "a".to_string(),
                limit: 3,
            },
            Step::Screenshot,
        ];

        for step in steps {
            let value = serde_json::to_value(&step).unwrap();
            let reparsed = Step::parse(&value).unwrap();
            assert_eq!(step, reparsed);
        }
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let err = Step::parse(&json!({"action": "open_page"})).unwrap_err();
        match err {
            WebstepError::MalformedStep { field, .. } => assert_eq!(field, "url"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Step::parse(&json!({"action": "wait", "duration_ms": -5})).unwrap_err();
        match err {
            WebstepError::MalformedStep { field, .. } => assert_eq!(field, "duration_ms"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Step::parse(
            &json!({"action": "wait_for_selector", "selector": ".x", "timeout_ms": 0}),
        )
        .unwrap_err();
        match err {
            WebstepError::MalformedStep { field, .. } => assert_eq!(field, "timeout_ms"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_scroll_times_rejected() {
        let err = Step::parse(
            &json!({"action": "scroll_to_bottom", "times": 0, "delay_ms": 100}),
        )
        .unwrap_err();
        match err {
            WebstepError::MalformedStep { field, .. } => assert_eq!(field, "times"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_kind() {
        let err = Step::parse(&json!({"action": "hover", "selector": ".x"})).unwrap_err();
        match err {
            WebstepError::UnsupportedAction(kind) => assert_eq!(kind, "hover"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_seconds_spelling_is_not_recognized() {
        // Canonical wait field is duration_ms; legacy `seconds` variants fail.
        let err = Step::parse(&json!({"action": "wait", "seconds": 2})).unwrap_err();
        match err {
            WebstepError::MalformedStep { field, .. } => assert_eq!(field, "duration_ms"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_list_allows_empty_selector() {
        let step =
            Step::parse(&json!({"action": "extract_list", "selector": "", "limit": 5})).unwrap();
        assert_eq!(step.kind(), "extract_list");
    }
}
