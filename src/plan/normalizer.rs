//! Plan normalizer
//!
//! Rewrites a raw, possibly inconsistent step list into canonical steps and
//! injects defensive steps around extractions so the engine never races
//! against lazy-loaded content. Any malformed or unknown step rejects the
//! whole plan; nothing partial reaches the engine.

use serde_json::Value;

use crate::core::{Result, WebstepError};
use crate::plan::step::Step;

/// Timeout for the readiness wait inserted before an extraction
pub const READY_TIMEOUT_MS: u64 = 8000;
/// Scroll iterations inserted before an extraction
pub const LAZY_SCROLL_TIMES: u32 = 4;
/// Delay between inserted scroll iterations
pub const LAZY_SCROLL_DELAY_MS: u64 = 600;
/// Settle pause inserted after scrolling, before the extraction runs
pub const SETTLE_MS: u64 = 1200;

/// Normalize a raw step list into canonical steps
///
/// Legacy action identifiers are renamed (`goto` -> `open_page`, `extract` ->
/// `extract_list`), then every step is validated. Each `extract_list` with a
/// non-empty selector gets a fixed defensive prelude: a readiness wait on the
/// same selector, a scroll-to-bottom pass, and a settle wait. The prelude must
/// run to completion before the extraction; this ordering is a hard contract.
///
/// Output length is always >= input length and contains no legacy kinds.
pub fn normalize(raw: &[Value]) -> Result<Vec<Step>> {
    let mut canonical = Vec::with_capacity(raw.len());

    for entry in raw {
        let step = Step::parse(&rename_legacy(entry)?)?;

        if let Step::ExtractList { selector, .. } = &step {
            if !selector.is_empty() {
                canonical.push(Step::WaitForSelector {
                    selector: selector.clone(),
                    timeout_ms: READY_TIMEOUT_MS,
                });
                canonical.push(Step::ScrollToBottom {
                    times: LAZY_SCROLL_TIMES,
                    delay_ms: LAZY_SCROLL_DELAY_MS,
                });
                canonical.push(Step::Wait {
                    duration_ms: SETTLE_MS,
                });
            }
        }

        canonical.push(step);
    }

    Ok(canonical)
}

/// Rewrite legacy action identifiers on a copy of the raw mapping
fn rename_legacy(entry: &Value) -> Result<Value> {
    let obj = entry
        .as_object()
        .ok_or_else(|| WebstepError::malformed("step", "expected a JSON object"))?;

    let action = obj
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| WebstepError::malformed("action", "missing or not a string"))?;

    let renamed = match action {
        "goto" => "open_page",
        "extract" => "extract_list",
        other => other,
    };

    let mut copy = obj.clone();
    copy.insert("action".to_string(), Value::String(renamed.to_string()));
    Ok(Value::Object(copy))
}
