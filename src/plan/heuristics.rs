//! Site heuristics resolver
//!
//! Swaps in known-good extraction selectors for known target hosts. LLM
//! planners tend to guess generic selectors like `a` or `.title`; for a
//! handful of popular sites we know what actually works. Pure and total: an
//! unmatched or unparseable host is a no-op, never an error.

use url::Url;

use crate::plan::step::Step;

/// Known host substrings mapped to working list selectors
const SITE_SELECTORS: &[(&str, &str)] = &[
    ("news.ycombinator.com", ".titleline > a"),
    ("ebay.", ".s-item .s-item__title"),
    ("craigslist", ".result-info .result-title"),
    ("reddit.com", "a[slot='full-post-link']"),
    ("amazon.", "h2 a.a-link-normal"),
];

/// Rewrite `extract_list` selectors for the plan's target host
///
/// The target host is taken from the first `open_page` step. Applying this
/// twice changes nothing: the rewritten selector maps to itself.
pub fn apply(plan: &mut [Step]) {
    let Some(selector) = plan
        .iter()
        .find_map(|step| match step {
            Step::OpenPage { url } => Some(url.as_str()),
            _ => None,
        })
        .and_then(selector_for_url)
    else {
        return;
    };

    for step in plan.iter_mut() {
        if let Step::ExtractList {
            selector: step_selector,
            ..
        } = step
        {
            *step_selector = selector.to_string();
        }
    }
}

/// Look up the known-good selector for a URL's host, if any
fn selector_for_url(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    SITE_SELECTORS
        .iter()
        .find(|(needle, _)| host.contains(needle))
        .map(|(_, selector)| *selector)
}
