//! Structured-data extraction from raw LM text.
//!
//! Models are told to answer with bare JSON but routinely wrap it in markdown
//! fences or surround it with prose. Extraction is an ordered series of total
//! string transformations followed by a single fallible parse:
//!
//! 1. trim
//! 2. strip a fence marker at the very start and end of the text
//! 3. replace the text with the interior of the first fenced block, if any
//! 4. slice from the first `{` to the last `}`
//! 5. parse as JSON
//!
//! Steps 2 and 3 stay separate passes. Step 2 only fires on a boundary fence
//! while step 3 catches fences that follow a line of prose.
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static LEADING_JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A```json\s*").expect("valid leading json fence regex"));
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A```\s*").expect("valid leading fence regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\z").expect("valid trailing fence regex"));
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)\s*```").expect("valid fenced block regex")
});

/// Extract the structured value embedded in raw model output.
///
/// Returns `None` when nothing in the text parses as JSON.
pub fn extract_structured(text: &str) -> Option<Value> {
    let unfenced = strip_boundary_fences(text);
    let interior = fenced_interior(&unfenced).unwrap_or(unfenced.as_str());
    let span = brace_span(interior);
    match serde_json::from_str(span) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, span_bytes = span.len(), "no structured value in text");
            None
        }
    }
}

fn strip_boundary_fences(text: &str) -> String {
    let clean = text.trim();
    let clean = LEADING_JSON_FENCE.replace(clean, "");
    let clean = LEADING_FENCE.replace(&clean, "");
    let clean = TRAILING_FENCE.replace(&clean, "");
    clean.trim().to_string()
}

fn fenced_interior(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|interior| interior.as_str().trim())
}

fn brace_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => &text[first..=last],
        _ => text,
    }
}
