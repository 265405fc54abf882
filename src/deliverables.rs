//! Deliverables schema, validation gate, and fallback synthesis.
//!
//! The gate accepts whatever the extractor produced and always returns a
//! complete [`DeliverablesPackage`]. A candidate either passes every check and
//! is normalized, or the whole record is replaced by the fallback built from
//! the raw model text. There is no partially-valid record.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FALLBACK_SUMMARY: &str = "Draft system generated. You can regenerate to refine.";
pub const FALLBACK_PRIMARY_TITLE: &str = "Generated Draft";
pub const FALLBACK_EMPTY_CONTENT: &str = "No content was generated. Please try again.";
pub const FALLBACK_SUPPORTING_TITLE: &str = "Notes";
pub const FALLBACK_SUPPORTING_CONTENT: &str =
    "This draft was auto-generated due to formatting issues.";
pub const FALLBACK_CHECKLIST: [&str; 3] = [
    "Review the draft",
    "Regenerate the system if needed",
    "Customize before use",
];
pub const FALLBACK_NEXT_ACTIONS: [&str; 1] = ["Regenerate system"];

const SUMMARY_KEY: &str = "systemSummary";
const PRIMARY_KEY: &str = "primaryDeliverable";
const SUPPORTING_KEY: &str = "supportingDeliverable";
const CHECKLIST_KEY: &str = "executionChecklist";
const NEXT_ACTIONS_KEY: &str = "nextActions";

/// A titled block of generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub title: String,
    pub content: String,
}

/// The canonical output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverablesPackage {
    pub system_summary: String,
    pub primary_deliverable: Deliverable,
    pub supporting_deliverable: Deliverable,
    pub execution_checklist: Vec<String>,
    pub next_actions: Vec<String>,
}

impl DeliverablesPackage {
    /// Check the record invariant: trimmed non-blank summary and contents,
    /// non-empty lists of trimmed non-blank items.
    pub fn is_well_formed(&self) -> bool {
        fn filled(text: &str) -> bool {
            !text.trim().is_empty() && text.trim() == text
        }
        filled(&self.system_summary)
            && filled(&self.primary_deliverable.content)
            && filled(&self.supporting_deliverable.content)
            && !self.execution_checklist.is_empty()
            && self.execution_checklist.iter().all(|item| filled(item))
            && !self.next_actions.is_empty()
            && self.next_actions.iter().all(|item| filled(item))
    }
}

/// Result of the validation gate. The tag records provenance only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid {
        package: DeliverablesPackage,
        raw_text: String,
    },
    Fallback {
        package: DeliverablesPackage,
        raw_text: String,
    },
}

impl ValidationOutcome {
    pub fn package(&self) -> &DeliverablesPackage {
        match self {
            Self::Valid { package, .. } | Self::Fallback { package, .. } => package,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Self::Valid { raw_text, .. } | Self::Fallback { raw_text, .. } => raw_text,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Build the fixed placeholder record, carrying the raw text as the draft.
pub fn fallback_package(raw_text: &str) -> DeliverablesPackage {
    let content = if raw_text.trim().is_empty() {
        FALLBACK_EMPTY_CONTENT.to_string()
    } else {
        raw_text.trim().to_string()
    };
    DeliverablesPackage {
        system_summary: FALLBACK_SUMMARY.to_string(),
        primary_deliverable: Deliverable {
            title: FALLBACK_PRIMARY_TITLE.to_string(),
            content,
        },
        supporting_deliverable: Deliverable {
            title: FALLBACK_SUPPORTING_TITLE.to_string(),
            content: FALLBACK_SUPPORTING_CONTENT.to_string(),
        },
        execution_checklist: FALLBACK_CHECKLIST.iter().map(|s| s.to_string()).collect(),
        next_actions: FALLBACK_NEXT_ACTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Validate an extracted candidate and normalize it, or fall back.
pub fn validate_deliverables(candidate: Option<&Value>, raw_text: &str) -> ValidationOutcome {
    let outcome = match candidate.ok_or("no structured value").and_then(normalize) {
        Ok(package) => ValidationOutcome::Valid {
            package,
            raw_text: raw_text.to_string(),
        },
        Err(reason) => {
            tracing::warn!(reason, raw_bytes = raw_text.len(), "deliverables fell back");
            ValidationOutcome::Fallback {
                package: fallback_package(raw_text),
                raw_text: raw_text.to_string(),
            }
        }
    };
    debug_assert!(outcome.package().is_well_formed());
    outcome
}

fn normalize(candidate: &Value) -> Result<DeliverablesPackage, &'static str> {
    let object = candidate.as_object().ok_or("candidate is not an object")?;
    for key in [
        SUMMARY_KEY,
        PRIMARY_KEY,
        SUPPORTING_KEY,
        CHECKLIST_KEY,
        NEXT_ACTIONS_KEY,
    ] {
        if !object.contains_key(key) {
            return Err("missing required key");
        }
    }

    let summary = object[SUMMARY_KEY]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("systemSummary must be a non-blank string")?;
    let primary = deliverable(object, PRIMARY_KEY)
        .ok_or("primaryDeliverable must have a title and non-blank content")?;
    let supporting = deliverable(object, SUPPORTING_KEY)
        .ok_or("supportingDeliverable must have a title and non-blank content")?;
    let checklist = string_list(object, CHECKLIST_KEY)
        .ok_or("executionChecklist must be a non-empty list of strings")?;
    let next_actions = string_list(object, NEXT_ACTIONS_KEY)
        .ok_or("nextActions must be a non-empty list of strings")?;

    Ok(DeliverablesPackage {
        system_summary: summary.to_string(),
        primary_deliverable: primary,
        supporting_deliverable: supporting,
        execution_checklist: checklist,
        next_actions,
    })
}

fn deliverable(object: &Map<String, Value>, key: &str) -> Option<Deliverable> {
    let entry = object.get(key)?.as_object()?;
    let title = entry.get("title")?.as_str()?;
    let content = entry.get("content")?.as_str()?.trim();
    if content.is_empty() {
        return None;
    }
    Some(Deliverable {
        title: title.trim().to_string(),
        content: content.to_string(),
    })
}

/// Every element must be a string; blank entries are dropped after the check.
fn string_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = object.get(key)?.as_array()?;
    if items.is_empty() || !items.iter().all(Value::is_string) {
        return None;
    }
    let kept: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    // All-blank lists would leave the record without items.
    if kept.is_empty() {
        return None;
    }
    Some(kept)
}

#[cfg(test)]
#[path = "deliverables_tests.rs"]
mod tests;
