use super::*;
use serde_json::json;

fn valid_candidate() -> Value {
    json!({
        "systemSummary": "  A two-step funnel for a coffee subscription.  ",
        "primaryDeliverable": {
            "title": " Landing Page Copy ",
            "content": "\nHeadline: Fresh beans, every week.\n"
        },
        "supportingDeliverable": {
            "title": "Email Sequence",
            "content": "Email 1: Welcome"
        },
        "executionChecklist": ["Publish the page", "  ", "Connect the form  "],
        "nextActions": ["Write the first email"]
    })
}

fn expect_fallback(candidate: Value, raw: &str) -> DeliverablesPackage {
    let outcome = validate_deliverables(Some(&candidate), raw);
    assert!(!outcome.is_valid(), "expected fallback for {candidate}");
    outcome.package().clone()
}

#[test]
fn valid_candidate_is_normalized() {
    let outcome = validate_deliverables(Some(&valid_candidate()), "raw");
    let ValidationOutcome::Valid { package, raw_text } = outcome else {
        panic!("expected a valid outcome");
    };
    assert_eq!(raw_text, "raw");
    assert_eq!(
        package.system_summary,
        "A two-step funnel for a coffee subscription."
    );
    assert_eq!(package.primary_deliverable.title, "Landing Page Copy");
    assert_eq!(
        package.primary_deliverable.content,
        "Headline: Fresh beans, every week."
    );
    assert_eq!(
        package.execution_checklist,
        vec!["Publish the page".to_string(), "Connect the form".to_string()]
    );
    assert_eq!(package.next_actions, vec!["Write the first email".to_string()]);
    assert!(package.is_well_formed());
}

#[test]
fn blank_summary_falls_back() {
    let mut candidate = valid_candidate();
    candidate["systemSummary"] = json!("   ");
    let package = expect_fallback(candidate, "model said something");
    assert_eq!(package.system_summary, FALLBACK_SUMMARY);
    assert_eq!(package.primary_deliverable.content, "model said something");
}

#[test]
fn blank_primary_content_falls_back() {
    let candidate = json!({
        "systemSummary": "ok",
        "primaryDeliverable": {"title": "T", "content": "  "},
        "supportingDeliverable": {"title": "S", "content": "body"},
        "executionChecklist": ["a"],
        "nextActions": ["b"]
    });
    expect_fallback(candidate, "raw");
}

#[test]
fn empty_checklist_falls_back() {
    let mut candidate = valid_candidate();
    candidate["executionChecklist"] = json!([]);
    expect_fallback(candidate, "raw");
}

#[test]
fn non_string_list_item_falls_back() {
    let mut candidate = valid_candidate();
    candidate["nextActions"] = json!(["ok", 3]);
    expect_fallback(candidate, "raw");
}

#[test]
fn all_blank_list_falls_back() {
    let mut candidate = valid_candidate();
    candidate["nextActions"] = json!(["  ", ""]);
    let package = expect_fallback(candidate, "raw");
    assert!(package.is_well_formed());
}

#[test]
fn missing_key_falls_back() {
    let mut candidate = valid_candidate();
    candidate
        .as_object_mut()
        .expect("object")
        .remove("supportingDeliverable");
    expect_fallback(candidate, "raw");
}

#[test]
fn title_must_be_a_string_but_may_be_blank() {
    let mut candidate = valid_candidate();
    candidate["primaryDeliverable"]["title"] = json!("   ");
    let outcome = validate_deliverables(Some(&candidate), "raw");
    assert!(outcome.is_valid());
    assert_eq!(outcome.package().primary_deliverable.title, "");

    candidate["primaryDeliverable"]["title"] = json!(7);
    expect_fallback(candidate, "raw");
}

#[test]
fn deliverable_must_be_an_object() {
    let mut candidate = valid_candidate();
    candidate["supportingDeliverable"] = json!("Email 1: Welcome");
    expect_fallback(candidate, "raw");
}

#[test]
fn non_object_candidates_fall_back() {
    for candidate in [json!([1, 2]), json!("text"), json!(null), json!(4.5)] {
        expect_fallback(candidate, "raw");
    }
    let outcome = validate_deliverables(None, "raw");
    assert!(!outcome.is_valid());
    assert_eq!(outcome.raw_text(), "raw");
}

#[test]
fn fallback_uses_placeholder_for_empty_raw_text() {
    let package = fallback_package("");
    assert_eq!(package.primary_deliverable.title, FALLBACK_PRIMARY_TITLE);
    assert_eq!(package.primary_deliverable.content, FALLBACK_EMPTY_CONTENT);
    assert_eq!(package.supporting_deliverable.title, FALLBACK_SUPPORTING_TITLE);
    assert_eq!(package.execution_checklist.len(), 3);
    assert_eq!(package.next_actions, vec!["Regenerate system".to_string()]);

    let blank = fallback_package(" \n\t ");
    assert_eq!(blank.primary_deliverable.content, FALLBACK_EMPTY_CONTENT);
}

#[test]
fn every_outcome_is_well_formed() {
    let candidates = [
        None,
        Some(valid_candidate()),
        Some(json!({})),
        Some(json!({"systemSummary": "x"})),
        Some(json!([valid_candidate()])),
        Some(json!({
            "systemSummary": "x",
            "primaryDeliverable": {"title": "a", "content": "b"},
            "supportingDeliverable": {"title": "c", "content": "d"},
            "executionChecklist": [""],
            "nextActions": ["e"]
        })),
    ];
    for raw in ["", "   ", "plain prose", "{\"half\": "] {
        for candidate in &candidates {
            let outcome = validate_deliverables(candidate.as_ref(), raw);
            assert!(
                outcome.package().is_well_formed(),
                "candidate {candidate:?} raw {raw:?} produced {outcome:?}"
            );
        }
    }
}

#[test]
fn package_serializes_with_camel_case_keys() {
    let package = fallback_package("draft");
    let value = serde_json::to_value(&package).expect("serialize package");
    for key in [
        "systemSummary",
        "primaryDeliverable",
        "supportingDeliverable",
        "executionChecklist",
        "nextActions",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}
