//! Text and JSON renderings of a generation report.
use crate::deliverables::DeliverablesPackage;
use crate::pipeline::GenerationReport;
use anyhow::{Context, Result};
use serde::Serialize;

pub const FALLBACK_BANNER: &str = "Generated Draft (fallback)";
const EMPTY_RAW: &str = "(empty)";

/// Machine-readable report shape for `--json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    valid: bool,
    data: &'a DeliverablesPackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_text: Option<&'a str>,
}

/// Render a report as sectioned text.
pub fn render_text(report: &GenerationReport, show_raw: bool) -> String {
    let mut out = String::new();
    if !report.outcome.is_valid() {
        push_line(&mut out, FALLBACK_BANNER);
        out.push('\n');
    }
    render_package(&mut out, report.outcome.package());

    if let Some(error) = report.error.as_deref() {
        out.push('\n');
        push_line(&mut out, &format!("Error: {error}"));
    }
    if show_raw {
        let raw = report.outcome.raw_text();
        out.push('\n');
        push_heading(&mut out, "Raw output");
        push_line(&mut out, if raw.is_empty() { EMPTY_RAW } else { raw });
    }
    out
}

/// Render a report as pretty JSON.
pub fn render_json(report: &GenerationReport, show_raw: bool) -> Result<String> {
    let json = JsonReport {
        valid: report.outcome.is_valid(),
        data: report.outcome.package(),
        error: report.error.as_deref(),
        raw_text: show_raw.then_some(report.outcome.raw_text()),
    };
    serde_json::to_string_pretty(&json).context("serialize report JSON")
}

fn render_package(out: &mut String, package: &DeliverablesPackage) {
    push_heading(out, "System Summary");
    push_line(out, &package.system_summary);

    for deliverable in [&package.primary_deliverable, &package.supporting_deliverable] {
        out.push('\n');
        push_heading(out, &deliverable.title);
        push_line(out, &deliverable.content);
    }

    out.push('\n');
    push_heading(out, "Execution Checklist");
    push_items(out, &package.execution_checklist);

    out.push('\n');
    push_heading(out, "Next Actions");
    push_items(out, &package.next_actions);
}

fn push_heading(out: &mut String, title: &str) {
    out.push_str("## ");
    out.push_str(title);
    out.push('\n');
}

fn push_items(out: &mut String, items: &[String]) {
    for item in items {
        push_line(out, &format!("- {item}"));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
