//! Prompt assembly for deliverables generation.
//!
//! Templates are loaded at compile time from `prompts/` and filled in a single
//! pass so user text containing `{placeholder}` sequences is never expanded.
use crate::bundle::Bundle;
use anyhow::{anyhow, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const SYSTEM_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/system.md"));
const USER_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/user.md"));

pub const DEFAULT_BUSINESS_TYPE: &str = "general";
pub const DEFAULT_PROJECT_TITLE: &str = "Compass Generation";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder regex"));

/// User inputs for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub business_type: String,
    /// Identifier as given; resolved to a [`Bundle`] only for instructions.
    pub bundle: String,
    pub project_title: String,
}

impl GenerationRequest {
    /// Trim inputs, reject a blank prompt, and default blank optional fields.
    pub fn new(prompt: &str, business_type: &str, bundle: &str, project_title: &str) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(anyhow!("Please enter a prompt."));
        }
        Ok(Self {
            prompt: prompt.to_string(),
            business_type: or_default(business_type, DEFAULT_BUSINESS_TYPE),
            bundle: bundle.trim().to_string(),
            project_title: or_default(project_title, DEFAULT_PROJECT_TITLE),
        })
    }

    pub fn resolved_bundle(&self) -> Bundle {
        Bundle::resolve(&self.bundle)
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Build the system block with the bundle's instructions.
pub fn build_system_prompt(bundle: Bundle) -> String {
    fill_template(
        SYSTEM_TEMPLATE,
        &[("bundle_instructions", bundle.instructions())],
    )
}

/// Build the user block describing the request.
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    fill_template(
        USER_TEMPLATE,
        &[
            ("business_type", request.business_type.as_str()),
            ("bundle", request.bundle.as_str()),
            ("project_title", request.project_title.as_str()),
            ("prompt", request.prompt.as_str()),
        ],
    )
}

/// The single text part sent to the model: system block, blank line, user block.
pub fn compose_prompt(request: &GenerationRequest) -> String {
    format!(
        "{}\n\n{}",
        build_system_prompt(request.resolved_bundle()),
        build_user_prompt(request)
    )
}

fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template.trim(), |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
