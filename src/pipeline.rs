//! Generation pipeline: gateway call, then the extraction and validation gate.
//!
//! The pipeline has two outcomes. A gateway failure yields the fallback record
//! plus the failure message. A gateway success yields whatever the validator
//! decided, valid or fallback.
use crate::deliverables::{fallback_package, validate_deliverables, ValidationOutcome};
use crate::extract::extract_structured;
use crate::gateway::{Gateway, GatewayResult, Transport};
use crate::prompt::GenerationRequest;

/// Final product of one generation, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub outcome: ValidationOutcome,
    /// Gateway failure message, when the call itself failed.
    pub error: Option<String>,
}

/// Run one generation end to end.
pub fn run_generation<T: Transport>(
    gateway: &Gateway<T>,
    request: &GenerationRequest,
) -> GenerationReport {
    report_from_gateway(gateway.generate(request))
}

/// Map a gateway result into a report.
pub fn report_from_gateway(result: GatewayResult) -> GenerationReport {
    match result {
        GatewayResult::Success { raw_text, parsed } => GenerationReport {
            outcome: validate_deliverables(parsed.as_ref(), &raw_text),
            error: None,
        },
        GatewayResult::Failure {
            kind,
            error_message,
            raw_text,
        } => {
            tracing::warn!(failure = %kind, "generation failed; rendering fallback draft");
            let draft = if raw_text.is_empty() {
                error_message.as_str()
            } else {
                raw_text.as_str()
            };
            GenerationReport {
                outcome: ValidationOutcome::Fallback {
                    package: fallback_package(draft),
                    raw_text,
                },
                error: Some(error_message),
            }
        }
    }
}

/// Run the gate on raw model text without calling the API.
pub fn check_raw_text(raw_text: &str) -> GenerationReport {
    let parsed = extract_structured(raw_text);
    GenerationReport {
        outcome: validate_deliverables(parsed.as_ref(), raw_text),
        error: None,
    }
}

/// Remaining free generations for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageCounter {
    limit: u32,
    remaining: u32,
}

impl UsageCounter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Counter after one generation attempt; saturates at zero.
    pub fn consumed(self) -> Self {
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }
}
