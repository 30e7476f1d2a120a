//! Step-field extraction — best-effort recovery of display fields
//! from opaque step payloads.
//!
//! A step's `stepDetails` is whatever the backend serialized for that
//! unit of work. The enclosing structure is not guaranteed to be
//! parseable JSON, so this module scans for known key markers instead
//! of parsing. No marker means an empty result, never an error; a
//! malformed payload must never abort rendering of a step.

use once_cell::sync::Lazy;
use regex::Regex;

use convo_types::thread::{ExtractedStepFields, Step, StepKind, StepReport};

static SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"searchText":"([^"]+)""#).expect("search pattern"));
static FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filter":"([^"]+)""#).expect("filter pattern"));
static FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""fileName":\s*"([^"]+)""#).expect("file name pattern"));

/// Marker substring distinguishing tool-invocation steps.
const TOOL_CALL_MARKER: &str = "tool_calls";

/// Scan a step payload for recognized field markers.
///
/// At most one search query and one filter are recovered (first match
/// wins); file names are collected in first-match order with
/// duplicates preserved.
pub fn extract_step_fields(step_details: &str) -> ExtractedStepFields {
    let mut fields = ExtractedStepFields::default();

    if let Some(caps) = SEARCH_RE.captures(step_details) {
        fields.search_query = Some(caps[1].to_string());
    }

    if let Some(caps) = FILTER_RE.captures(step_details) {
        fields.filter = Some(caps[1].to_string());
    }

    for caps in FILE_NAME_RE.captures_iter(step_details) {
        fields.file_names.push(caps[1].to_string());
    }

    fields
}

/// Classify a step by its payload: tool invocation or message creation.
pub fn classify_step(step_details: &str) -> StepKind {
    if step_details.contains(TOOL_CALL_MARKER) {
        StepKind::ToolCall
    } else {
        StepKind::MessageCreation
    }
}

/// Decorate one step for display.
pub fn step_report(step: &Step) -> StepReport {
    StepReport {
        kind: classify_step(&step.step_details),
        fields: extract_step_fields(&step.step_details),
    }
}

/// Decorate an assistant turn's steps, preserving backend order.
pub fn step_reports(steps: &[Step]) -> Vec<StepReport> {
    steps.iter().map(step_report).collect()
}
